//! How long to wait after a 429.
//!
//! Servers announce the wait in whole seconds through `Retry-After`. Two
//! ways of turning that number into a delay are supported, selected by
//! [`SleepPolicy`]:
//!
//! | Policy | `Retry-After: 0` | `Retry-After: N` |
//! |--------|------------------|------------------|
//! | [`Doubled`](SleepPolicy::Doubled) (default) | `zero_delay` (2s) | `2 × N` seconds |
//! | [`Exact`](SleepPolicy::Exact) | no wait | `N` seconds |

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Delay used by [`SleepPolicy::Doubled`] when the server says `Retry-After: 0`.
pub const DEFAULT_ZERO_DELAY: Duration = Duration::from_secs(2);

/// Rule for turning a `Retry-After` value into a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SleepPolicy {
    /// Wait twice what the server asks, or `zero_delay` when it asks for 0.
    #[default]
    Doubled,
    /// Wait exactly what the server asks.
    Exact,
}

/// Configuration for [`RateLimitTransport`](crate::RateLimitTransport).
///
/// Deserializes from a table such as `{ "policy": "exact" }`; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Delay rule. Default: [`SleepPolicy::Doubled`].
    pub policy: SleepPolicy,
    /// Wait used by [`SleepPolicy::Doubled`] for `Retry-After: 0`. Default: 2s.
    #[serde(rename = "zero_delay_secs", deserialize_with = "duration_from_secs")]
    pub zero_delay: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            policy: SleepPolicy::default(),
            zero_delay: DEFAULT_ZERO_DELAY,
        }
    }
}

impl RateLimitConfig {
    /// Set the delay rule.
    pub fn with_policy(mut self, policy: SleepPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the wait used by [`SleepPolicy::Doubled`] for `Retry-After: 0`.
    pub fn with_zero_delay(mut self, delay: Duration) -> Self {
        self.zero_delay = delay;
        self
    }

    /// Wait to apply for a `Retry-After` of `retry_after` seconds.
    pub fn delay_for(&self, retry_after: u64) -> Duration {
        match self.policy {
            SleepPolicy::Doubled if retry_after == 0 => self.zero_delay,
            SleepPolicy::Doubled => Duration::from_secs(retry_after.saturating_mul(2)),
            SleepPolicy::Exact => Duration::from_secs(retry_after),
        }
    }
}

fn duration_from_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}
