//! Rate-limit policy over the trailing 24-hour window.
//!
//! The counting itself lives in the database layer; this module owns the
//! decision. Limits are configuration, not hardcoded behavior -- the
//! defaults here are starting points, overridable per deployment.

use crate::error::CoreError;

/// Trailing window length in hours.
pub const WINDOW_HOURS: i64 = 24;

/// Default 24-hour limit for authenticated users.
pub const DEFAULT_USER_LIMIT: i64 = 50;

/// Default 24-hour limit for anonymous clients.
pub const DEFAULT_GUEST_LIMIT: i64 = 3;

/// Rate-limit class of a request identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Authenticated,
    Guest,
}

/// Per-tier request quotas for the trailing window.
#[derive(Debug, Clone)]
pub struct QuotaPolicy {
    pub user_limit: i64,
    pub guest_limit: i64,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self {
            user_limit: DEFAULT_USER_LIMIT,
            guest_limit: DEFAULT_GUEST_LIMIT,
        }
    }
}

impl QuotaPolicy {
    /// The limit applying to a tier.
    pub fn limit_for(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Authenticated => self.user_limit,
            Tier::Guest => self.guest_limit,
        }
    }

    /// Decide whether a request may proceed given the number of prior
    /// requests attributable to the same identity within the window.
    pub fn check(&self, tier: Tier, prior_count: i64) -> Result<(), CoreError> {
        if prior_count >= self.limit_for(tier) {
            Err(CoreError::QuotaExceeded(tier))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn allows_below_the_limit() {
        let policy = QuotaPolicy::default();
        assert!(policy.check(Tier::Guest, 0).is_ok());
        assert!(policy.check(Tier::Guest, DEFAULT_GUEST_LIMIT - 1).is_ok());
    }

    #[test]
    fn denies_at_the_limit() {
        let policy = QuotaPolicy::default();
        assert_matches!(
            policy.check(Tier::Guest, DEFAULT_GUEST_LIMIT),
            Err(CoreError::QuotaExceeded(Tier::Guest))
        );
        assert_matches!(
            policy.check(Tier::Authenticated, DEFAULT_USER_LIMIT),
            Err(CoreError::QuotaExceeded(Tier::Authenticated))
        );
    }

    #[test]
    fn tiers_use_their_own_limits() {
        let policy = QuotaPolicy {
            user_limit: 100,
            guest_limit: 1,
        };
        assert!(policy.check(Tier::Authenticated, 50).is_ok());
        assert!(policy.check(Tier::Guest, 1).is_err());
    }
}
