//! Component M — Auth Provider.
//!
//! Bearer-token acquisition is an injected capability (§1 non-goals): real OAuth flows are
//! out of scope here, but the seam a production deployment would plug into is defined and
//! shipped with the one implementation a test harness actually needs.

use crate::error::HarnessError;

/// Supplies a bearer token for a given OAuth scope. Implementations may cache, refresh, or
/// (as here) simply hand back a pre-fetched token.
pub trait AuthProvider: Send + Sync {
    fn token(&self, scope: &str) -> Result<String, HarnessError>;
}

/// Wraps a single pre-fetched bearer token and returns it regardless of scope. Used by the
/// CLI when a `--bearer-token` flag or `RID_HARNESS_TOKEN` env var is supplied, and by every
/// test in this crate.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl AuthProvider for StaticTokenProvider {
    fn token(&self, _scope: &str) -> Result<String, HarnessError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_the_same_token_regardless_of_scope() {
        let provider = StaticTokenProvider::new("abc123");
        assert_eq!(provider.token("rid.display_provider").unwrap(), "abc123");
        assert_eq!(provider.token("rid.inject_test_data").unwrap(), "abc123");
    }
}
