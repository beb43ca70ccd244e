//! Access token handling for the remote board
//!
//! The token is pre-obtained (authentication flows are out of scope) and
//! loaded either from the environment or from the configuration file. The
//! wrapper type keeps it out of logs.

use std::env;
use std::fmt;

/// Environment variable holding the board access token.
///
/// Takes precedence over the token stored in the configuration file.
pub const TOKEN_ENV: &str = "SNAPFEED_TOKEN";

/// A board access token that prevents accidental logging.
///
/// The `Debug` and `Display` implementations mask the actual value.
#[derive(Clone)]
pub struct SecretToken {
    value: String,
}

impl SecretToken {
    /// Creates a new token from a string.
    ///
    /// Returns `None` if the value is empty or whitespace-only.
    pub fn new(value: String) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                value: trimmed.to_string(),
            })
        }
    }

    /// Returns the actual token value.
    ///
    /// Use this only when building API requests. Never log the returned
    /// value.
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretToken")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED TOKEN]")
    }
}

/// Resolves the board access token.
///
/// The `SNAPFEED_TOKEN` environment variable wins; otherwise the token from
/// the configuration file is used. Returns `None` when neither is set.
pub fn resolve_token(config_token: &str) -> Option<SecretToken> {
    if let Ok(value) = env::var(TOKEN_ENV) {
        if let Some(token) = SecretToken::new(value) {
            return Some(token);
        }
    }
    SecretToken::new(config_token.to_string())
}

/// Generates a helpful message when no token is configured.
pub fn missing_token_guidance() -> String {
    format!(
        r#"No board access token is configured.

To set up your token:

1. Set the environment variable:
   export {TOKEN_ENV}=your-token-here

2. Or add it to the configuration file:
   [api]
   token = "your-token-here""#
    )
}
