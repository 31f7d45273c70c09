//! Operator input for a conversion run.

use std::fmt;

/// Design-platform personal access token.
///
/// Held only in memory for one run. `Debug` and `Display` redact the value so
/// the token cannot leak through logs or error messages; the only way to read
/// it is [`AccessToken::expose`], which the invoker uses to populate the child
/// process environment.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token. Do not log.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when the token is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl From<String> for AccessToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The two form fields the operator submits.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub access_token: AccessToken,
    pub figma_url: String,
}

impl ConversionRequest {
    pub fn new(access_token: impl Into<AccessToken>, figma_url: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            figma_url: figma_url.into(),
        }
    }
}
