use std::fmt;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::account::AccountInfo;

/// Ordered list of permission strings requested for a token.
///
/// # Example
/// ```
/// use token_supplier::auth::Scopes;
///
/// let scopes: Scopes = "User.Read, Mail.Read".parse().unwrap();
/// assert_eq!(scopes.as_slice(), ["User.Read", "Mail.Read"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scopes(Vec<String>);

impl Scopes {
    /// Entries are kept exactly as given.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(scopes.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for Scopes {
    fn from(scopes: Vec<String>) -> Self {
        Self::new(scopes)
    }
}

impl From<&[&str]> for Scopes {
    fn from(scopes: &[&str]) -> Self {
        Self::new(scopes.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Scopes {
    fn from(scopes: [&str; N]) -> Self {
        Self::new(scopes)
    }
}

impl FromStr for Scopes {
    type Err = std::convert::Infallible;

    /// Accepts whitespace and/or comma separated scopes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|scope| !scope.is_empty()),
        ))
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Arguments shared by silent and interactive acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct TokenRequest {
    pub scopes: Scopes,
    pub account: AccountInfo,
}
