//! Product name type.
//!
//! Catalog entries have no numeric id; the name is the primary key for the
//! catalog, the cart and the favorites set.

use core::borrow::Borrow;
use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The input string is empty or whitespace only.
    #[error("product name cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("product name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The unique name of a dessert.
///
/// Names are compared exactly (case-sensitive). The original spelling is kept
/// as-is, including surrounding whitespace, so a name read back from storage
/// matches the catalog byte for byte.
///
/// ## Constraints
///
/// - Must contain at least one non-whitespace character
/// - At most 120 characters
///
/// ## Examples
///
/// ```
/// use dessert_storefront_core::ProductName;
///
/// assert!(ProductName::parse("Waffle with Berries").is_ok());
/// assert!(ProductName::parse("").is_err());
/// assert!(ProductName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Maximum length of a product name, in characters.
    pub const MAX_LENGTH: usize = 120;

    /// Parse a `ProductName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        Self::try_from(s.to_owned())
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductName {
    type Error = NameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(NameError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s))
    }
}

impl From<ProductName> for String {
    fn from(name: ProductName) -> Self {
        name.0
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for ProductName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
