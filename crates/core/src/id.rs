//! Strongly-typed identifiers for stored records.
//!
//! Both record kinds use database surrogate keys (`INTEGER` columns), so the
//! newtypes wrap `i32`.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i32);

/// Identifier of a question.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i32);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i32 {
                self.0
            }

            /// Convert a JSON-sized integer, rejecting values outside the key range.
            pub fn try_from_i64(raw: i64) -> Result<Self, DomainError> {
                i32::try_from(raw)
                    .map(Self)
                    .map_err(|_| DomainError::invalid_id(format!("{}: {} is out of range", $name, raw)))
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i32> for $t {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i32 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = i32::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

impl_int_newtype!(CategoryId, "CategoryId");
impl_int_newtype!(QuestionId, "QuestionId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_ids() {
        let id: QuestionId = "23".parse().unwrap();
        assert_eq!(id, QuestionId::new(23));
        assert_eq!(id.to_string(), "23");
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "abc".parse::<CategoryId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn rejects_ids_outside_key_range() {
        assert!(QuestionId::try_from_i64(i64::from(i32::MAX) + 1).is_err());
        assert_eq!(CategoryId::try_from_i64(6).unwrap().get(), 6);
    }
}
