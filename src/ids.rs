//! Type-safe ID newtypes for products and variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

macro_rules! define_id {
    ($name:ident, $prefix:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new unique ID.
            pub fn generate() -> Self {
                Self(generate_id($prefix))
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "prod", "Identifier for a product.");
define_id!(VariantId, "var", "Identifier for a product variant.");

/// Prefix plus a hex value derived from the clock and a process-wide
/// counter. The counter keeps IDs generated in the same nanosecond distinct.
fn generate_id(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let count = COUNTER.fetch_add(1, Ordering::SeqCst);

    format!("{}_{:x}", prefix, nanos ^ count.rotate_left(48))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
        assert_eq!(id.to_string(), "prod-123");
    }

    #[test]
    fn test_id_generation_unique() {
        let a = VariantId::generate();
        let b = VariantId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("var_"));
    }

    #[test]
    fn test_id_from_conversions() {
        let from_str = ProductId::from("p1");
        let from_string = ProductId::from("p1".to_string());
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.into_inner(), "p1");
    }

    #[test]
    fn test_id_serde_round_trip() {
        let id = VariantId::new("var_42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"var_42\"");
        let back: VariantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
