use serde::{Deserialize, Serialize};

/// Declares a transparent string identifier with the usual conversions.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create from anything string-like
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get as string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is blank after trimming
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
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

string_id!(
    /// Tenant identifier derived from the first host label (`acme` in `acme.example.com`)
    TenantKey
);
string_id!(
    /// Product code chosen by the tenant
    ProductId
);
string_id!(SupplierId);
string_id!(
    /// Supplier invoice number; also half of a product batch key
    InvoiceNo
);
string_id!(TransactionId);
string_id!(Username);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ProductId::new("SKU-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"SKU-1\"");

        let parsed: InvoiceNo = serde_json::from_str("\"INV-9\"").unwrap();
        assert_eq!(parsed.as_str(), "INV-9");
    }

    #[test]
    fn test_blank_detection() {
        assert!(SupplierId::new("   ").is_blank());
        assert!(!SupplierId::new("S1").is_blank());
    }
}
