use serde::{Deserialize, Serialize};
use std::fmt;

/// Role labels as understood by the client.
///
/// The backend is inconsistent about prefixes (`ADMIN` vs `ROLE_ADMIN`) and
/// about how many labels it sends, so labels are normalised before comparison
/// and roles are ranked explicitly instead of relying on array position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
    Other(String),
}

impl Role {
    const PREFIX: &'static str = "ROLE_";

    /// Parse a backend role label
    pub fn parse(label: &str) -> Self {
        let normalized = Self::normalize_label(label);
        match normalized.as_str() {
            "ADMIN" => Role::Admin,
            "USER" => Role::User,
            _ => Role::Other(normalized),
        }
    }

    /// Upper-case the label and strip the `ROLE_` prefix
    pub fn normalize_label(label: &str) -> String {
        let upper = label.trim().to_uppercase();
        match upper.strip_prefix(Self::PREFIX) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => upper,
        }
    }

    /// Label without prefix
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Other(label) => label,
        }
    }

    /// Privilege rank; higher wins when choosing a display role
    pub fn privilege(&self) -> u8 {
        match self {
            Role::Admin => 2,
            Role::User => 1,
            Role::Other(_) => 0,
        }
    }

    /// Highest-privilege role among `labels`. Ties keep the first label seen.
    pub fn highest<'a, I>(labels: I) -> Option<Role>
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .map(Role::parse)
            .fold(None, |best: Option<Role>, role| match best {
                Some(current) if current.privilege() >= role.privilege() => Some(current),
                _ => Some(role),
            })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    Compact,
    #[default]
    Comfortable,
    Spacious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStyle {
    #[default]
    Rounded,
    Sharp,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
    MobilePayment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_strips_prefix() {
        assert_eq!(Role::parse("ROLE_ADMIN"), Role::Admin);
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("USER"), Role::User);
        assert_eq!(Role::parse("role_auditor"), Role::Other("AUDITOR".to_string()));
        // A bare prefix is kept as-is rather than becoming an empty label
        assert_eq!(Role::parse("ROLE_"), Role::Other("ROLE_".to_string()));
    }

    #[test]
    fn test_highest_role_ignores_position() {
        assert_eq!(Role::highest(["USER", "ADMIN"]), Some(Role::Admin));
        assert_eq!(Role::highest(["ADMIN"]), Some(Role::Admin));
        assert_eq!(Role::highest(["ROLE_USER", "AUDITOR"]), Some(Role::User));
        assert_eq!(Role::highest(["AUDITOR", "CLERK"]), Some(Role::Other("AUDITOR".into())));
        assert_eq!(Role::highest(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_payment_method_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"BANK_TRANSFER\"");
        let parsed: PaymentMethod = serde_json::from_str("\"MOBILE_PAYMENT\"").unwrap();
        assert_eq!(parsed, PaymentMethod::MobilePayment);
    }
}
