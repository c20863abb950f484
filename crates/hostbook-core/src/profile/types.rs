//! Profile types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known field names shared by most profile schemas
pub mod fields {
    pub const HOST: &str = "host";
    pub const PORT: &str = "port";
    pub const USER: &str = "user";
    pub const PASSWORD: &str = "password";
    pub const REJECT_UNAUTHORIZED: &str = "rejectUnauthorized";
    pub const BASE_PATH: &str = "basePath";
    pub const PROTOCOL: &str = "protocol";
    pub const KEY_PASSPHRASE: &str = "keyPassphrase";

    /// Optional fields that are removed instead of persisted as empty strings
    pub const STRIP_WHEN_EMPTY: [&str; 3] = [USER, PASSWORD, BASE_PATH];

    /// Fields never shown in clear
    pub const SECRETS: [&str; 2] = [PASSWORD, KEY_PASSPHRASE];

    /// Whether a field holds a secret
    #[must_use]
    pub fn is_secret(name: &str) -> bool {
        SECRETS.contains(&name)
    }
}

/// A bag of collected field values. A `Value::Null` entry means "remove
/// this field" when applied to a profile.
pub type FieldValues = Map<String, Value>;

/// A named connection profile for one backend type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name, unique across all types (compared ignoring case)
    pub name: String,
    /// Backend type this profile belongs to
    #[serde(rename = "type")]
    pub profile_type: String,
    /// Schema-defined fields
    #[serde(default)]
    pub fields: FieldValues,
}

impl Profile {
    /// Create an empty profile with the given name and type
    #[must_use]
    pub fn new(name: impl Into<String>, profile_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_type: profile_type.into(),
            fields: Map::new(),
        }
    }

    /// Set a field, builder style
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Whether this profile's name matches `other`, ignoring case
    #[must_use]
    pub fn name_matches(&self, other: &str) -> bool {
        names_equal(&self.name, other)
    }

    /// Get a string field
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Host name, if configured and non-empty
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.get_str(fields::HOST).filter(|h| !h.is_empty())
    }

    /// Port, if configured and non-zero
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.fields
            .get(fields::PORT)
            .and_then(Value::as_u64)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p != 0)
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.get_str(fields::USER).filter(|u| !u.is_empty())
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.get_str(fields::PASSWORD).filter(|p| !p.is_empty())
    }

    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.get_str(fields::BASE_PATH).filter(|p| !p.is_empty())
    }

    /// Whether self-signed certificates are rejected (defaults to true)
    #[must_use]
    pub fn reject_unauthorized(&self) -> bool {
        self.fields
            .get(fields::REJECT_UNAUTHORIZED)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Apply collected values: null removes a field, anything else replaces it
    pub fn apply_fields(&mut self, values: &FieldValues) {
        for (key, value) in values {
            if value.is_null() {
                self.fields.remove(key);
            } else {
                self.fields.insert(key.clone(), value.clone());
            }
        }
    }

    /// Drop optional fields that ended up empty rather than persisting them
    pub fn strip_empty_optional(&mut self) {
        for key in fields::STRIP_WHEN_EMPTY {
            let empty = match self.fields.get(key) {
                Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                _ => false,
            };
            if empty {
                self.fields.remove(key);
            }
        }
    }

    /// Copy of this profile with every secret field masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for (key, value) in &mut copy.fields {
            if fields::is_secret(key) && !value.is_null() {
                *value = Value::String("****".into());
            }
        }
        copy
    }
}

/// Compare two profile names ignoring case
#[must_use]
pub fn names_equal(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_fields_null_removes() {
        let mut profile = Profile::new("dev", "http")
            .with_field(fields::HOST, "example.com")
            .with_field(fields::USER, "alice");

        let mut values = FieldValues::new();
        values.insert(fields::USER.into(), Value::Null);
        values.insert(fields::PORT.into(), json!(8443));
        profile.apply_fields(&values);

        assert_eq!(profile.host(), Some("example.com"));
        assert_eq!(profile.user(), None);
        assert!(!profile.fields.contains_key(fields::USER));
        assert_eq!(profile.port(), Some(8443));
    }

    #[test]
    fn test_strip_empty_optional() {
        let mut profile = Profile::new("dev", "http")
            .with_field(fields::USER, "")
            .with_field(fields::PASSWORD, Value::Null)
            .with_field(fields::BASE_PATH, "  ")
            .with_field(fields::HOST, "");

        profile.strip_empty_optional();

        assert!(!profile.fields.contains_key(fields::USER));
        assert!(!profile.fields.contains_key(fields::PASSWORD));
        assert!(!profile.fields.contains_key(fields::BASE_PATH));
        // host is not optional, an empty host means "no endpoint"
        assert!(profile.fields.contains_key(fields::HOST));
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let profile = Profile::new("MyLpar", "ssh");
        assert!(profile.name_matches("mylpar"));
        assert!(profile.name_matches("MYLPAR"));
        assert!(!profile.name_matches("mylpar2"));
    }

    #[test]
    fn test_serialized_type_key() {
        let profile = Profile::new("dev", "http").with_field(fields::PORT, 443);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["type"], "http");
        assert_eq!(json["fields"]["port"], 443);
    }

    #[test]
    fn test_redacted_masks_password() {
        let profile = Profile::new("dev", "http").with_field(fields::PASSWORD, "secret");
        assert_eq!(profile.redacted().password(), Some("****"));
        assert_eq!(profile.password(), Some("secret"));
    }

    #[test]
    fn test_redacted_masks_key_passphrase() {
        let profile = Profile::new("jump", "ssh")
            .with_field(fields::USER, "ops")
            .with_field("privateKey", "/home/ops/.ssh/id_ed25519")
            .with_field(fields::KEY_PASSPHRASE, "s3cret");

        let shown = profile.redacted();
        assert_eq!(shown.get_str(fields::KEY_PASSPHRASE), Some("****"));
        assert_eq!(shown.get_str("privateKey"), Some("/home/ops/.ssh/id_ed25519"));
        assert_eq!(shown.user(), Some("ops"));
        assert!(!serde_json::to_string(&shown).unwrap().contains("s3cret"));
    }
}
