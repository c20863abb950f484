//! Profile-type schemas and the type catalog
//!
//! A schema is an ordered list of fields, each with a type descriptor, an
//! optional default and an optional description. Schemas drive interactive
//! field collection. The catalog holds one schema per registered type.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::types::fields;

/// Reserved type holding the shared base profile template
pub const BASE_TYPE: &str = "base";

/// Primitive field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Schema type descriptor: a single type or a set of alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(FieldType),
    Alternatives(Vec<FieldType>),
}

impl SchemaType {
    /// Resolve to one concrete type, preferring boolean, then number, then string
    #[must_use]
    pub fn resolve(&self) -> FieldType {
        match self {
            Self::Single(t) => *t,
            Self::Alternatives(options) => [FieldType::Boolean, FieldType::Number]
                .into_iter()
                .find(|t| options.contains(t))
                .unwrap_or(FieldType::String),
        }
    }
}

impl From<FieldType> for SchemaType {
    fn from(t: FieldType) -> Self {
        Self::Single(t)
    }
}

/// One field of a profile schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Type descriptor
    #[serde(rename = "type")]
    pub field_type: SchemaType,
    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Prompt text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSchema {
    /// Create a field with no default or description
    pub fn new(name: impl Into<String>, field_type: impl Into<SchemaType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            default: None,
            description: None,
        }
    }

    /// Add a default value
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Add a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Schema for one profile type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSchema {
    /// Type name
    #[serde(rename = "type")]
    pub profile_type: String,
    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl ProfileSchema {
    pub fn new(profile_type: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            profile_type: profile_type.into(),
            fields,
        }
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Default value of a field, if the field exists and has one
    #[must_use]
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(|f| f.default.as_ref())
    }
}

/// Registered profile types and their schemas
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    schemas: Vec<ProfileSchema>,
}

impl TypeCatalog {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in `base`, `http`, `ssh` and `ftp` types
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for schema in builtin_schemas() {
            catalog.register(schema);
        }
        catalog
    }

    /// Register a schema, replacing any existing schema for the same type
    pub fn register(&mut self, schema: ProfileSchema) {
        if let Some(existing) = self
            .schemas
            .iter_mut()
            .find(|s| s.profile_type == schema.profile_type)
        {
            *existing = schema;
        } else {
            self.schemas.push(schema);
        }
    }

    /// Load every `*.json` schema in a directory.
    ///
    /// Unreadable or malformed files are skipped; their messages are returned
    /// as warnings.
    pub fn load_dir(&mut self, dir: &Path) -> Vec<String> {
        let mut warnings = Vec::new();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                if dir.exists() {
                    warnings.push(format!("Failed to read schema dir {}: {e}", dir.display()));
                }
                return warnings;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|s| {
                    serde_json::from_str::<ProfileSchema>(&s).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(schema) => {
                    tracing::debug!(profile_type = %schema.profile_type, path = %path.display(), "loaded schema");
                    self.register(schema);
                }
                Err(e) => warnings.push(format!("Failed to load schema {}: {e}", path.display())),
            }
        }

        warnings
    }

    /// Schema for a type
    #[must_use]
    pub fn schema(&self, profile_type: &str) -> Option<&ProfileSchema> {
        self.schemas.iter().find(|s| s.profile_type == profile_type)
    }

    /// Registered profile types, excluding the base template type
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        self.schemas
            .iter()
            .filter(|s| s.profile_type != BASE_TYPE)
            .map(|s| s.profile_type.clone())
            .collect()
    }

    /// Whether a type is registered
    #[must_use]
    pub fn contains(&self, profile_type: &str) -> bool {
        self.schema(profile_type).is_some()
    }
}

fn connection_fields(default_port: Option<u16>) -> Vec<FieldSchema> {
    let mut port = FieldSchema::new(fields::PORT, FieldType::Number)
        .with_description("Port number of the service");
    if let Some(p) = default_port {
        port = port.with_default(p);
    }
    vec![
        FieldSchema::new(fields::HOST, FieldType::String)
            .with_description("Host name of the service"),
        port,
        FieldSchema::new(fields::USER, FieldType::String)
            .with_description("User name to authenticate to the service"),
        FieldSchema::new(fields::PASSWORD, FieldType::String)
            .with_description("Password to authenticate to the service"),
    ]
}

fn builtin_schemas() -> Vec<ProfileSchema> {
    let mut base = connection_fields(None);
    base.push(
        FieldSchema::new(fields::REJECT_UNAUTHORIZED, FieldType::Boolean)
            .with_default(true)
            .with_description("Reject self-signed certificates"),
    );

    let mut http = connection_fields(Some(443));
    http.extend([
        FieldSchema::new(fields::REJECT_UNAUTHORIZED, FieldType::Boolean)
            .with_default(true)
            .with_description("Reject self-signed certificates"),
        FieldSchema::new(fields::BASE_PATH, FieldType::String)
            .with_description("Base path prepended to every request URL"),
        FieldSchema::new(fields::PROTOCOL, FieldType::String)
            .with_default("https")
            .with_description("Protocol used to reach the service (http or https)"),
    ]);

    let mut ssh = connection_fields(Some(22));
    ssh.extend([
        FieldSchema::new("privateKey", FieldType::String)
            .with_description("Path to a private key file"),
        FieldSchema::new(fields::KEY_PASSPHRASE, FieldType::String)
            .with_description("Passphrase that unlocks the private key"),
        FieldSchema::new("handshakeTimeout", FieldType::Number)
            .with_description("Milliseconds to wait for the SSH handshake"),
    ]);

    let mut ftp = connection_fields(Some(21));
    ftp.extend([
        FieldSchema::new(
            "secureFtp",
            SchemaType::Alternatives(vec![FieldType::Boolean, FieldType::String]),
        )
        .with_default(json!(true))
        .with_description("Use FTPS for the connection"),
        FieldSchema::new("connectionTimeout", FieldType::Number)
            .with_default(10_000)
            .with_description("Milliseconds to wait for the connection"),
    ]);

    vec![
        ProfileSchema::new(BASE_TYPE, base),
        ProfileSchema::new("http", http),
        ProfileSchema::new("ssh", ssh),
        ProfileSchema::new("ftp", ftp),
    ]
}
