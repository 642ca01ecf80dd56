//! Data models for the described schema.
//!
//! Entities, fields and relationships are immutable descriptions used only
//! for rendering documentation. Field types and constraints keep the textual
//! notation used in catalog files (`enum (A, B)`, `FK -> User.uid`) so that
//! serialized catalogs stay readable.

use crate::error::BankDocsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag of a described field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit floating point number
    Double,
    /// Integer
    Int,
    /// Point in time
    Timestamp,
    /// String restricted to an explicit value set
    Enum {
        /// Allowed values, in declaration order
        values: Vec<String>,
    },
}

impl FieldType {
    /// Builds an enumeration type from its value set.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Type token used in diagram output.
    ///
    /// The diagram grammar has no enumerated value lists, so enums collapse
    /// to `string`.
    pub const fn diagram_token(&self) -> &'static str {
        match self {
            Self::String | Self::Enum { .. } => "string",
            Self::Double => "double",
            Self::Int => "int",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum { values } => write!(f, "enum ({})", values.join(", ")),
            other => f.write_str(other.diagram_token()),
        }
    }
}

impl FromStr for FieldType {
    type Err = BankDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "string" => return Ok(Self::String),
            "double" => return Ok(Self::Double),
            "int" => return Ok(Self::Int),
            "timestamp" => return Ok(Self::Timestamp),
            _ => {}
        }

        let Some(rest) = trimmed.strip_prefix("enum") else {
            return Err(BankDocsError::configuration(format!(
                "unknown field type '{}'",
                trimmed
            )));
        };

        let inner = rest
            .trim()
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(|| {
                BankDocsError::configuration(format!(
                    "enum type must list its values in parentheses: '{}'",
                    trimmed
                ))
            })?;

        let values: Vec<String> = inner
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
            .collect();

        if values.is_empty() {
            return Err(BankDocsError::configuration(format!(
                "enum type has no values: '{}'",
                trimmed
            )));
        }

        Ok(Self::Enum { values })
    }
}

impl TryFrom<String> for FieldType {
    type Error = BankDocsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}

/// Constraint annotation attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Constraint {
    /// Field is the entity's unique identifier
    PrimaryKey,
    /// Field references another entity's field
    ForeignKey {
        /// Free-text target, conventionally `Entity.field`
        target: String,
    },
    /// Field may be absent
    Nullable,
}

impl Constraint {
    /// Creates a foreign key constraint pointing at `target`.
    pub fn foreign_key(target: impl Into<String>) -> Self {
        Self::ForeignKey {
            target: target.into(),
        }
    }

    /// Splits a foreign key target into `(entity, field)` when it has that form.
    pub fn foreign_target(&self) -> Option<(&str, &str)> {
        match self {
            Self::ForeignKey { target } => target.split_once('.'),
            _ => None,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKey => f.write_str("PK"),
            Self::ForeignKey { target } => write!(f, "FK -> {}", target),
            Self::Nullable => f.write_str("nullable"),
        }
    }
}

impl FromStr for Constraint {
    type Err = BankDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "PK" => Ok(Self::PrimaryKey),
            "nullable" => Ok(Self::Nullable),
            _ => {
                let target = trimmed
                    .strip_prefix("FK")
                    .map(str::trim_start)
                    .and_then(|r| r.strip_prefix("->"))
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        BankDocsError::configuration(format!(
                            "unknown constraint '{}' (expected PK, nullable or FK -> Entity.field)",
                            trimmed
                        ))
                    })?;
                Ok(Self::foreign_key(target))
            }
        }
    }
}

impl TryFrom<String> for Constraint {
    type Error = BankDocsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Constraint> for String {
    fn from(value: Constraint) -> Self {
        value.to_string()
    }
}

/// A described field of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as stored in documents
    pub name: String,
    /// Field type tag
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Constraint annotations, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl Field {
    /// Creates an unconstrained field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint annotation.
    #[must_use]
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Whether the field is tagged PK.
    pub fn is_primary_key(&self) -> bool {
        self.constraints.contains(&Constraint::PrimaryKey)
    }

    /// Whether the field is tagged FK.
    pub fn is_foreign_key(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| matches!(c, Constraint::ForeignKey { .. }))
    }

    /// Whether the field is tagged nullable.
    pub fn is_nullable(&self) -> bool {
        self.constraints.contains(&Constraint::Nullable)
    }

    /// Key marker shown after the field in diagrams. PK wins over FK.
    pub fn key_marker(&self) -> Option<&'static str> {
        if self.is_primary_key() {
            Some("PK")
        } else if self.is_foreign_key() {
            Some("FK")
        } else {
            None
        }
    }
}

/// A described record type mapped onto one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Display name
    pub name: String,
    /// Storage collection name
    pub collection: String,
    /// Name of the identifying field
    pub primary_key: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
}

impl EntityDefinition {
    /// Creates an entity without fields.
    pub fn new(
        name: impl Into<String>,
        collection: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            collection: collection.into(),
            primary_key: primary_key.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a field by name.
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Described multiplicity of a relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cardinality {
    /// `one-to-many`
    OneToMany,
    /// `many-to-one`
    ManyToOne,
    /// `one-to-one`
    OneToOne,
    /// `many-to-many`
    ManyToMany,
    /// Any other text; rendered like many-to-many
    Unrecognized(String),
}

impl Cardinality {
    /// Mermaid relationship glyph for this cardinality.
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::OneToMany => "||--o{",
            Self::ManyToOne => "}o--||",
            Self::OneToOne => "||--||",
            Self::ManyToMany | Self::Unrecognized(_) => "}o--o{",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneToMany => f.write_str("one-to-many"),
            Self::ManyToOne => f.write_str("many-to-one"),
            Self::OneToOne => f.write_str("one-to-one"),
            Self::ManyToMany => f.write_str("many-to-many"),
            Self::Unrecognized(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Cardinality {
    fn from(value: &str) -> Self {
        match value {
            "one-to-many" => Self::OneToMany,
            "many-to-one" => Self::ManyToOne,
            "one-to-one" => Self::OneToOne,
            "many-to-many" => Self::ManyToMany,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for Cardinality {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Cardinality> for String {
    fn from(value: Cardinality) -> Self {
        value.to_string()
    }
}

/// Directed, purely descriptive relationship between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Source entity name
    pub from_entity: String,
    /// Field on the source entity
    pub from_field: String,
    /// Target entity name
    pub to_entity: String,
    /// Field on the target entity
    pub to_field: String,
    /// Label shown on the diagram edge
    pub label: String,
    /// Described multiplicity
    pub cardinality: Cardinality,
}

impl Relationship {
    /// Creates a relationship between `from.field` and `to.field`.
    pub fn new(
        (from_entity, from_field): (&str, &str),
        (to_entity, to_field): (&str, &str),
        label: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            from_entity: from_entity.to_string(),
            from_field: from_field.to_string(),
            to_entity: to_entity.to_string(),
            to_field: to_field.to_string(),
            label: label.into(),
            cardinality,
        }
    }

    /// Whether either end of the relationship is `entity`.
    pub fn touches(&self, entity: &str) -> bool {
        self.from_entity == entity || self.to_entity == entity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_parsing() {
        assert_eq!("string".parse::<FieldType>().unwrap(), FieldType::String);
        assert_eq!(" double ".parse::<FieldType>().unwrap(), FieldType::Double);
        assert_eq!(
            "enum (SUCCESS, FAILED)".parse::<FieldType>().unwrap(),
            FieldType::enumeration(["SUCCESS", "FAILED"])
        );
        assert!("bool".parse::<FieldType>().is_err());
        assert!("enum".parse::<FieldType>().is_err());
        assert!("enum ()".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_enum_display_keeps_values() {
        let kyc = FieldType::enumeration(["VERIFIED", "PENDING", "NONE"]);
        assert_eq!(kyc.to_string(), "enum (VERIFIED, PENDING, NONE)");
        assert_eq!(kyc.diagram_token(), "string");
    }

    #[test]
    fn test_constraint_parsing() {
        assert_eq!("PK".parse::<Constraint>().unwrap(), Constraint::PrimaryKey);
        assert_eq!(
            "nullable".parse::<Constraint>().unwrap(),
            Constraint::Nullable
        );
        assert_eq!(
            "FK -> User.uid".parse::<Constraint>().unwrap(),
            Constraint::foreign_key("User.uid")
        );
        assert!("FK".parse::<Constraint>().is_err());
        assert!("unique".parse::<Constraint>().is_err());
    }

    #[test]
    fn test_foreign_target_split() {
        let fk = Constraint::foreign_key("Account.accountId");
        assert_eq!(fk.foreign_target(), Some(("Account", "accountId")));
        assert_eq!(Constraint::foreign_key("Account").foreign_target(), None);
        assert_eq!(Constraint::PrimaryKey.foreign_target(), None);
    }

    #[test]
    fn test_key_marker_prefers_primary_key() {
        let both = Field::new("id", FieldType::String)
            .with(Constraint::PrimaryKey)
            .with(Constraint::foreign_key("Other.id"));
        assert_eq!(both.key_marker(), Some("PK"));

        let fk = Field::new("ownerId", FieldType::String).with(Constraint::foreign_key("User.uid"));
        assert_eq!(fk.key_marker(), Some("FK"));

        let nullable = Field::new("paidAt", FieldType::Timestamp).with(Constraint::Nullable);
        assert_eq!(nullable.key_marker(), None);
        assert!(nullable.is_nullable());
    }

    #[test]
    fn test_cardinality_glyphs() {
        assert_eq!(Cardinality::from("one-to-many").glyph(), "||--o{");
        assert_eq!(Cardinality::from("many-to-one").glyph(), "}o--||");
        assert_eq!(Cardinality::from("one-to-one").glyph(), "||--||");
        assert_eq!(Cardinality::from("many-to-many").glyph(), "}o--o{");

        let odd = Cardinality::from("zero-or-one");
        assert_eq!(odd.glyph(), "}o--o{");
        assert_eq!(odd.to_string(), "zero-or-one");
    }

    #[test]
    fn test_field_serde_uses_text_notation() {
        let field = Field::new("status", FieldType::enumeration(["PAID", "UNPAID"]))
            .with(Constraint::Nullable);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "status",
                "type": "enum (PAID, UNPAID)",
                "constraints": ["nullable"]
            })
        );

        let back: Field = serde_json::from_value(json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn test_relationship_touches() {
        let rel = Relationship::new(
            ("Transaction", "senderAccountId"),
            ("Account", "accountId"),
            "sends/receives",
            Cardinality::ManyToOne,
        );
        assert!(rel.touches("Transaction"));
        assert!(rel.touches("Account"));
        assert!(!rel.touches("User"));
    }
}
