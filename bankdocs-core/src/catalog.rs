//! Declarative schema catalog.
//!
//! A catalog is immutable once loaded. The built-in catalog describes the
//! mobile banking Firestore collections; alternative catalogs can be loaded
//! from JSON files with the same shape.

use crate::error::BankDocsError;
use crate::models::{Cardinality, Constraint, EntityDefinition, Field, FieldType, Relationship};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Complete description of the documented schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Heading of the generated markdown document
    pub title: String,
    /// Intro paragraph for the "Database Schema" section
    #[serde(default)]
    pub description: String,
    /// Entities in catalog order (used for markdown tables)
    pub entities: Vec<EntityDefinition>,
    /// Curated diagram order; entities not listed follow in catalog order
    #[serde(default)]
    pub display_order: Vec<String>,
    /// Entity whose relationships are emitted last in the diagram
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub central_entity: Option<String>,
    /// Descriptive relationships
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl SchemaCatalog {
    /// The catalog of the mobile banking application's collections.
    pub fn mobile_banking() -> Self {
        let string = || FieldType::String;
        let double = || FieldType::Double;
        let timestamp = || FieldType::Timestamp;

        let user = EntityDefinition::new("User", "users", "uid")
            .field(Field::new("uid", string()).with(Constraint::PrimaryKey))
            .field(Field::new("fullName", string()))
            .field(Field::new("email", string()))
            .field(Field::new("role", string()))
            .field(Field::new("phoneNumber", string()))
            .field(Field::new(
                "kycStatus",
                FieldType::enumeration(["VERIFIED", "PENDING", "NONE"]),
            ))
            .field(Field::new("avatarUrl", string()));

        let account = EntityDefinition::new("Account", "accounts", "accountId")
            .field(Field::new("accountId", string()).with(Constraint::PrimaryKey))
            .field(Field::new("ownerId", string()).with(Constraint::foreign_key("User.uid")))
            .field(Field::new(
                "accountType",
                FieldType::enumeration(["CHECKING", "SAVING", "MORTGAGE"]),
            ))
            .field(Field::new("balance", double()))
            .field(Field::new("currency", string()))
            .field(Field::new("interestRate", double()).with(Constraint::Nullable))
            .field(Field::new("termMonth", FieldType::Int).with(Constraint::Nullable))
            .field(Field::new("principalAmount", double()).with(Constraint::Nullable))
            .field(Field::new("mortgageRate", double()).with(Constraint::Nullable))
            .field(Field::new("termMonths", FieldType::Int).with(Constraint::Nullable))
            .field(Field::new("startDate", timestamp()).with(Constraint::Nullable));

        let transaction = EntityDefinition::new("Transaction", "transactions", "transactionId")
            .field(Field::new("transactionId", string()).with(Constraint::PrimaryKey))
            .field(
                Field::new("senderAccountId", string())
                    .with(Constraint::foreign_key("Account.accountId")),
            )
            .field(
                Field::new("receiverAccountId", string())
                    .with(Constraint::foreign_key("Account.accountId")),
            )
            .field(Field::new("amount", double()))
            .field(Field::new(
                "type",
                FieldType::enumeration([
                    "TRANSFER_INTERNAL",
                    "TRANSFER_EXTERNAL",
                    "BILL_PAYMENT",
                    "DEPOSIT",
                    "WITHDRAWAL",
                ]),
            ))
            .field(Field::new(
                "status",
                FieldType::enumeration(["SUCCESS", "FAILED"]),
            ))
            .field(Field::new("timestamp", timestamp()))
            .field(Field::new("description", string()));

        let bill = EntityDefinition::new("Bill", "bills", "billId")
            .field(Field::new("billId", string()).with(Constraint::PrimaryKey))
            .field(Field::new("billCode", string()))
            .field(Field::new("billType", string()))
            .field(Field::new("customerName", string()))
            .field(Field::new("customerCode", string()))
            .field(Field::new("provider", string()))
            .field(Field::new("amount", double()))
            .field(Field::new(
                "status",
                FieldType::enumeration(["UNPAID", "PAID", "OVERDUE", "CANCELLED"]),
            ))
            .field(Field::new("dueDate", timestamp()))
            .field(Field::new("createdAt", timestamp()))
            .field(Field::new("paidAt", timestamp()).with(Constraint::Nullable))
            .field(Field::new("description", string()));

        let branch = EntityDefinition::new("Branch", "branches", "branchId")
            .field(Field::new("branchId", string()).with(Constraint::PrimaryKey))
            .field(Field::new("name", string()))
            .field(Field::new("latitude", double()))
            .field(Field::new("longitude", double()))
            .field(Field::new("address", string()));

        // Sender and receiver are collapsed into one display relationship.
        let relationships = vec![
            Relationship::new(
                ("User", "uid"),
                ("Account", "ownerId"),
                "has",
                Cardinality::OneToMany,
            ),
            Relationship::new(
                ("Transaction", "senderAccountId"),
                ("Account", "accountId"),
                "sends/receives",
                Cardinality::ManyToOne,
            ),
        ];

        Self {
            title: "TDTU Mobile Banking - Entity Relationship Diagram".to_string(),
            description: "The application uses Firebase Firestore as its database. \
                          The collections and the relationships between them are described below."
                .to_string(),
            entities: vec![user, account, transaction, bill, branch],
            display_order: ["User", "Account", "Transaction", "Bill", "Branch"]
                .into_iter()
                .map(String::from)
                .collect(),
            central_entity: Some("Transaction".to_string()),
            relationships,
        }
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    /// - `Io` if the file cannot be read
    /// - `InvalidJson` if the file is not JSON
    /// - `Serialization` if the JSON does not describe a catalog
    /// - `Configuration` if entity names are duplicated
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| BankDocsError::io("read", path, e))?;
        Self::from_json_str(&contents).map_err(|e| match e {
            BankDocsError::InvalidJson { source, .. } => BankDocsError::invalid_json(path, source),
            other => other,
        })
    }

    /// Parses a catalog from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(contents).map_err(|e| {
            if e.is_syntax() || e.is_eof() {
                BankDocsError::InvalidJson {
                    context: "catalog is not valid JSON".to_string(),
                    source: e,
                }
            } else {
                BankDocsError::Serialization {
                    context: "catalog does not match the expected shape".to_string(),
                    source: e,
                }
            }
        })?;

        let mut seen = HashSet::new();
        for entity in &catalog.entities {
            if !seen.insert(entity.name.as_str()) {
                return Err(BankDocsError::configuration(format!(
                    "entity '{}' is defined more than once",
                    entity.name
                )));
            }
        }

        Ok(catalog)
    }

    /// Looks up an entity by name.
    pub fn find_entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Entities in diagram order.
    ///
    /// Display-order entries come first; unknown names are skipped and
    /// unlisted entities follow in catalog order.
    pub fn ordered_entities(&self) -> Vec<&EntityDefinition> {
        let mut ordered: Vec<&EntityDefinition> = Vec::with_capacity(self.entities.len());
        for name in &self.display_order {
            if let Some(entity) = self.find_entity(name)
                && !ordered.iter().any(|e| e.name == entity.name)
            {
                ordered.push(entity);
            }
        }
        for entity in &self.entities {
            if !ordered.iter().any(|e| e.name == entity.name) {
                ordered.push(entity);
            }
        }
        ordered
    }

    /// Relationships in diagram order: those touching the central entity last.
    ///
    /// The sort is stable, so catalog order is kept within each group.
    pub fn ordered_relationships(&self) -> Vec<&Relationship> {
        let mut ordered: Vec<&Relationship> = self.relationships.iter().collect();
        if let Some(central) = self.central_entity.as_deref() {
            ordered.sort_by_key(|rel| rel.touches(central));
        }
        ordered
    }

    /// Reports documentation defects without failing.
    ///
    /// Rendering never depends on these checks; callers log the findings.
    pub fn lint(&self) -> Vec<String> {
        let mut findings = Vec::new();

        for name in &self.display_order {
            if self.find_entity(name).is_none() {
                findings.push(format!("display order names unknown entity '{}'", name));
            }
        }

        if let Some(central) = &self.central_entity
            && self.find_entity(central).is_none()
        {
            findings.push(format!("central entity '{}' is not defined", central));
        }

        for entity in &self.entities {
            if entity.find_field(&entity.primary_key).is_none() {
                findings.push(format!(
                    "{}: primary key '{}' is not a field",
                    entity.name, entity.primary_key
                ));
            }

            for field in &entity.fields {
                for constraint in &field.constraints {
                    let Constraint::ForeignKey { target } = constraint else {
                        continue;
                    };
                    let resolved = constraint.foreign_target().and_then(|(e, f)| {
                        self.find_entity(e).and_then(|entity| entity.find_field(f))
                    });
                    if resolved.is_none() {
                        findings.push(format!(
                            "{}.{}: foreign key target '{}' does not resolve",
                            entity.name, field.name, target
                        ));
                    }
                }
            }
        }

        for rel in &self.relationships {
            for (entity_name, field_name) in [
                (&rel.from_entity, &rel.from_field),
                (&rel.to_entity, &rel.to_field),
            ] {
                match self.find_entity(entity_name) {
                    None => findings.push(format!(
                        "relationship '{}' references unknown entity '{}'",
                        rel.label, entity_name
                    )),
                    Some(entity) if entity.find_field(field_name).is_none() => {
                        findings.push(format!(
                            "relationship '{}' references unknown field '{}.{}'",
                            rel.label, entity_name, field_name
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        findings
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::mobile_banking()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_clean() {
        let catalog = SchemaCatalog::mobile_banking();
        assert_eq!(catalog.entities.len(), 5);
        assert_eq!(catalog.relationships.len(), 2);
        assert!(catalog.lint().is_empty(), "{:?}", catalog.lint());
    }

    #[test]
    fn test_ordered_entities_follow_display_order() {
        let mut catalog = SchemaCatalog::mobile_banking();
        catalog.display_order = vec![
            "Branch".to_string(),
            "Ghost".to_string(),
            "User".to_string(),
        ];

        let names: Vec<&str> = catalog
            .ordered_entities()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, ["Branch", "User", "Account", "Transaction", "Bill"]);
    }

    #[test]
    fn test_central_relationships_sort_last() {
        let mut catalog = SchemaCatalog::mobile_banking();
        catalog.relationships.reverse();
        catalog.relationships.push(Relationship::new(
            ("Bill", "billId"),
            ("Branch", "branchId"),
            "issued at",
            Cardinality::ManyToOne,
        ));

        let labels: Vec<&str> = catalog
            .ordered_relationships()
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, ["has", "issued at", "sends/receives"]);
    }

    #[test]
    fn test_lint_reports_dangling_references() {
        let mut catalog = SchemaCatalog::mobile_banking();
        catalog.relationships.push(Relationship::new(
            ("User", "missingField"),
            ("Nowhere", "id"),
            "broken",
            Cardinality::OneToOne,
        ));
        catalog.central_entity = Some("Ledger".to_string());

        let findings = catalog.lint();
        assert_eq!(findings.len(), 3, "{:?}", findings);
        assert!(findings.iter().any(|f| f.contains("User.missingField")));
        assert!(findings.iter().any(|f| f.contains("'Nowhere'")));
        assert!(findings.iter().any(|f| f.contains("'Ledger'")));
    }

    #[test]
    fn test_json_catalog_round_trips_builtin() {
        let catalog = SchemaCatalog::mobile_banking();
        let json = serde_json::to_string_pretty(&catalog).unwrap();
        assert!(json.contains("\"FK -> User.uid\""));
        assert!(json.contains("\"enum (SUCCESS, FAILED)\""));

        let parsed = SchemaCatalog::from_json_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }

    #[test]
    fn test_json_catalog_rejects_duplicates_and_garbage() {
        let duplicate = r#"{
            "title": "t",
            "entities": [
                {"name": "A", "collection": "a", "primary_key": "id", "fields": []},
                {"name": "A", "collection": "b", "primary_key": "id", "fields": []}
            ]
        }"#;
        assert!(matches!(
            SchemaCatalog::from_json_str(duplicate),
            Err(BankDocsError::Configuration { .. })
        ));

        assert!(matches!(
            SchemaCatalog::from_json_str("{ not json"),
            Err(BankDocsError::InvalidJson { .. })
        ));

        let bad_type = r#"{
            "title": "t",
            "entities": [
                {"name": "A", "collection": "a", "primary_key": "id",
                 "fields": [{"name": "id", "type": "uuid"}]}
            ]
        }"#;
        assert!(matches!(
            SchemaCatalog::from_json_str(bad_type),
            Err(BankDocsError::Serialization { .. })
        ));
    }
}
