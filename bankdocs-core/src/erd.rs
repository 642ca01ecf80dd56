//! Mermaid `erDiagram` rendering.

use crate::catalog::SchemaCatalog;

/// Renders the catalog as a Mermaid entity-relationship diagram.
///
/// Entities follow the catalog's display order and relationships touching
/// the central entity come last. Enumerations are flattened to `string`.
/// The output has no trailing newline and is byte-identical across calls for
/// an unchanged catalog.
pub fn render_diagram(catalog: &SchemaCatalog) -> String {
    let mut lines: Vec<String> = vec!["erDiagram".to_string(), String::new()];

    for entity in catalog.ordered_entities() {
        lines.push(format!("    {} {{", entity.name));
        for field in &entity.fields {
            let mut line = format!("        {} {}", field.field_type.diagram_token(), field.name);
            if let Some(marker) = field.key_marker() {
                line.push(' ');
                line.push_str(marker);
            }
            lines.push(line);
        }
        lines.push("    }".to_string());
        lines.push(String::new());
    }

    for rel in catalog.ordered_relationships() {
        lines.push(format!(
            "    {} {} {} : \"{}\"",
            rel.from_entity,
            rel.cardinality.glyph(),
            rel.to_entity,
            rel.label
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cardinality, Constraint, EntityDefinition, Field, FieldType, Relationship};

    fn small_catalog() -> SchemaCatalog {
        SchemaCatalog {
            title: "Test".to_string(),
            description: String::new(),
            entities: vec![
                EntityDefinition::new("Wallet", "wallets", "id")
                    .field(Field::new("id", FieldType::String).with(Constraint::PrimaryKey))
                    .field(
                        Field::new("ownerId", FieldType::String)
                            .with(Constraint::foreign_key("Person.id")),
                    )
                    .field(Field::new("tier", FieldType::enumeration(["GOLD", "SILVER"]))),
                EntityDefinition::new("Person", "people", "id")
                    .field(Field::new("id", FieldType::String).with(Constraint::PrimaryKey))
                    .field(Field::new("age", FieldType::Int).with(Constraint::Nullable)),
            ],
            display_order: vec!["Person".to_string(), "Wallet".to_string()],
            central_entity: Some("Wallet".to_string()),
            relationships: vec![
                Relationship::new(
                    ("Person", "id"),
                    ("Wallet", "ownerId"),
                    "owns",
                    Cardinality::OneToMany,
                ),
                Relationship::new(
                    ("Person", "id"),
                    ("Person", "id"),
                    "knows",
                    Cardinality::from("sometimes"),
                ),
            ],
        }
    }

    #[test]
    fn test_render_small_catalog_exactly() {
        let expected = [
            "erDiagram",
            "",
            "    Person {",
            "        string id PK",
            "        int age",
            "    }",
            "",
            "    Wallet {",
            "        string id PK",
            "        string ownerId FK",
            "        string tier",
            "    }",
            "",
            "    Person }o--o{ Person : \"knows\"",
            "    Person ||--o{ Wallet : \"owns\"",
        ]
        .join("\n");

        assert_eq!(render_diagram(&small_catalog()), expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let catalog = SchemaCatalog::mobile_banking();
        assert_eq!(render_diagram(&catalog), render_diagram(&catalog));
    }

    #[test]
    fn test_enum_values_never_reach_diagram() {
        let diagram = render_diagram(&SchemaCatalog::mobile_banking());
        assert!(!diagram.contains('('));
        assert!(!diagram.contains("VERIFIED"));
        assert!(diagram.contains("        string kycStatus\n"));
    }

    #[test]
    fn test_builtin_relationship_lines() {
        let diagram = render_diagram(&SchemaCatalog::mobile_banking());
        let tail: Vec<&str> = diagram.lines().rev().take(2).collect();
        assert_eq!(
            tail,
            [
                "    Transaction }o--|| Account : \"sends/receives\"",
                "    User ||--o{ Account : \"has\"",
            ]
        );
    }
}
