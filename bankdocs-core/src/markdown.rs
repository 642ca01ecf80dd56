//! Markdown documentation for the schema catalog.
//!
//! The document embeds the Mermaid diagram, then lists one field table per
//! entity (in catalog order) and the relationships. Unlike the diagram, the
//! tables keep full enumeration value lists.

use crate::catalog::SchemaCatalog;
use crate::erd::render_diagram;
use crate::models::Field;

/// Renders the full markdown document for a catalog.
pub fn render_markdown(catalog: &SchemaCatalog) -> String {
    let mut lines: Vec<String> = vec![
        format!("# {}", catalog.title),
        String::new(),
        "## Database Schema".to_string(),
        String::new(),
    ];

    if !catalog.description.is_empty() {
        lines.push(catalog.description.clone());
        lines.push(String::new());
    }

    lines.push("## ERD Diagram".to_string());
    lines.push(String::new());
    lines.push("```mermaid".to_string());
    lines.push(render_diagram(catalog));
    lines.push("```".to_string());
    lines.push(String::new());

    lines.push("## Collections".to_string());
    lines.push(String::new());
    for entity in &catalog.entities {
        lines.push(format!(
            "### {} (Collection: `{}`)",
            entity.name, entity.collection
        ));
        lines.push(String::new());
        lines.push("| Field | Type | Constraints |".to_string());
        lines.push("|-------|------|-------------|".to_string());
        lines.extend(entity.fields.iter().map(table_row));
        lines.push(String::new());
    }

    lines.push("## Relationships".to_string());
    lines.push(String::new());
    for rel in &catalog.relationships {
        lines.push(format!(
            "- **{}.{}** → **{}.{}** ({})",
            rel.from_entity, rel.from_field, rel.to_entity, rel.to_field, rel.cardinality
        ));
        lines.push(format!("  - Relationship: {}", rel.label));
        lines.push(String::new());
    }

    lines.join("\n")
}

fn table_row(field: &Field) -> String {
    let constraints = if field.constraints.is_empty() {
        "-".to_string()
    } else {
        field
            .constraints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!(
        "| `{}` | `{}` | {} |",
        field.name, field.field_type, constraints
    )
}
