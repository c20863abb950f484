//! `hostbook types`

use serde_json::json;
use std::error::Error;

use hostbook_core::TypeCatalog;

pub fn execute(catalog: &TypeCatalog, json_output: bool) -> Result<(), Box<dyn Error>> {
    let types = catalog.types();

    if json_output {
        let entries: Vec<serde_json::Value> = types
            .iter()
            .filter_map(|t| catalog.schema(t))
            .map(|schema| {
                json!({
                    "type": schema.profile_type,
                    "fields": schema.fields,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for schema in types.iter().filter_map(|t| catalog.schema(t)) {
        println!("{}", schema.profile_type);
        for field in &schema.fields {
            let default = field
                .default
                .as_ref()
                .map(|d| format!(" (default {d})"))
                .unwrap_or_default();
            println!("  {} : {}{default}", field.name, field.field_type.resolve());
        }
    }
    Ok(())
}
