use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `{"success": true, "message": ...}` plus any fields of `data`, or a check line
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "success": true, "message": message });
            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }
            print_json(&response)
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            Ok(())
        }
    }
}

/// JSON errors go to stdout with their code; text errors go to stderr
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "success": false, "error": message });
            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }
            print_json(&response)
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
            Ok(())
        }
    }
}

pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&json!({ collection_name: [], "count": 0 })),
        OutputFormat::Text => {
            println!("{}", message);
            Ok(())
        }
    }
}

/// Output a list of entities: a JSON array, or one summary line per item
pub fn output_items<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[&T],
) -> anyhow::Result<()> {
    if items.is_empty() {
        return output_empty_collection(
            output_format,
            collection_name,
            &format!("No {} found", collection_name),
        );
    }

    match output_format {
        OutputFormat::Json => {
            print_json(&json!({ collection_name: items, "count": items.len() }))?;
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", summary_line(&serde_json::to_value(item)?));
            }
            println!("{} {}", items.len(), collection_name);
        }
    }
    Ok(())
}

/// Output a single entity
pub fn output_item<T: Serialize>(output_format: &OutputFormat, item: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(item)?;
    match output_format {
        OutputFormat::Json => print_json(&value)?,
        OutputFormat::Text => {
            if let Value::Object(fields) = &value {
                for (key, field) in fields {
                    if !field.is_null() {
                        println!("{:<24} {}", key, field);
                    }
                }
            }
        }
    }
    Ok(())
}

// id followed by the first descriptive field the record has
fn summary_line(value: &Value) -> String {
    let id = value.get("id").and_then(Value::as_str).unwrap_or("-");
    let label = ["title", "name", "city", "status", "type"]
        .iter()
        .find_map(|key| value.get(*key))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();
    format!("{:<38} {}", id, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prefers_title_then_name() {
        let line = summary_line(&json!({"id": "a1", "name": "Inn", "title": "Sea view"}));
        assert!(line.starts_with("a1"));
        assert!(line.ends_with("Sea view"));
        assert!(summary_line(&json!({"id": "b2", "status": "Paid"})).ends_with("Paid"));
        assert!(summary_line(&json!({})).starts_with('-'));
    }
}
