use serde_json::Value;

use super::compare::{lookup, scalar_text};

/// Case-insensitive substring search across the given fields, or every
/// top-level field when none are given
pub fn matches_search(item: &Value, query: &str, fields: Option<&[String]>) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    let hit = |value: Option<&Value>| {
        value
            .and_then(scalar_text)
            .map_or(false, |text| text.to_lowercase().contains(&needle))
    };

    match fields {
        Some(fields) => fields.iter().any(|field| hit(lookup(item, field))),
        None => item
            .as_object()
            .map_or(false, |obj| obj.values().any(|value| hit(Some(value)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn searches_named_fields_only() {
        let item = json!({"name": "Seaside Loft", "notes": "near the harbour"});
        let fields = vec!["name".to_string()];
        assert!(matches_search(&item, "LOFT", Some(&fields)));
        assert!(!matches_search(&item, "harbour", Some(&fields)));
        assert!(matches_search(&item, "harbour", None));
    }

    #[test]
    fn numbers_and_booleans_participate() {
        let item = json!({"rooms": 12, "featured": true, "tags": ["harbour"]});
        assert!(matches_search(&item, "12", None));
        assert!(matches_search(&item, "true", None));
        assert!(!matches_search(&item, "harbour", None));
        assert!(matches_search(&item, "", None));
    }
}
