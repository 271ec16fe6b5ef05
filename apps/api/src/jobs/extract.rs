//! Display-string extraction from loosely typed WordPress meta values.

use serde_json::Value;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Joins the truthy values of a meta object (or array) with `", "`.
///
/// Taxonomy-backed meta arrives as `{ "<term_id>": "<name>" }`; order follows the
/// mapping's own key order. Falsy values (empty string, null, zero, false) are
/// dropped, nested objects and arrays are skipped.
pub fn extract_joined_values(value: Option<&Value>) -> String {
    let values: Vec<&Value> = match value {
        Some(Value::Object(map)) => map.values().collect(),
        Some(Value::Array(items)) => items.iter().collect(),
        _ => return NOT_SPECIFIED.to_string(),
    };

    let parts: Vec<String> = values.into_iter().filter_map(display_value).collect();

    if parts.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        parts.join(", ")
    }
}

/// Formats a salary range from optional min/max strings.
pub fn format_salary(min: Option<&str>, max: Option<&str>) -> String {
    let min = min.map(str::trim).filter(|s| !s.is_empty());
    let max = max.map(str::trim).filter(|s| !s.is_empty());

    match (min, max) {
        (Some(min), Some(max)) => format!("{min} - {max}"),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => NOT_SPECIFIED.to_string(),
    }
}

/// Renders a scalar meta value as display text. `None` for falsy or non-scalar values.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_joined_values_drops_empty() {
        let v = json!({ "a": "Mumbai", "b": "", "c": "Delhi" });
        assert_eq!(extract_joined_values(Some(&v)), "Mumbai, Delhi");
    }

    #[test]
    fn test_joined_values_empty_object() {
        assert_eq!(extract_joined_values(Some(&json!({}))), NOT_SPECIFIED);
    }

    #[test]
    fn test_joined_values_non_object() {
        assert_eq!(extract_joined_values(None), NOT_SPECIFIED);
        assert_eq!(extract_joined_values(Some(&Value::Null)), NOT_SPECIFIED);
        assert_eq!(extract_joined_values(Some(&json!("Pune"))), NOT_SPECIFIED);
        assert_eq!(extract_joined_values(Some(&json!(12))), NOT_SPECIFIED);
    }

    #[test]
    fn test_joined_values_keeps_key_order() {
        let v: Value = serde_json::from_str(r#"{"31": "Remote", "4": "Bengaluru"}"#).unwrap();
        assert_eq!(extract_joined_values(Some(&v)), "Remote, Bengaluru");
    }

    #[test]
    fn test_joined_values_all_falsy() {
        let v = json!({ "a": "", "b": null, "c": 0, "d": false });
        assert_eq!(extract_joined_values(Some(&v)), NOT_SPECIFIED);
    }

    #[test]
    fn test_joined_values_array_and_numbers() {
        let v = json!(["Full Time", 3, { "nested": "x" }]);
        assert_eq!(extract_joined_values(Some(&v)), "Full Time, 3");
    }

    #[test]
    fn test_salary_both() {
        assert_eq!(format_salary(Some("50000"), Some("80000")), "50000 - 80000");
    }

    #[test]
    fn test_salary_none() {
        assert_eq!(format_salary(Some(""), Some("")), NOT_SPECIFIED);
        assert_eq!(format_salary(None, None), NOT_SPECIFIED);
        assert_eq!(format_salary(Some("   "), None), NOT_SPECIFIED);
    }

    #[test]
    fn test_salary_one_side() {
        assert_eq!(format_salary(Some("50000"), Some("")), "50000");
        assert_eq!(format_salary(None, Some(" 90000 ")), "90000");
    }
}
