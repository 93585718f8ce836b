use serde_json::Value;

use super::scalar_text;

/// Headline figures in order of preference. Searched depth-first so the
/// projection envelope's nested `pnl` / `roi` objects are found too.
const PRIORITY_KEYS: [&str; 6] = [
    "adjusted_profit",
    "net_profit",
    "payback_months",
    "annual_roi",
    "rent",
    "monthly_sales",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for key in PRIORITY_KEYS {
        if let Some(val) = find_key(result_obj, key) {
            println!("{}", minimal_text(val));
            return;
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, minimal_text(val));
            return;
        }
    }

    println!("{}", minimal_text(result_obj));
}

fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let map = value.as_object()?;
    if let Some(val) = map.get(key) {
        if !val.is_null() {
            return Some(val);
        }
    }
    map.values()
        .filter(|v| v.is_object())
        .find_map(|v| find_key(v, key))
}

fn minimal_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        _ => scalar_text(value),
    }
}
