use serde_json::Value;

use super::cell;

/// Keys printed by `--output minimal`, in order of preference.
const PRIORITY_KEYS: [&str; 4] = ["monthlyPayment", "total", "totalPayment", "principalPortion"];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    return cell(val);
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, cell(val)),
                None => String::new(),
            }
        }
        // Schedules: the number of payments says the most
        Value::Array(rows) => rows.len().to_string(),
        other => cell(other),
    }
}
