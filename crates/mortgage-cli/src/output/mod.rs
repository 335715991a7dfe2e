pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar for a single table or CSV cell. Nested objects such as the
/// year/month schedule are summarised instead of dumped.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(map) => match schedule_length(map) {
            Some(n) => format!("{n} monthly payments"),
            None => serde_json::to_string(value).unwrap_or_default(),
        },
    }
}

/// Number of payments in a nested year -> month schedule, if `map` is one.
fn schedule_length(map: &serde_json::Map<String, Value>) -> Option<usize> {
    let mut count = 0;
    for (year, months) in map {
        year.parse::<u32>().ok()?;
        count += months.as_object()?.len();
    }
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_summarises_schedule() {
        let sched = json!({
            "1": { "1": {}, "2": {} },
            "2": { "1": {} }
        });
        assert_eq!(cell(&sched), "3 monthly payments");
    }

    #[test]
    fn test_cell_scalars() {
        assert_eq!(cell(&json!("8333.34")), "8333.34");
        assert_eq!(cell(&json!(120)), "120");
        assert_eq!(cell(&Value::Null), "");
        assert_eq!(cell(&json!(["a", "b"])), "a, b");
    }

    #[test]
    fn test_cell_plain_object_is_json() {
        assert_eq!(cell(&json!({"total": "1"})), "{\"total\":\"1\"}");
    }
}
