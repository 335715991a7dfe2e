use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::cell;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    println!("{}", render(value));
}

fn render(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => render_envelope(result, map),
            _ => field_table(map),
        },
        Value::Array(rows) => row_table(rows),
        other => cell(other),
    }
}

fn render_envelope(result: &Map<String, Value>, envelope: &Map<String, Value>) -> String {
    let mut out = field_table(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\n\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("\n  - {}", w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\n\nMethodology: {}", meth));
    }
    out
}

fn field_table(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), cell(val)]);
    }
    Table::from(builder).to_string()
}

fn row_table(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return rows.iter().map(cell).collect::<Vec<_>>().join("\n");
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(cell).unwrap_or_default()),
        );
    }
    Table::from(builder).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_lists_warnings() {
        let v = json!({
            "result": { "monthlyPayment": "34713.02" },
            "methodology": "Fixed-rate annuity mortgage",
            "warnings": ["Loan settles after 239 of 240 scheduled payments"]
        });
        let out = render(&v);
        assert!(out.contains("34713.02"));
        assert!(out.contains("Warnings:"));
        assert!(out.contains("Methodology: Fixed-rate annuity mortgage"));
    }

    #[test]
    fn test_rows_use_first_row_headers() {
        let v = json!([
            { "period": 1, "totalPayment": "10" },
            { "period": 2, "totalPayment": "10" }
        ]);
        let out = render(&v);
        assert!(out.contains("period"));
        assert!(out.contains("totalPayment"));
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(render(&json!([])), "");
    }
}
