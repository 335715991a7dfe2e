use serde_json::Value;
use std::io;

use super::cell;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: io::Write>(writer: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    match value {
        Value::Object(map) => {
            // Envelope or flat object: two-column CSV
            let fields = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            wtr.write_record(["field", "value"])?;
            for (key, val) in fields {
                wtr.write_record([key.as_str(), &cell(val)])?;
            }
        }
        Value::Array(rows) => {
            if let Some(Value::Object(first)) = rows.first() {
                let headers: Vec<&str> = first.keys().map(String::as_str).collect();
                wtr.write_record(&headers)?;
                for row in rows.iter().filter_map(Value::as_object) {
                    let record: Vec<String> = headers
                        .iter()
                        .map(|h| row.get(*h).map(cell).unwrap_or_default())
                        .collect();
                    wtr.write_record(&record)?;
                }
            } else {
                for item in rows {
                    wtr.write_record([cell(item)])?;
                }
            }
        }
        other => wtr.write_record([cell(other)])?,
    }

    wtr.flush()?;
    Ok(())
}
