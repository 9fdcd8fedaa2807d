use colored::Colorize;
use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("{}: CSV output failed: {}", "error".red().bold(), e);
    }
}

/// Two-column `field,value` rows for the result, nested objects flattened
/// to dotted names. Each array of records in the result (category shares)
/// and an appended amortization schedule follow as their own header plus
/// one row per record, so rows vary in width.
pub fn write_csv<W: io::Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);

    match value {
        Value::Object(map) => {
            let (fields, schedule) = match map.get("result") {
                Some(Value::Object(result)) => (result, map.get("schedule")),
                _ => (map, None),
            };

            wtr.write_record(["field", "value"])?;
            write_fields(&mut wtr, "", fields)?;

            for rows in fields.values().filter_map(as_records) {
                write_records(&mut wtr, rows)?;
            }
            if let Some(rows) = schedule.and_then(as_records) {
                write_records(&mut wtr, rows)?;
            }
        }
        Value::Array(arr) => write_records(&mut wtr, arr)?,
        _ => wtr.write_record([format_csv_value(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn as_records(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => Some(rows),
        _ => None,
    }
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    prefix: &str,
    map: &Map<String, Value>,
) -> csv::Result<()> {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => write_fields(wtr, &name, inner)?,
            _ if as_records(val).is_some() => {}
            _ => wtr.write_record([name, format_csv_value(val)])?,
        }
    }
    Ok(())
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, value).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_schedule_follows_loan_fields() {
        let value = json!({
            "result": { "monthly_payment": "16413.23", "ltv_status": "Excellent" },
            "warnings": [],
            "schedule": [
                { "month": 1, "interest": "5666.67" },
                { "month": 2, "interest": "5553.70" }
            ]
        });
        let lines: Vec<String> = render(&value).lines().map(String::from).collect();
        assert_eq!(lines[0], "field,value");
        assert!(lines.contains(&"monthly_payment,16413.23".to_string()));
        assert!(lines.contains(&"ltv_status,Excellent".to_string()));
        // Keys come out in map order
        let header = lines.iter().position(|l| l == "interest,month").unwrap();
        assert_eq!(lines[header + 1], "5666.67,1");
        assert_eq!(lines[header + 2], "5553.70,2");
    }

    #[test]
    fn test_shares_written_as_rows() {
        let value = json!({
            "result": {
                "total_cost": "1259079.08",
                "breakdown": { "fuel": "562500" },
                "shares": [
                    { "category": "fuel", "share_pct": "44.67" },
                    { "category": "taxes", "share_pct": "0.79" }
                ]
            }
        });
        let out = render(&value);
        assert!(out.contains("breakdown.fuel,562500\n"));
        assert!(out.contains("category,share_pct\nfuel,44.67\ntaxes,0.79\n"));
        assert!(!out.contains("shares,"));
    }
}
