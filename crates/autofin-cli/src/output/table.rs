use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables. Nested objects in the result (the cost
/// breakdown) are flattened into dotted field names; arrays of records (the
/// category shares, an amortization schedule) get a table of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_envelope(result, map),
            None => print_field_table(map),
        },
        Value::Array(arr) => print_record_table(arr),
        _ => println!("{}", value),
    }
}

fn print_envelope(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            print_field_table(res_map);
            for (key, val) in res_map {
                if let Value::Array(rows) = val {
                    if rows.iter().all(Value::is_object) && !rows.is_empty() {
                        println!("\n{}:", key);
                        print_record_table(rows);
                    }
                }
            }
        }
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(rows)) = envelope.get("schedule") {
        println!("\nSchedule:");
        print_record_table(rows);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    push_fields(&mut builder, "", map);
    println!("{}", Table::from(builder));
}

fn push_fields(builder: &mut Builder, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => push_fields(builder, &name, inner),
            // Record arrays are printed separately
            Value::Array(rows) if rows.iter().any(Value::is_object) => {}
            _ => builder.push_record([name, format_value(val)]),
        }
    }
}

fn print_record_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value(item));
        }
        if arr.is_empty() {
            println!("(empty)");
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        _ => value.to_string(),
    }
}
