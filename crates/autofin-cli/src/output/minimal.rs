use serde_json::Value;

/// Headline figure of each calculator, in lookup order.
const HEADLINE_KEYS: [&str; 5] = [
    "monthly_payment",
    "total_cost",
    "trade_in_value",
    "percent_difference",
    "monthly_cost",
];

/// Print just the headline figure of the result, or `key: value` for the
/// first field when none of the known ones is present.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &HEADLINE_KEYS {
            if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        _ => value.to_string(),
    }
}
