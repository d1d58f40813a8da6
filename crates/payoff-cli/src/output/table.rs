use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::ROW_KEYS;

/// Format output as tables: scalar fields first, then one table per
/// row-shaped array (plans, schedule, per-loan results).
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            print_flat_object(res_map);
            for key in ROW_KEYS {
                if let Some(Value::Array(rows)) = res_map.get(key) {
                    println!("\n{}:", key);
                    print_array_table(rows);
                }
            }
        }
        _ => print_flat_object(envelope),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if ROW_KEYS.contains(&key.as_str()) && val.is_array() {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        // Tagged monthly payments: the amount, or "varies: a / b / c".
        Value::Object(map) => match map.get("kind").and_then(Value::as_str) {
            Some("fixed") => map.get("amount").map(format_value).unwrap_or_default(),
            Some(kind) => {
                let parts: Vec<String> = map
                    .iter()
                    .filter(|(k, _)| k.as_str() != "kind")
                    .map(|(_, v)| format_value(v))
                    .collect();
                format!("{}: {}", kind, parts.join(" / "))
            }
            None => serde_json::to_string(value).unwrap_or_default(),
        },
    }
}
