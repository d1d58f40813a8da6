use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "required_extra_payment",
        "savings",
        "monthly_difference",
        "monthly_payment",
        "payoff_date",
        "plans",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(key, val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(key, val));
            return;
        }
    }

    println!("{}", format_minimal("", result_obj));
}

fn format_minimal(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        // Plan lists collapse to "name: first payment" lines.
        Value::Array(plans) if key == "plans" => plans
            .iter()
            .filter_map(|p| {
                if let Value::String(plan) = p {
                    return Some(plan.clone());
                }
                let name = p.get("plan_name")?.as_str()?;
                let payment = p.get("monthly_payment")?;
                let first = payment.get("amount").or_else(|| payment.get("initial"))?;
                Some(format!("{}: {}", name, format_minimal("", first)))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) if key == "savings" => format!(
            "{} interest, {} months",
            map.get("interest_saved").map(|v| format_minimal("", v)).unwrap_or_default(),
            map.get("months_saved").map(|v| format_minimal("", v)).unwrap_or_default()
        ),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
