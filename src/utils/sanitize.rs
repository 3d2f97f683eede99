use serde_json::Value;

use crate::domain::mask_card_number;

/// Sanitizes card data and secrets in JSON payloads for logging
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = match classify(key) {
                    Sensitivity::CardNumber => mask_card(val),
                    Sensitivity::Secret => Value::String("****".to_string()),
                    Sensitivity::None => sanitize_json(val),
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

enum Sensitivity {
    CardNumber,
    Secret,
    None,
}

fn classify(key: &str) -> Sensitivity {
    match key.to_lowercase().as_str() {
        "cardnumber" | "card_number" => Sensitivity::CardNumber,
        "cvv" | "password" | "secret" | "token" | "authorization" => Sensitivity::Secret,
        _ => Sensitivity::None,
    }
}

fn mask_card(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(mask_card_number(s)),
        _ => Value::String("****".to_string()),
    }
}
