// ============================================================================
// ORDER BY - Orden por `id` de registros heterogéneos
// ============================================================================
// Si ambos ids son números finitos se comparan como números; si no, como
// texto sin distinguir mayúsculas.
// ============================================================================

use std::cmp::Ordering;

use serde_json::Value;

pub fn compare_ids(a: &Value, b: &Value) -> Ordering {
    match (as_finite_number(a), as_finite_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => as_lowercase_text(a).cmp(&as_lowercase_text(b)),
    }
}

/// Orden estable por el id que devuelve `key`
pub fn sort_by_key_value<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> Value,
{
    items.sort_by(|a, b| compare_ids(&key(a), &key(b)));
}

fn as_finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn as_lowercase_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        Value::Null => String::new(),
        other => other.to_string().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_ids(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_ids(&json!("2"), &json!("10")), Ordering::Less);
        assert_eq!(compare_ids(&json!(" 7 "), &json!(7)), Ordering::Equal);
    }

    #[test]
    fn text_compares_case_insensitively() {
        assert_eq!(compare_ids(&json!("beta"), &json!("Alpha")), Ordering::Greater);
        assert_eq!(compare_ids(&json!("ABC"), &json!("abc")), Ordering::Equal);
        // "12abc" no es un número completo
        assert_eq!(compare_ids(&json!("12abc"), &json!("9")), Ordering::Less);
    }

    #[test]
    fn sort_is_stable_and_mixed() {
        let mut values = vec![
            json!({"id": 10, "tag": "a"}),
            json!({"id": "2", "tag": "b"}),
            json!({"id": 2, "tag": "c"}),
            json!({"id": 1, "tag": "d"}),
        ];
        sort_by_key_value(&mut values, |v| v["id"].clone());
        let tags: Vec<_> = values.iter().map(|v| v["tag"].as_str().unwrap()).collect();
        assert_eq!(tags, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn missing_ids_sort_first() {
        let mut ids = vec![Some(3u32), None, Some(1)];
        sort_by_key_value(&mut ids, |id| serde_json::to_value(id).unwrap());
        assert_eq!(ids, vec![None, Some(1), Some(3)]);
    }
}
