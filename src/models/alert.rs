use serde::{Deserialize, Serialize};

/// Mensaje guardado en el store `messages` de la base Alerts
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AlertMessage {
    pub msg: String,
    // Epoch en milisegundos
    #[serde(default)]
    pub created_at: i64,
}

impl AlertMessage {
    pub fn new(msg: &str, created_at: i64) -> Self {
        Self {
            msg: msg.trim().to_string(),
            created_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.msg.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_like_the_stored_record() {
        let message = AlertMessage::new("  hola  ", 1_700_000_000_000);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["msg"], "hola");
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
    }

    #[test]
    fn old_records_without_timestamp_still_load() {
        let message: AlertMessage = serde_json::from_str(r#"{"msg":"legacy"}"#).unwrap();
        assert_eq!(message.created_at, 0);
        assert!(!message.is_empty());
    }
}
