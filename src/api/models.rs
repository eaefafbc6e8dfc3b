//! Response Models
//!
//! Shapes returned by the economy API. Field names follow the backend's
//! camelCase JSON.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::paging::Named;

/// `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub balance: f64,
    pub online: u64,
}

/// Entry of `GET /api/players`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    #[serde(rename = "playerUUID")]
    pub uuid: Uuid,
    #[serde(rename = "playerName", default)]
    pub name: Option<String>,
}

impl PlayerSummary {
    /// Name if known, otherwise the UUID
    pub fn display_name(&self) -> String {
        display_name(&self.uuid, self.name.as_deref())
    }
}

impl Named for PlayerSummary {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// `GET /api/player/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "playerUUID")]
    pub uuid: Uuid,
    #[serde(rename = "playerName", default)]
    pub name: Option<String>,
    /// Currency name to amount, in the order the backend sent them
    #[serde(default)]
    pub balances: IndexMap<String, f64>,
    #[serde(default)]
    pub rank: Option<i64>,
}

impl Player {
    pub fn display_name(&self) -> String {
        display_name(&self.uuid, self.name.as_deref())
    }
}

fn display_name(uuid: &Uuid, name: Option<&str>) -> String {
    match name {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => uuid.to_string(),
    }
}

/// Kind of balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Set,
    #[serde(other)]
    Other,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
            TransactionType::Set => "SET",
            TransactionType::Other => "OTHER",
        };
        f.write_str(s)
    }
}

/// Entry of `GET /api/transactions/player/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub currency: String,
    pub amount: f64,
    /// Missing means not yet applied
    #[serde(default)]
    pub processed: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Transaction {
    /// Contribution to a balance: `+amount` for deposits, `-amount` for
    /// withdrawals, nothing otherwise
    pub fn signed_amount(&self) -> Option<f64> {
        match self.kind {
            TransactionType::Deposit => Some(self.amount),
            TransactionType::Withdraw => Some(-self.amount),
            TransactionType::Set | TransactionType::Other => None,
        }
    }
}

/// Timestamps arrive as RFC 3339 text, epoch milliseconds, or a
/// `{seconds, nanos}` object depending on the backend serializer
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    FractionalMillis(f64),
    Parts {
        #[serde(alias = "epochSecond")]
        seconds: i64,
        #[serde(default, alias = "nano")]
        nanos: u32,
    },
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let parsed = match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
        RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms),
        RawTimestamp::FractionalMillis(ms) => DateTime::from_timestamp_millis(ms as i64),
        RawTimestamp::Parts { seconds, nanos } => DateTime::from_timestamp(seconds, nanos),
    };
    parsed.ok_or_else(|| D::Error::custom("timestamp out of range or malformed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_player_with_null_name() {
        let player: Player = serde_json::from_str(
            r#"{"playerUUID":"069a79f4-44e9-4726-a5be-fca90e38aaf5","playerName":null,"balances":{"coins":12.5}}"#,
        )
        .unwrap();
        assert_eq!(player.name, None);
        assert_eq!(player.display_name(), "069a79f4-44e9-4726-a5be-fca90e38aaf5");
        assert_eq!(player.balances.get("coins"), Some(&12.5));
        assert_eq!(player.rank, None);
    }

    #[test]
    fn test_balances_keep_backend_order() {
        let player: Player = serde_json::from_str(
            r#"{"playerUUID":"069a79f4-44e9-4726-a5be-fca90e38aaf5","balances":{"gems":3,"coins":12.5,"bits":1}}"#,
        )
        .unwrap();
        let order: Vec<&str> = player.balances.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["gems", "coins", "bits"]);
    }

    #[test]
    fn test_summary_ignores_extra_fields() {
        let summary: PlayerSummary = serde_json::from_str(
            r#"{"playerUUID":"069a79f4-44e9-4726-a5be-fca90e38aaf5","playerName":"Notch","balances":{},"rank":3}"#,
        )
        .unwrap();
        assert_eq!(summary.name(), "Notch");
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        for raw in [
            r#""2024-03-01T10:15:00Z""#,
            r#""2024-03-01T11:15:00+01:00""#,
            "1709288100000",
            r#"{"seconds":1709288100,"nanos":0}"#,
            r#"{"epochSecond":1709288100}"#,
        ] {
            let json = format!(
                r#"{{"timestamp":{},"type":"DEPOSIT","currency":"coins","amount":1,"processed":true}}"#,
                raw
            );
            let tx: Transaction = serde_json::from_str(&json).unwrap();
            assert_eq!(tx.timestamp, expected, "format {}", raw);
        }
    }

    #[test]
    fn test_unknown_type_and_missing_processed() {
        let tx: Transaction = serde_json::from_str(
            r#"{"timestamp":0,"type":"TRANSFER","currency":"coins","amount":5}"#,
        )
        .unwrap();
        assert_eq!(tx.kind, TransactionType::Other);
        assert!(!tx.processed);
        assert_eq!(tx.signed_amount(), None);
    }

    #[test]
    fn test_malformed_timestamp_rejected() {
        let result: Result<Transaction, _> = serde_json::from_str(
            r#"{"timestamp":"yesterday","type":"SET","currency":"coins","amount":5}"#,
        );
        assert!(result.is_err());
    }
}
