//! Money Flow Aggregation
//!
//! Net balance change per hour for one currency, as plotted on the player
//! page. Hours are bucketed in UTC.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::Transaction;

/// Time window applied to transactions before paging and charting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    LastDays(u32),
}

impl DateRange {
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateRange::All => true,
            // A window reaching past the earliest representable time covers everything
            DateRange::LastDays(days) => Duration::try_days(i64::from(*days))
                .and_then(|window| now.checked_sub_signed(window))
                .map_or(true, |start| timestamp >= start),
        }
    }

    /// Value used in range selectors: `all` or the day count
    pub fn key(&self) -> String {
        match self {
            DateRange::All => "all".to_string(),
            DateRange::LastDays(days) => days.to_string(),
        }
    }

    /// Inverse of [`DateRange::key`]; anything unrecognized is `All`
    pub fn from_key(key: &str) -> Self {
        match key.parse::<u32>() {
            Ok(days) if days > 0 => DateRange::LastDays(days),
            _ => DateRange::All,
        }
    }

    pub fn label(&self) -> String {
        match self {
            DateRange::All => "All time".to_string(),
            DateRange::LastDays(1) => "Last 24 hours".to_string(),
            DateRange::LastDays(days) => format!("Last {} days", days),
        }
    }
}

/// One hourly bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowPoint {
    pub hour: DateTime<Utc>,
    /// `HH:MM`
    pub label: String,
    pub value: f64,
}

/// Chart input for one currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSeries {
    pub currency: String,
    pub points: Vec<FlowPoint>,
}

impl FlowSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// Sum processed deposits and withdrawals of `currency` per hour.
///
/// `SET` and unprocessed transactions are skipped. Points come out in
/// chronological order.
pub fn money_flow_per_hour<'a, I>(transactions: I, currency: &str) -> FlowSeries
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();

    for tx in transactions {
        if !tx.processed || tx.currency != currency {
            continue;
        }
        let Some(delta) = tx.signed_amount() else {
            continue;
        };
        let hour = match tx.timestamp.duration_trunc(Duration::hours(1)) {
            Ok(hour) => hour,
            Err(e) => {
                tracing::warn!(timestamp = %tx.timestamp, "Skipping transaction: {}", e);
                continue;
            }
        };
        *buckets.entry(hour).or_insert(0.0) += delta;
    }

    FlowSeries {
        currency: currency.to_string(),
        points: buckets
            .into_iter()
            .map(|(hour, value)| FlowPoint {
                label: hour.format("%H:%M").to_string(),
                hour,
                value,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TransactionType;
    use chrono::TimeZone;

    fn tx(h: u32, m: u32, kind: TransactionType, amount: f64, processed: bool) -> Transaction {
        Transaction {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap(),
            kind,
            currency: "coins".to_string(),
            amount,
            processed,
            reason: None,
        }
    }

    #[test]
    fn test_hourly_net_flow() {
        let txs = vec![
            tx(10, 5, TransactionType::Deposit, 100.0, true),
            tx(10, 40, TransactionType::Withdraw, 30.0, true),
            tx(9, 59, TransactionType::Deposit, 5.0, true),
            tx(10, 50, TransactionType::Set, 1000.0, true),
            tx(11, 0, TransactionType::Deposit, 7.0, false),
        ];

        let series = money_flow_per_hour(&txs, "coins");
        let labels: Vec<_> = series.points.iter().map(|p| p.label.as_str()).collect();
        let values: Vec<_> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(labels, vec!["09:00", "10:00"]);
        assert_eq!(values, vec![5.0, 70.0]);
        assert_eq!(series.total(), 75.0);
    }

    #[test]
    fn test_other_currencies_ignored() {
        let mut gems = tx(10, 0, TransactionType::Deposit, 1.0, true);
        gems.currency = "gems".to_string();
        let series = money_flow_per_hour([&gems], "coins");
        assert!(series.is_empty());
    }

    #[test]
    fn test_date_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let recent = Utc.with_ymd_and_hms(2024, 3, 9, 13, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        assert!(DateRange::All.contains(old, now));
        assert!(DateRange::LastDays(1).contains(recent, now));
        assert!(!DateRange::LastDays(7).contains(old, now));
        assert_eq!(DateRange::from_key("7"), DateRange::LastDays(7));
        assert_eq!(DateRange::from_key("all"), DateRange::All);
        assert_eq!(DateRange::LastDays(30).label(), "Last 30 days");
    }

    #[test]
    fn test_huge_range_covers_everything() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let earliest = DateTime::<Utc>::MIN_UTC;

        assert!(DateRange::LastDays(u32::MAX).contains(now, now));
        assert!(DateRange::LastDays(u32::MAX).contains(earliest, now));
        assert!(DateRange::from_key("4000000000").contains(earliest, now));
    }
}
