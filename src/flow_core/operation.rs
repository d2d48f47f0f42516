//! TzKT operation records as a closed set of kinds

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Divisor for converting raw mutez amounts to tez for display.
pub const MUTEZ_PER_TEZ: f64 = 1_000_000.0;

/// An account reference as TzKT embeds it: address plus optional registry alias.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AccountRef {
    pub address: String,
    pub alias: Option<String>,
}

impl AccountRef {
    /// Display label: the alias when one is registered, the raw address otherwise.
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.address)
    }

    pub fn is(&self, address: &str) -> bool {
        self.address == address
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MigrationKind {
    Bootstrap,
    Subsidy,
    #[serde(other)]
    Other,
}

/// One operation record from the TzKT `/operations` endpoint.
///
/// Fields that the API omits on some records (migrations carry no hash,
/// malformed rows may drop a party) are optional; classification skips
/// records missing what it needs instead of failing the whole page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawOperation {
    Activation {
        id: i64,
        hash: Option<String>,
        timestamp: DateTime<Utc>,
        account: Option<AccountRef>,
        balance: Option<i64>,
    },
    Migration {
        id: i64,
        hash: Option<String>,
        timestamp: DateTime<Utc>,
        kind: Option<MigrationKind>,
        account: Option<AccountRef>,
        #[serde(rename = "balanceChange")]
        balance_change: Option<i64>,
    },
    Origination {
        id: i64,
        hash: Option<String>,
        timestamp: DateTime<Utc>,
        sender: Option<AccountRef>,
        #[serde(rename = "originatedContract")]
        originated_contract: Option<AccountRef>,
        #[serde(rename = "contractBalance")]
        contract_balance: Option<i64>,
    },
    Transaction {
        id: i64,
        hash: Option<String>,
        timestamp: DateTime<Utc>,
        sender: Option<AccountRef>,
        target: Option<AccountRef>,
        amount: Option<i64>,
    },
    /// Any kind this crate does not classify. Kept so one odd record
    /// never sinks the page it arrived on.
    #[serde(other)]
    Unknown,
}

impl RawOperation {
    /// Record identifier used as the pagination cursor. `Unknown` has none.
    pub fn id(&self) -> Option<i64> {
        match self {
            RawOperation::Activation { id, .. }
            | RawOperation::Migration { id, .. }
            | RawOperation::Origination { id, .. }
            | RawOperation::Transaction { id, .. } => Some(*id),
            RawOperation::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction() {
        let json = r#"{"type":"transaction","id":107469948,"level":1330530,"timestamp":"2021-02-02T18:48:49Z","block":"BKrzW","hash":"onwJborbZm6CgJhtnUWBzukRmdH5VeQDdDSBZFuAM4LjG2KJyvx","sender":{"address":"tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb"},"target":{"alias":"Binance Hot","address":"tz1S8MNvuFEUsWgjHvi3AxibRBf388NhT1q2"},"amount":20000000,"status":"applied"}"#;

        let op: RawOperation = serde_json::from_str(json).unwrap();
        match op {
            RawOperation::Transaction {
                id,
                ref hash,
                ref sender,
                ref target,
                amount,
                ..
            } => {
                assert_eq!(id, 107469948);
                assert_eq!(
                    hash.as_deref(),
                    Some("onwJborbZm6CgJhtnUWBzukRmdH5VeQDdDSBZFuAM4LjG2KJyvx")
                );
                assert_eq!(
                    sender.as_ref().unwrap().address,
                    "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb"
                );
                assert_eq!(target.as_ref().unwrap().label(), "Binance Hot");
                assert_eq!(amount, Some(20_000_000));
            }
            other => panic!("expected transaction, got {:?}", other),
        }
        assert_eq!(op.id(), Some(107469948));
    }

    #[test]
    fn test_parse_migration_without_hash() {
        // Migrations carry no hash field on TzKT
        let json = r#"{"type":"migration","id":54903,"level":1589248,"timestamp":"2021-08-06T09:12:15Z","kind":"subsidy","account":{"alias":"Liquidity Baking","address":"KT1TxqZ8QtKvLu3V3JH7Gx58n7Co8pgtpQU5"},"balanceChange":2500000}"#;

        let op: RawOperation = serde_json::from_str(json).unwrap();
        match op {
            RawOperation::Migration {
                kind,
                ref hash,
                balance_change,
                ..
            } => {
                assert_eq!(kind, Some(MigrationKind::Subsidy));
                assert!(hash.is_none());
                assert_eq!(balance_change, Some(2_500_000));
            }
            other => panic!("expected migration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_activation() {
        let json = r#"{"type":"activation","id":712,"level":30,"timestamp":"2018-07-01T00:31:17Z","hash":"opLqntFUu984M7LnGsFEfTBkbW8GtfSe46TGW2rTkMZ5sjDcAmv","account":{"address":"tz1WrbkDrzKVqcGXkjw4Qk4fXkjXpAJuNP1j"},"balance":5000000}"#;

        let op: RawOperation = serde_json::from_str(json).unwrap();
        match op {
            RawOperation::Activation { balance, ref account, .. } => {
                assert_eq!(balance, Some(5_000_000));
                // No alias registered: label falls back to the address
                assert_eq!(
                    account.as_ref().unwrap().label(),
                    "tz1WrbkDrzKVqcGXkjw4Qk4fXkjXpAJuNP1j"
                );
            }
            other => panic!("expected activation, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_kind_parses_as_unknown() {
        let json = r#"{"type":"endorsement","id":99,"level":12,"timestamp":"2020-01-01T00:00:00Z"}"#;

        let op: RawOperation = serde_json::from_str(json).unwrap();
        assert!(matches!(op, RawOperation::Unknown));
        assert_eq!(op.id(), None);
    }

    #[test]
    fn test_unknown_migration_subtype() {
        let json = r#"{"type":"migration","id":17,"timestamp":"2019-05-30T00:00:00Z","kind":"activate_delegate","account":{"address":"tz1a"},"balanceChange":0}"#;

        let op: RawOperation = serde_json::from_str(json).unwrap();
        match op {
            RawOperation::Migration { kind, .. } => assert_eq!(kind, Some(MigrationKind::Other)),
            other => panic!("expected migration, got {:?}", other),
        }
    }
}
