//! Directional aggregation of an account's operation history
//!
//! Reduces a raw operation list into two per-counterparty aggregate sets:
//! value flowing toward the target address (inflows) and away from it
//! (outflows). Counterparties are keyed by registry alias when one exists,
//! raw address otherwise, so one key maps to one diagram node.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::operation::{AccountRef, MigrationKind, RawOperation, MUTEZ_PER_TEZ};

/// Synthetic inflow key for faucet account activations.
pub const ACTIVATION_KEY: &str = "~Activation~";
/// Synthetic inflow key for protocol bootstrap migrations.
pub const BOOTSTRAP_KEY: &str = "~Bootstrap~";
/// Synthetic inflow key for liquidity-baking subsidy migrations.
pub const SUBSIDY_KEY: &str = "~Subsidy~";

/// Sentinel keys stand for protocol-level value creation, not a real
/// counterparty, and must never be treated as a queryable address.
pub fn is_sentinel_key(key: &str) -> bool {
    matches!(key, ACTIVATION_KEY | BOOTSTRAP_KEY | SUBSIDY_KEY)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Aggregate for one counterparty in one direction.
#[derive(Debug, Clone)]
pub struct FlowEntry {
    pub key: String,
    pub total_tez: f64,
    pub tx_count: u64,
    pub date_range: DateRange,
    pub tx_hashes: Vec<String>,
}

/// Result of one aggregation pass. Built once per (address, budget, filter)
/// request and handed to the renderer unchanged.
#[derive(Debug, Default)]
pub struct FlowSummary {
    pub inflows: Vec<FlowEntry>,
    pub outflows: Vec<FlowEntry>,
    /// address → display label, for reverse lookup when a node is clicked.
    pub address_to_alias: HashMap<String, String>,
    /// Contributing hashes per counterparty key, across both directions.
    pub tx_hashes_by_key: HashMap<String, Vec<String>>,
}

impl FlowSummary {
    pub fn inflow_total(&self) -> f64 {
        self.inflows.iter().map(|e| e.total_tez).sum()
    }

    pub fn outflow_total(&self) -> f64 {
        self.outflows.iter().map(|e| e.total_tez).sum()
    }
}

/// How a record folds into an existing entry for its key.
enum FoldMode {
    /// Sum amounts, bump the count, widen the start of the date range.
    Accumulate,
    /// Replace amount, count, and date range; only the latest occurrence
    /// survives. Used by the activation and bootstrap sentinels.
    Replace,
}

/// One direction's entries in first-seen order, with a key index.
#[derive(Default)]
struct FlowSide {
    entries: Vec<FlowEntry>,
    index: HashMap<String, usize>,
}

impl FlowSide {
    fn fold(
        &mut self,
        key: &str,
        amount_tez: f64,
        timestamp: DateTime<Utc>,
        hash: Option<&str>,
        mode: FoldMode,
    ) {
        match self.index.get(key) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                match mode {
                    FoldMode::Accumulate => {
                        entry.total_tez += amount_tez;
                        entry.tx_count += 1;
                        if timestamp < entry.date_range.start {
                            entry.date_range.start = timestamp;
                        }
                        // end keeps the value it was created with
                    }
                    FoldMode::Replace => {
                        entry.total_tez = amount_tez;
                        entry.tx_count = 1;
                        entry.date_range = DateRange {
                            start: timestamp,
                            end: timestamp,
                        };
                    }
                }
                if let Some(h) = hash {
                    entry.tx_hashes.push(h.to_string());
                }
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push(FlowEntry {
                    key: key.to_string(),
                    total_tez: amount_tez,
                    tx_count: 1,
                    date_range: DateRange {
                        start: timestamp,
                        end: timestamp,
                    },
                    tx_hashes: hash.map(|h| vec![h.to_string()]).unwrap_or_default(),
                });
            }
        }
    }

    fn into_filtered(self, min_tez: f64) -> Vec<FlowEntry> {
        self.entries
            .into_iter()
            .filter(|e| e.total_tez >= min_tez)
            .collect()
    }
}

/// Folds classified operations into directional flow sets for one target
/// address. Feed it records, then take the summary with [`finish`].
///
/// [`finish`]: FlowAggregator::finish
pub struct FlowAggregator {
    target_address: String,
    inflows: FlowSide,
    outflows: FlowSide,
    address_to_alias: HashMap<String, String>,
    tx_hashes_by_key: HashMap<String, Vec<String>>,
}

impl FlowAggregator {
    pub fn new(target_address: &str) -> Self {
        Self {
            target_address: target_address.to_string(),
            inflows: FlowSide::default(),
            outflows: FlowSide::default(),
            address_to_alias: HashMap::new(),
            tx_hashes_by_key: HashMap::new(),
        }
    }

    /// Classify one record and fold its contribution, if any. Records of
    /// unrecognized kinds, or missing the fields their kind needs, fold
    /// nothing.
    pub fn fold_operation(&mut self, op: &RawOperation) {
        match op {
            RawOperation::Activation {
                hash,
                timestamp,
                account: Some(account),
                balance: Some(balance),
                ..
            } => {
                self.note_alias(account);
                let amount = *balance as f64 / MUTEZ_PER_TEZ;
                self.inflows.fold(
                    ACTIVATION_KEY,
                    amount,
                    *timestamp,
                    hash.as_deref(),
                    FoldMode::Replace,
                );
                self.note_hash(ACTIVATION_KEY, hash.as_deref());
            }
            RawOperation::Migration {
                hash,
                timestamp,
                kind: Some(kind),
                account: Some(account),
                balance_change: Some(balance_change),
                ..
            } => {
                let (key, mode) = match kind {
                    MigrationKind::Bootstrap => (BOOTSTRAP_KEY, FoldMode::Replace),
                    MigrationKind::Subsidy => (SUBSIDY_KEY, FoldMode::Accumulate),
                    MigrationKind::Other => return,
                };
                self.note_alias(account);
                let amount = *balance_change as f64 / MUTEZ_PER_TEZ;
                self.inflows
                    .fold(key, amount, *timestamp, hash.as_deref(), mode);
                self.note_hash(key, hash.as_deref());
            }
            RawOperation::Origination {
                hash,
                timestamp,
                sender: Some(sender),
                originated_contract: Some(contract),
                contract_balance: Some(contract_balance),
                ..
            } if *contract_balance > 0 => {
                let amount = *contract_balance as f64 / MUTEZ_PER_TEZ;
                if sender.is(&self.target_address) {
                    self.note_alias(sender);
                    self.note_alias(contract);
                    let key = contract.label().to_string();
                    self.outflows.fold(
                        &key,
                        amount,
                        *timestamp,
                        hash.as_deref(),
                        FoldMode::Accumulate,
                    );
                    self.note_hash(&key, hash.as_deref());
                } else if contract.is(&self.target_address) {
                    self.note_alias(sender);
                    self.note_alias(contract);
                    let key = sender.label().to_string();
                    self.inflows.fold(
                        &key,
                        amount,
                        *timestamp,
                        hash.as_deref(),
                        FoldMode::Accumulate,
                    );
                    self.note_hash(&key, hash.as_deref());
                }
            }
            RawOperation::Transaction {
                hash,
                timestamp,
                sender: Some(sender),
                target: Some(target),
                amount: Some(amount),
                ..
            } => {
                self.note_alias(sender);
                self.note_alias(target);
                if *amount == 0 {
                    return;
                }
                let amount_tez = *amount as f64 / MUTEZ_PER_TEZ;
                let sender_is_target = sender.is(&self.target_address);
                let receiver_is_target = target.is(&self.target_address);
                // A self-transfer moves nothing in or out
                if sender_is_target && !receiver_is_target {
                    let key = target.label().to_string();
                    self.outflows.fold(
                        &key,
                        amount_tez,
                        *timestamp,
                        hash.as_deref(),
                        FoldMode::Accumulate,
                    );
                    self.note_hash(&key, hash.as_deref());
                } else if receiver_is_target && !sender_is_target {
                    let key = sender.label().to_string();
                    self.inflows.fold(
                        &key,
                        amount_tez,
                        *timestamp,
                        hash.as_deref(),
                        FoldMode::Accumulate,
                    );
                    self.note_hash(&key, hash.as_deref());
                }
            }
            // Unrecognized kinds and records missing required fields
            _ => {}
        }
    }

    /// Drop entries below the tez threshold and return the finished summary.
    /// Sentinel entries get no exemption from the filter.
    pub fn finish(self, min_tez: f64) -> FlowSummary {
        FlowSummary {
            inflows: self.inflows.into_filtered(min_tez),
            outflows: self.outflows.into_filtered(min_tez),
            address_to_alias: self.address_to_alias,
            tx_hashes_by_key: self.tx_hashes_by_key,
        }
    }

    fn note_alias(&mut self, account: &AccountRef) {
        self.address_to_alias
            .insert(account.address.clone(), account.label().to_string());
    }

    fn note_hash(&mut self, key: &str, hash: Option<&str>) {
        if let Some(h) = hash {
            self.tx_hashes_by_key
                .entry(key.to_string())
                .or_default()
                .push(h.to_string());
        }
    }
}

/// Run one full aggregation pass over an operation list.
pub fn aggregate(records: &[RawOperation], target_address: &str, min_tez: f64) -> FlowSummary {
    let mut agg = FlowAggregator::new(target_address);
    for op in records {
        agg.fold_operation(op);
    }
    agg.finish(min_tez)
}
