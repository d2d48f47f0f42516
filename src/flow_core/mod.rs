//! Flow Core - Account Flow Aggregation Engine
//!
//! This module provides the pipeline that turns an account's raw operation
//! history into the directional flow aggregates a diagram renderer consumes.
//!
//! # Architecture
//!
//! ```text
//! TzKT REST API → TzktSource → Paginator (budgeted pages + memo cache)
//!     ↓
//! [RawOperation] (tagged kinds: activation / migration / origination / transaction)
//!     ↓
//! FlowAggregator (per-counterparty totals, counts, date ranges, hash lists)
//!     ↓
//! FlowSummary {inflows, outflows, aliases, hashes}
//!     ↓
//! diagram::build → FlowDiagram (nodes + colored links) → external renderer
//! ```

pub mod aggregator;
pub mod diagram;
pub mod operation;
pub mod paginator;

pub use aggregator::{
    aggregate, is_sentinel_key, DateRange, FlowAggregator, FlowEntry, FlowSummary,
    ACTIVATION_KEY, BOOTSTRAP_KEY, SUBSIDY_KEY,
};
pub use diagram::{DiagramLink, DiagramNode, FlowDiagram, LinkCategory};
pub use operation::{AccountRef, MigrationKind, RawOperation, MUTEZ_PER_TEZ};
pub use paginator::{OperationSource, PageFetch, Paginator, TzktSource, PAGE_SIZE};
