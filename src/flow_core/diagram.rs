//! Renderer-facing diagram structure
//!
//! Turns a [`FlowSummary`] into the node/link shape a Sankey-style renderer
//! consumes: one center node for the target, one node per counterparty
//! entry, links valued by aggregated tez with a color category separating
//! protocol-created inflows from ordinary ones and from outflows.

use serde::Serialize;

use super::aggregator::{is_sentinel_key, FlowEntry, FlowSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    SentinelInflow,
    Inflow,
    Outflow,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagramNode {
    pub label: String,
    pub hover_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagramLink {
    /// Index into `nodes`.
    pub source: usize,
    /// Index into `nodes`.
    pub target: usize,
    pub value: f64,
    pub category: LinkCategory,
}

#[derive(Debug, Serialize)]
pub struct FlowDiagram {
    pub nodes: Vec<DiagramNode>,
    pub links: Vec<DiagramLink>,
    /// Suggested render height in pixels, scaled to the node count.
    pub height_hint: u32,
}

const CENTER: usize = 0;

/// Build the diagram for one aggregation pass. Node 0 is the target;
/// inflow nodes follow in entry order, then outflow nodes.
pub fn build(target_address: &str, summary: &FlowSummary) -> FlowDiagram {
    let center_label = summary
        .address_to_alias
        .get(target_address)
        .cloned()
        .unwrap_or_else(|| target_address.to_string());

    let mut nodes = vec![DiagramNode {
        hover_text: format!(
            "{}\nInputs: {}\nOutputs: {}\nTotal in: {:.2} tez\nTotal out: {:.2} tez",
            center_label,
            summary.inflows.len(),
            summary.outflows.len(),
            summary.inflow_total(),
            summary.outflow_total(),
        ),
        label: center_label,
    }];

    let mut links = Vec::with_capacity(summary.inflows.len() + summary.outflows.len());

    for entry in &summary.inflows {
        let category = if is_sentinel_key(&entry.key) {
            LinkCategory::SentinelInflow
        } else {
            LinkCategory::Inflow
        };
        links.push(DiagramLink {
            source: nodes.len(),
            target: CENTER,
            value: entry.total_tez,
            category,
        });
        nodes.push(entry_node(entry));
    }

    for entry in &summary.outflows {
        links.push(DiagramLink {
            source: CENTER,
            target: nodes.len(),
            value: entry.total_tez,
            category: LinkCategory::Outflow,
        });
        nodes.push(entry_node(entry));
    }

    let height_hint = (nodes.len() as u32 * 18).max(600);

    FlowDiagram {
        nodes,
        links,
        height_hint,
    }
}

fn entry_node(entry: &FlowEntry) -> DiagramNode {
    DiagramNode {
        label: entry.key.clone(),
        hover_text: format!(
            "{}\n{} txes\n{} - {}",
            entry.key,
            entry.tx_count,
            entry.date_range.start.format("%Y-%m-%d"),
            entry.date_range.end.format("%Y-%m-%d"),
        ),
    }
}

/// Translate a clicked node label back into a queryable address.
///
/// Sentinel labels resolve to nothing: they are not on-chain parties. An
/// aliased label resolves through the alias map; anything else is assumed
/// to already be an address.
pub fn resolve_label(summary: &FlowSummary, label: &str) -> Option<String> {
    if is_sentinel_key(label) {
        return None;
    }
    summary
        .address_to_alias
        .iter()
        .find(|(_, alias)| alias.as_str() == label)
        .map(|(address, _)| address.clone())
        .or_else(|| Some(label.to_string()))
}
