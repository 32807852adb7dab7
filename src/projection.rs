//! Outbound proposal projection
//!
//! Maps internal ledger records into the shape handed to the chat host.

use crate::governance::{ProposalDetail, ProposalHandle};
use crate::registry::{statuses, topics};
use serde::Serialize;

/// Placeholder used when neither the handle nor the detail carries a summary
pub const MISSING_SUMMARY: &str = "No summary provided";

/// Externally visible proposal record (safe to hand to the chat host).
///
/// The 64-bit ledger id is stringified for transport; topic and status are
/// projected as their registry names, recoverable as codes through the
/// registries' reverse maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub topic: String,
    pub status: String,
    pub timestamp: u64,
}

impl ProposalSummary {
    /// Project a handle plus its resolved detail into the outbound shape
    pub fn project(handle: &ProposalHandle, detail: &ProposalDetail) -> Self {
        let summary = handle
            .summary
            .clone()
            .or_else(|| detail.summary.clone())
            .unwrap_or_else(|| MISSING_SUMMARY.to_string());

        Self {
            id: handle.id.to_string(),
            title: handle.title.clone().unwrap_or_default(),
            summary,
            topic: topics().display(detail.topic),
            status: statuses().display(detail.status),
            timestamp: detail.timestamp_seconds,
        }
    }
}
