//! Chat host capability surface
//!
//! The host framework's only contract with this crate: hand a line of chat
//! text to the handler and receive back a reply carrying the proposal
//! records. No host-specific registration mechanics live here.

use crate::engine::QueryEngine;
use crate::error::RelayResult;
use crate::governance::GovernanceClient;
use crate::projection::ProposalSummary;
use crate::registry::{statuses, topics, EnumRegistry};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Serialize;

/// Reply returned to the chat host: rendered text plus the structured records
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerReply {
    pub text: String,
    pub proposals: Vec<ProposalSummary>,
}

/// Capability interface the chat host drives
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handle one inbound chat line. `Ok(None)` means the line was not
    /// addressed to this handler and the host should move on.
    async fn handle(&self, text: &str) -> RelayResult<Option<HandlerReply>>;
}

/// Proposal provider backed by the query engine
pub struct ProposalsProvider<C> {
    engine: QueryEngine<C>,
}

impl<C: GovernanceClient> ProposalsProvider<C> {
    pub fn new(client: C) -> Self {
        Self {
            engine: QueryEngine::new(client),
        }
    }
}

#[async_trait]
impl<C: GovernanceClient> CommandHandler for ProposalsProvider<C> {
    async fn handle(&self, text: &str) -> RelayResult<Option<HandlerReply>> {
        let Some(proposals) = self.engine.execute(text).await? else {
            return Ok(None);
        };
        Ok(Some(HandlerReply {
            text: render_reply(&proposals),
            proposals,
        }))
    }
}

/// Render the chat text block, one line per proposal
fn render_reply(proposals: &[ProposalSummary]) -> String {
    if proposals.is_empty() {
        return "No proposals matched the query.".to_string();
    }

    let mut lines = Vec::with_capacity(proposals.len() + 1);
    lines.push(format!("Found {} proposal(s):", proposals.len()));
    for proposal in proposals {
        let title = if proposal.title.is_empty() {
            "(untitled)"
        } else {
            proposal.title.as_str()
        };
        lines.push(format!(
            "  #{} [{} / {}] {} - {}",
            proposal.id,
            display_with_code(topics(), &proposal.topic),
            display_with_code(statuses(), &proposal.status),
            title,
            format_timestamp(proposal.timestamp)
        ));
    }
    lines.join("\n")
}

/// Re-attach the numeric code to a projected name so readers can copy it
/// into a follow-up filter. Unregistered values are already digits.
fn display_with_code(registry: &EnumRegistry, name: &str) -> String {
    match registry.code(name) {
        Some(code) => format!("{} ({})", name, code),
        None => name.to_string(),
    }
}

fn format_timestamp(seconds: u64) -> String {
    match DateTime::from_timestamp(seconds as i64, 0) {
        Some(when) => when.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => seconds.to_string(),
    }
}
