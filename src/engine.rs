//! Proposal query engine
//!
//! Orchestrates command parsing, the list-then-detail fetch sequence
//! against the governance client, client-side filtering, and projection
//! into the outbound shape.

use crate::command::{parse_command, QueryRequest};
use crate::error::{RelayError, RelayResult};
use crate::governance::{GovernanceClient, ListProposalsRequest, ProposalDetail};
use crate::projection::ProposalSummary;
use crate::registry::{statuses, topics};
use tracing::{debug, warn};

/// Query engine over a governance client
pub struct QueryEngine<C> {
    client: C,
}

impl<C: GovernanceClient> QueryEngine<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Run a raw chat line end to end.
    ///
    /// `Ok(None)` means the text was not a proposals command and no remote
    /// call was made.
    pub async fn execute(&self, text: &str) -> RelayResult<Option<Vec<ProposalSummary>>> {
        let Some(request) = parse_command(text)? else {
            return Ok(None);
        };
        self.run(&request).await.map(Some)
    }

    /// Execute a structured query request against the ledger.
    ///
    /// Any transport failure during the list call or a detail fetch aborts
    /// the whole query; no partial result is returned.
    pub async fn run(&self, request: &QueryRequest) -> RelayResult<Vec<ProposalSummary>> {
        if let Some(topic) = request.topic {
            if !topics().contains(topic) {
                warn!(topic, "Requested topic code is not registered; exclusion list cannot narrow it");
            }
        }
        if let Some(status) = request.status {
            if !statuses().contains(status) {
                warn!(status, "Requested status code is not registered");
            }
        }

        let list_request = build_list_request(request);
        debug!(?list_request, "Listing proposals");
        let handles = self.client.list_proposals(&list_request).await?;
        debug!(count = handles.len(), "Ledger returned proposal handles");

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in &handles {
            // The list operation does not return topic/status in a usable
            // form, so every surviving handle costs one detail round trip.
            let detail = match self.client.get_proposal_info(handle.id).await {
                Ok(Some(detail)) => detail,
                Ok(None) | Err(RelayError::NotFound(_)) => {
                    debug!(id = handle.id, "Listed proposal has no detail, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !matches_filters(request, &detail) {
                continue;
            }
            summaries.push(ProposalSummary::project(handle, &detail));
        }

        Ok(summaries)
    }
}

/// Translate a query request into the ledger's native filter dialect.
///
/// The ledger filters topics by exclusion, so an exact-topic request becomes
/// "exclude every other registered topic". Status filtering upstream is
/// inclusion-based and maps directly.
fn build_list_request(request: &QueryRequest) -> ListProposalsRequest {
    let exclude_topic = match request.topic {
        Some(topic) => topics()
            .codes()
            .into_iter()
            .filter(|&code| code != topic)
            .collect(),
        None => Vec::new(),
    };
    let include_status = request.status.map(|status| vec![status]).unwrap_or_default();

    ListProposalsRequest {
        limit: request.limit,
        exclude_topic,
        include_status,
    }
}

/// Re-check both filters against the resolved detail. The exclusion list
/// sent upstream is only as complete as the local topic registry, so the
/// ledger's own filtering is not trusted to be exact.
fn matches_filters(request: &QueryRequest, detail: &ProposalDetail) -> bool {
    request.topic.map_or(true, |topic| detail.topic == topic)
        && request.status.map_or(true, |status| detail.status == status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::transport_error;
    use crate::governance::ProposalHandle;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted in-memory ledger double
    #[derive(Default)]
    struct ScriptedLedger {
        handles: Vec<ProposalHandle>,
        details: HashMap<u64, ProposalDetail>,
        fail_detail_for: Option<u64>,
        recorded: Mutex<Vec<ListProposalsRequest>>,
    }

    impl ScriptedLedger {
        fn with_proposals(entries: &[(u64, u32, u32)]) -> Self {
            let mut ledger = Self::default();
            for &(id, topic, status) in entries {
                ledger.handles.push(ProposalHandle {
                    id,
                    title: Some(format!("Proposal {}", id)),
                    summary: Some(format!("Summary {}", id)),
                });
                ledger.details.insert(
                    id,
                    ProposalDetail {
                        id,
                        topic,
                        status,
                        timestamp_seconds: 1_700_000_000 + id,
                        summary: Some(format!("Summary {}", id)),
                    },
                );
            }
            ledger
        }

        fn last_request(&self) -> ListProposalsRequest {
            self.recorded.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl GovernanceClient for ScriptedLedger {
        async fn list_proposals(
            &self,
            request: &ListProposalsRequest,
        ) -> RelayResult<Vec<ProposalHandle>> {
            self.recorded.lock().unwrap().push(request.clone());
            Ok(self
                .handles
                .iter()
                .take(request.limit as usize)
                .cloned()
                .collect())
        }

        async fn get_proposal_info(&self, id: u64) -> RelayResult<Option<ProposalDetail>> {
            if self.fail_detail_for == Some(id) {
                return Err(transport_error("connection reset"));
            }
            Ok(self.details.get(&id).cloned())
        }
    }

    #[tokio::test]
    async fn test_bare_command_returns_at_most_ten() {
        let ledger = ScriptedLedger::with_proposals(
            &(1..=15u64).map(|id| (id, 4, 1)).collect::<Vec<_>>(),
        );
        let engine = QueryEngine::new(ledger);

        let summaries = engine.execute("!proposals").await.unwrap().unwrap();
        assert_eq!(summaries.len(), 10);
        assert_eq!(engine.client.last_request().limit, 10);
    }

    #[tokio::test]
    async fn test_unrelated_text_takes_no_action() {
        let engine = QueryEngine::new(ScriptedLedger::default());
        let outcome = engine.execute("gm everyone").await.unwrap();
        assert!(outcome.is_none());
        assert!(engine.client.recorded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_topic_filter_builds_exclusion_set() {
        let ledger = ScriptedLedger::with_proposals(&[(1, 13, 1), (2, 4, 1), (3, 13, 2)]);
        let engine = QueryEngine::new(ledger);

        let summaries = engine.execute("!proposals 50 topic 13").await.unwrap().unwrap();

        // Only topic 13 survives the client-side re-check.
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.topic == "IcOsVersionElection"));

        // The upstream request excludes every registered topic except 13.
        let request = engine.client.last_request();
        let expected: Vec<u32> = topics().codes().into_iter().filter(|&c| c != 13).collect();
        assert_eq!(request.exclude_topic, expected);
        assert!(!request.exclude_topic.contains(&13));
        assert_eq!(request.include_status, Vec::<u32>::new());
    }

    #[tokio::test]
    async fn test_status_filter_builds_inclusion_list() {
        let ledger = ScriptedLedger::with_proposals(&[(1, 4, 1), (2, 4, 4), (3, 7, 1)]);
        let engine = QueryEngine::new(ledger);

        let summaries = engine.execute("!proposals 10 status 1").await.unwrap().unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.status == "Open"));

        let request = engine.client.last_request();
        assert_eq!(request.include_status, vec![1]);
        assert_eq!(request.exclude_topic, Vec::<u32>::new());
    }

    #[tokio::test]
    async fn test_combined_filters_intersect() {
        let ledger = ScriptedLedger::with_proposals(&[
            (1, 17, 4),
            (2, 17, 1),
            (3, 13, 4),
            (4, 17, 4),
        ]);
        let engine = QueryEngine::new(ledger);

        let summaries = engine
            .execute("!proposals 20 topic 17 status 4")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "1");
        assert_eq!(summaries[1].id, "4");
        assert!(summaries
            .iter()
            .all(|s| s.topic == "ProtocolCanisterManagement" && s.status == "Executed"));
    }

    #[tokio::test]
    async fn test_list_order_is_preserved() {
        let ledger = ScriptedLedger::with_proposals(&[(9, 4, 1), (2, 4, 1), (7, 4, 1)]);
        let engine = QueryEngine::new(ledger);

        let summaries = engine.execute("!proposals").await.unwrap().unwrap();
        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "2", "7"]);
    }

    #[tokio::test]
    async fn test_missing_detail_skips_item() {
        let mut ledger = ScriptedLedger::with_proposals(&[(1, 4, 1), (2, 4, 1), (3, 4, 1)]);
        ledger.details.remove(&2);
        let engine = QueryEngine::new(ledger);

        let summaries = engine.execute("!proposals").await.unwrap().unwrap();
        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_whole_query() {
        let mut ledger = ScriptedLedger::with_proposals(&[(1, 4, 1), (2, 4, 1), (3, 4, 1)]);
        ledger.fail_detail_for = Some(2);
        let engine = QueryEngine::new(ledger);

        let result = engine.execute("!proposals").await;
        assert!(matches!(result, Err(RelayError::Transport(_))));
    }

    #[tokio::test]
    async fn test_zero_limit_passes_through() {
        let ledger = ScriptedLedger::with_proposals(&[(1, 4, 1)]);
        let engine = QueryEngine::new(ledger);

        let summaries = engine.execute("!proposals 0").await.unwrap().unwrap();
        assert!(summaries.is_empty());
        assert_eq!(engine.client.last_request().limit, 0);
    }

    #[tokio::test]
    async fn test_identical_queries_are_idempotent() {
        let ledger = ScriptedLedger::with_proposals(&[(1, 13, 1), (2, 13, 2), (3, 4, 1)]);
        let engine = QueryEngine::new(ledger);

        let first = engine.execute("!proposals 50 topic 13").await.unwrap().unwrap();
        let second = engine.execute("!proposals 50 topic 13").await.unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_command_is_surfaced() {
        let engine = QueryEngine::new(ScriptedLedger::default());
        let result = engine.execute("!proposals ten").await;
        assert!(matches!(result, Err(RelayError::MalformedCommand(_))));
        assert!(engine.client.recorded.lock().unwrap().is_empty());
    }
}
