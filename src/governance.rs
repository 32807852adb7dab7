//! Governance gateway client
//!
//! A narrow RPC facade over the governance canister's two query methods,
//! spoken as JSON through a boundary gateway. The trait seam keeps the
//! query engine testable against scripted doubles.

use crate::config::Settings;
use crate::error::{config_error, transport_error, RelayError, RelayResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Filter request in the ledger's native dialect.
///
/// Topic filtering is exclusion-based upstream while status filtering is
/// inclusion-based; the engine translates its own filters accordingly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProposalsRequest {
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_topic: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_status: Vec<u32>,
}

/// Minimal identifying data returned by the list operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalHandle {
    pub id: u64,
    pub title: Option<String>,
    pub summary: Option<String>,
}

/// Full record returned by the per-id fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetail {
    pub id: u64,
    pub topic: u32,
    pub status: u32,
    pub timestamp_seconds: u64,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetProposalInfoRequest {
    proposal_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListProposalsResponse {
    proposal_info: Vec<ProposalHandle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProposalInfoResponse {
    proposal: Option<ProposalDetail>,
}

/// Client seam over the two remote governance operations
#[async_trait]
pub trait GovernanceClient: Send + Sync {
    /// Fetch up to `limit` proposal handles matching the ledger-side filters
    async fn list_proposals(
        &self,
        request: &ListProposalsRequest,
    ) -> RelayResult<Vec<ProposalHandle>>;

    /// Fetch the full record for one proposal; `None` when the ledger has
    /// no detail for the id
    async fn get_proposal_info(&self, id: u64) -> RelayResult<Option<ProposalDetail>>;
}

/// HTTP implementation speaking JSON to a boundary gateway in front of
/// the governance canister
pub struct HttpGovernanceClient {
    http: reqwest::Client,
    host: Url,
    canister_id: String,
    timeout: Duration,
}

impl HttpGovernanceClient {
    pub fn new(settings: &Settings) -> RelayResult<Self> {
        let timeout = settings.gateway.request_timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| config_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            host: settings.gateway.host.clone(),
            canister_id: settings.governance.canister_id.clone(),
            timeout,
        })
    }

    fn method_url(&self, method: &str) -> RelayResult<Url> {
        let path = format!("api/v2/canister/{}/query/{}", self.canister_id, method);
        self.host
            .join(&path)
            .map_err(|e| config_error(format!("Invalid gateway URL for '{}': {}", method, e)))
    }

    async fn post_json<Req>(&self, method: &str, request: &Req) -> RelayResult<reqwest::Response>
    where
        Req: Serialize + Sync,
    {
        let url = self.method_url(method)?;
        debug!(%url, method, "Querying governance gateway");
        self.http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.wrap_reqwest_error(method, e, "request failed"))
    }

    async fn query<Req, Resp>(&self, method: &str, request: &Req) -> RelayResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self.post_json(method, request).await?;
        let response = response.error_for_status().map_err(|e| {
            transport_error(format!("'{}' rejected by gateway: {}", method, e))
        })?;
        response
            .json::<Resp>()
            .await
            .map_err(|e| self.wrap_reqwest_error(method, e, "returned a malformed response"))
    }

    fn wrap_reqwest_error(&self, method: &str, err: reqwest::Error, context: &str) -> RelayError {
        if err.is_timeout() {
            RelayError::Timeout {
                method: method.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            transport_error(format!("'{}' {}: {}", method, context, err))
        }
    }
}

#[async_trait]
impl GovernanceClient for HttpGovernanceClient {
    async fn list_proposals(
        &self,
        request: &ListProposalsRequest,
    ) -> RelayResult<Vec<ProposalHandle>> {
        let response: ListProposalsResponse = self.query("list_proposals", request).await?;
        Ok(response.proposal_info)
    }

    async fn get_proposal_info(&self, id: u64) -> RelayResult<Option<ProposalDetail>> {
        let request = GetProposalInfoRequest { proposal_id: id };
        let response = self.post_json("get_proposal_info", &request).await?;

        // The ledger legitimately answers 404 for an id that vanished
        // between list and detail.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RelayError::NotFound(id));
        }
        let response = response.error_for_status().map_err(|e| {
            transport_error(format!("'get_proposal_info' rejected by gateway: {}", e))
        })?;
        let body: ProposalInfoResponse = response.json().await.map_err(|e| {
            self.wrap_reqwest_error("get_proposal_info", e, "returned a malformed response")
        })?;
        Ok(body.proposal)
    }
}
