//! Chat command parsing
//!
//! Turns `!proposals [<limit>] [topic <id>] [status <id>]` into a structured
//! query request. Keywords match case-insensitively; the field order is
//! fixed.

use crate::error::{malformed_command, RelayError};

/// Leading keyword that addresses the proposals handler
pub const COMMAND_KEYWORD: &str = "!proposals";

/// Fetch size used when no limit is given
pub const DEFAULT_LIMIT: u32 = 10;

/// Structured filter request derived from a chat command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRequest {
    /// Caps the remote fetch size; 0 is legal and passed through verbatim
    pub limit: u32,
    /// Constrain results to one topic code
    pub topic: Option<u32>,
    /// Constrain results to one status code
    pub status: Option<u32>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            topic: None,
            status: None,
        }
    }
}

/// Parse a raw chat line.
///
/// Returns `Ok(None)` when the line is not addressed to the proposals
/// handler at all. A line that starts with the command keyword but then
/// deviates from the grammar is rejected as malformed instead of silently
/// falling back to defaults.
pub fn parse_command(text: &str) -> Result<Option<QueryRequest>, RelayError> {
    let mut tokens = text.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };
    if !first.eq_ignore_ascii_case(COMMAND_KEYWORD) {
        return Ok(None);
    }

    let rest: Vec<&str> = tokens.collect();
    let mut request = QueryRequest::default();
    let mut idx = 0;

    // Optional bare limit comes first.
    if let Some(token) = rest.first() {
        if let Ok(limit) = token.parse::<u32>() {
            request.limit = limit;
            idx = 1;
        }
    }

    // Optional `topic <id>`, then optional `status <id>`, in that order.
    if idx < rest.len() && rest[idx].eq_ignore_ascii_case("topic") {
        request.topic = Some(parse_filter_id(&rest, idx + 1, "topic")?);
        idx += 2;
    }
    if idx < rest.len() && rest[idx].eq_ignore_ascii_case("status") {
        request.status = Some(parse_filter_id(&rest, idx + 1, "status")?);
        idx += 2;
    }

    if idx < rest.len() {
        return Err(malformed_command(format!(
            "unexpected token '{}' (usage: {} [<limit>] [topic <id>] [status <id>])",
            rest[idx], COMMAND_KEYWORD
        )));
    }

    Ok(Some(request))
}

fn parse_filter_id(tokens: &[&str], idx: usize, keyword: &str) -> Result<u32, RelayError> {
    let raw = tokens
        .get(idx)
        .ok_or_else(|| malformed_command(format!("'{}' requires a numeric id", keyword)))?;
    raw.parse::<u32>().map_err(|_| {
        malformed_command(format!(
            "'{}' id must be a non-negative integer, got '{}'",
            keyword, raw
        ))
    })
}
