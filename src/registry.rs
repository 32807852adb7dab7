//! Governance enum registries
//!
//! Immutable code <-> name mappings for proposal topics and statuses,
//! sourced from the governance ledger's published schema. Built once at
//! startup and never mutated afterwards.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Bidirectional code <-> name mapping for a governance enum
#[derive(Debug)]
pub struct EnumRegistry {
    by_code: HashMap<u32, &'static str>,
    by_name: HashMap<&'static str, u32>,
}

impl EnumRegistry {
    fn new(entries: &[(u32, &'static str)]) -> Self {
        Self {
            by_code: entries.iter().copied().collect(),
            by_name: entries.iter().map(|&(code, name)| (name, code)).collect(),
        }
    }

    /// Resolve a code to its canonical name
    pub fn name(&self, code: u32) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }

    /// Resolve a canonical name back to its code
    pub fn code(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Whether a code is registered
    pub fn contains(&self, code: u32) -> bool {
        self.by_code.contains_key(&code)
    }

    /// All registered codes, ascending
    pub fn codes(&self) -> Vec<u32> {
        let mut codes: Vec<u32> = self.by_code.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Display form for a code: the canonical name, or the decimal code
    /// when the ledger reports something this registry does not know.
    pub fn display(&self, code: u32) -> String {
        match self.name(code) {
            Some(name) => name.to_string(),
            None => code.to_string(),
        }
    }
}

// Topic code 11 (the retired SNS decentralization sale) is deliberately
// absent; the ledger no longer assigns it.
const TOPIC_ENTRIES: &[(u32, &str)] = &[
    (0, "Unspecified"),
    (1, "NeuronManagement"),
    (2, "ExchangeRate"),
    (3, "NetworkEconomics"),
    (4, "Governance"),
    (5, "NodeAdmin"),
    (6, "ParticipantManagement"),
    (7, "SubnetManagement"),
    (8, "NetworkCanisterManagement"),
    (9, "Kyc"),
    (10, "NodeProviderRewards"),
    (12, "IcOsVersionDeployment"),
    (13, "IcOsVersionElection"),
    (14, "SnsAndCommunityFund"),
    (15, "ApiBoundaryNodeManagement"),
    (16, "SubnetRental"),
    (17, "ProtocolCanisterManagement"),
    (18, "ServiceNervousSystemManagement"),
];

const STATUS_ENTRIES: &[(u32, &str)] = &[
    (1, "Open"),
    (2, "Rejected"),
    (3, "Adopted"),
    (4, "Executed"),
    (5, "Failed"),
];

static TOPIC_REGISTRY: Lazy<EnumRegistry> = Lazy::new(|| EnumRegistry::new(TOPIC_ENTRIES));
static STATUS_REGISTRY: Lazy<EnumRegistry> = Lazy::new(|| EnumRegistry::new(STATUS_ENTRIES));

/// Proposal topic registry
pub fn topics() -> &'static EnumRegistry {
    &TOPIC_REGISTRY
}

/// Proposal status registry
pub fn statuses() -> &'static EnumRegistry {
    &STATUS_REGISTRY
}
