//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

/// Values of the `outcome` label
pub mod outcome {
    pub const SUCCESS: &str = "success";
    pub const REJECTED: &str = "rejected";
    pub const ERROR: &str = "error";
}

/// Values of the `kind` label on query metrics
pub mod query {
    pub const LATEST: &str = "latest";
    pub const HISTORY: &str = "history";
}

/// Values of the `operation` label on store metrics
pub mod operation {
    pub const WRITE: &str = "write";
    pub const QUERY: &str = "query";
    pub const PING: &str = "ping";
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabels {
    pub outcome: String,
}

impl OutcomeLabels {
    pub fn new(outcome: &str) -> Self {
        Self {
            outcome: outcome.to_string(),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct QueryLabels {
    pub kind: String,
    pub outcome: String,
}

impl QueryLabels {
    pub fn new(kind: &str, outcome: &str) -> Self {
        Self {
            kind: kind.to_string(),
            outcome: outcome.to_string(),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StoreOperationLabels {
    pub operation: String,
}

impl StoreOperationLabels {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
        }
    }
}
