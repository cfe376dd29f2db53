//! Gateway request and reply variants.

use serde::{Deserialize, Serialize};

use crate::{
    domain::documents::{Document, DocumentRecord, HistoryEntry, Status},
    gateway::GatewayError,
    wire::{Acknowledged, Data, Envelope},
};

/// Body of an authenticated `POST`, one variant per `action`.
///
/// Fields the operator cannot be trusted with, such as `user` and `role`,
/// are not part of any variant and are dropped while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GatewayRequest {
    Add {
        prd_number: String,
        app_name: String,
        status: Status,
    },
    UpdateStatus {
        prd_code: String,
        new_status: Status,
        #[serde(default)]
        comment: String,
    },
    GetHistory {
        prd_code: String,
    },
}

impl GatewayRequest {
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for malformed JSON, unknown
    /// actions, unknown statuses or missing fields.
    pub fn from_json(body: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(body).map_err(|error| GatewayError::InvalidRequest(error.to_string()))
    }

    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::UpdateStatus { .. } => "updateStatus",
            Self::GetHistory { .. } => "getHistory",
        }
    }
}

/// Outcome of a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    Added(Document),
    StatusUpdated,
    History(Vec<HistoryEntry>),
}

impl GatewayReply {
    /// JSON body relayed to the operator.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Added(document) => serde_json::to_value(Envelope::Success(Data {
                data: DocumentRecord::from(document),
            })),
            Self::StatusUpdated => serde_json::to_value(Envelope::Success(Acknowledged {})),
            Self::History(entries) => serde_json::to_value(Envelope::Success(Data {
                data: entries,
            })),
        }
    }
}
