use serde::{Deserialize, Serialize};

use super::ChainId;

/// Parent organisation ("chain") a brand belongs to. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub chain_id: ChainId,
    pub chain_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
