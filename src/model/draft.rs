use serde::{Deserialize, Serialize};

use super::ColumnId;

/// Unsubmitted add-card form text, persisted so an interrupted session can
/// pick up where it left off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Draft {
    #[serde(rename = "columnId")]
    pub column: ColumnId,
    pub text: String,
}
