use serde::{Deserialize, Serialize};

/// A transformation theme the guest can pick at the kiosk.
///
/// `prompt` drives the upstream generation request; `name` and
/// `thumbnail` label the result in upload metadata and notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}
