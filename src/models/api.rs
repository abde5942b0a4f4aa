use serde::{ Serialize, Deserialize };

use super::chat::ConversationMessage;

/// Body of `POST /api/generate`. `prompt` stays optional here so a missing
/// prompt surfaces as a validation failure rather than a malformed body.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub conversation: Vec<ConversationMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub reply: String,
    pub game: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
