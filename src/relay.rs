use log::{ error, info, warn };
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::prompt::{ build_user_instruction, HISTORY_FOR_PROMPT_LEN, SYSTEM_INSTRUCTION };
use crate::error::RelayError;
use crate::llm::{ GenerationClient, GenerationPrompt, SamplingParams };
use crate::models::api::{ GenerateRequest, GenerateResponse };
use crate::models::chat::ConversationMessage;

const FENCE: &str = "```";

/// A request that passed boundary validation: the prompt is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub conversation: Vec<ConversationMessage>,
}

impl TryFrom<GenerateRequest> for GenerationRequest {
    type Error = RelayError;

    fn try_from(req: GenerateRequest) -> Result<Self, Self::Error> {
        let prompt = req.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(RelayError::Validation)?
            .to_string();
        Ok(Self { prompt, conversation: req.conversation })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub reply: String,
    pub html: String,
}

impl From<GenerationResult> for GenerateResponse {
    fn from(result: GenerationResult) -> Self {
        Self { reply: result.reply, game: result.html }
    }
}

/// Stateless bridge between HTTP callers and the model service. The client is
/// `None` when no credential was configured at startup.
#[derive(Clone)]
pub struct GameRelay {
    client: Option<Arc<dyn GenerationClient>>,
    sampling: SamplingParams,
}

impl GameRelay {
    pub fn new(client: Option<Arc<dyn GenerationClient>>) -> Self {
        Self { client, sampling: SamplingParams::default() }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&Arc<dyn GenerationClient>, RelayError> {
        self.client.as_ref().ok_or(RelayError::Configuration)
    }

    pub fn ensure_configured(&self) -> Result<(), RelayError> {
        self.client().map(|_| ())
    }

    /// Validates a raw request body against the wire schema.
    pub fn decode_request(&self, body: &[u8]) -> Result<GenerationRequest, RelayError> {
        self.client()?;
        let req: GenerateRequest = serde_json
            ::from_slice(body)
            .map_err(RelayError::MalformedRequest)?;
        GenerationRequest::try_from(req)
    }

    pub async fn handle(&self, body: &[u8]) -> Result<GenerateResponse, RelayError> {
        let request = self.decode_request(body)?;
        Ok(self.generate(request).await?.into())
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, RelayError> {
        let client = self.client()?;
        if request.prompt.trim().is_empty() {
            return Err(RelayError::Validation);
        }

        let prompt = GenerationPrompt {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_instruction: build_user_instruction(&request.prompt, &request.conversation),
            sampling: self.sampling.clone(),
        };
        info!(
            "Generating game: model={} history_turns={}",
            client.get_model(),
            request.conversation.len().min(HISTORY_FOR_PROMPT_LEN)
        );

        let segments = client.generate(&prompt).await.map_err(|e| {
            error!("Model service call failed: {}", e);
            RelayError::from(e)
        })?;

        let result = parse_model_output(&segments.concat());
        match &result {
            Ok(r) => info!("Generated game: reply_len={} html_len={}", r.reply.len(), r.html.len()),
            Err(e) => error!("Unusable model output: {}", e),
        }
        result
    }
}

/// Removes a fence wrapping the whole output: a leading ``` with an optional
/// language tag and a trailing ```. Backticks inside the body are kept.
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix(FENCE) {
        let tag_len = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());
        body = &rest[tag_len..];
    }
    if let Some(rest) = body.strip_suffix(FENCE) {
        body = rest;
    }
    body.trim().to_string()
}

/// Canonical parse first, then one retry after fence cleanup.
pub fn parse_model_output(raw: &str) -> Result<GenerationResult, RelayError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(RelayError::EmptyResponse);
    }

    let value = match serde_json::from_str::<JsonValue>(text) {
        Ok(v) => v,
        Err(first) => {
            warn!("Model output is not plain JSON ({}), retrying without code fences", first);
            serde_json
                ::from_str::<JsonValue>(&strip_code_fences(text))
                .map_err(RelayError::UnparsableResponse)?
        }
    };

    let field = |name: &str| -> Option<String> {
        value
            .get(name)
            .and_then(JsonValue::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    match (field("reply"), field("html")) {
        (Some(reply), Some(html)) => Ok(GenerationResult { reply, html }),
        _ => Err(RelayError::IncompleteResponse),
    }
}
