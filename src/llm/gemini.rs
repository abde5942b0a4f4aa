use async_trait::async_trait;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE } };
use serde::{ Deserialize, Serialize };

use super::{ non_blank, GenerationClient, GenerationPrompt, LlmConfig, LlmError, DEFAULT_BASE_URL, DEFAULT_MODEL };

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

fn build_request(prompt: &GenerationPrompt) -> GeminiRequest {
    GeminiRequest {
        system_instruction: GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: Some(prompt.system_instruction.clone()) }],
        },
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart { text: Some(prompt.user_instruction.clone()) }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: prompt.sampling.max_output_tokens,
            temperature: prompt.sampling.temperature,
            response_mime_type: "application/json",
        },
    }
}

/// Text parts of the first candidate; non-text parts are skipped.
fn text_segments(resp: GeminiResponse) -> Vec<String> {
    resp.candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default()
}

async fn read_segments(resp: reqwest::Response) -> Result<Vec<String>, LlmError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(LlmError::Api { status, message });
    }

    let body = resp.json::<GeminiResponse>().await?;
    let segments = text_segments(body);
    debug!("Gemini returned {} text segment(s)", segments.len());
    Ok(segments)
}

pub struct GeminiChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, LlmError> {
        let chat_model = non_blank(model.as_deref()).unwrap_or(DEFAULT_MODEL).to_string();
        let api_url = non_blank(base_url.as_deref()).unwrap_or(DEFAULT_BASE_URL).to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(&api_key)
                .map_err(|e| LlmError::Config(format!("Invalid API key format: {}", e)))?
        );

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            model: chat_model,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::new(config.api_key.clone(), config.model.clone(), config.base_url.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl GenerationClient for GeminiChatClient {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<Vec<String>, LlmError> {
        let url = self.endpoint();
        info!("GeminiChatClient::generate() → model={} base_url={}", self.model, self.base_url);

        let resp = self.http.post(&url).json(&build_request(prompt)).send().await?;
        read_segments(resp).await
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
