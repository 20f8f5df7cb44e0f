//! Post-round commentary
//!
//! A text model reacts to the final score. The call may be slow or fail;
//! `CommentaryService` always yields something printable, falling back to a
//! canned line picked by score.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::ROAST_THRESHOLD;

/// Fallback for low scores
pub const ROAST_FALLBACK: &str = "Gravity is your worst enemy, isn't it?";
/// Fallback for everything else
pub const NEUTRAL_FALLBACK: &str = "That was... a performance. Of some kind.";
/// Used when the model answers with nothing
pub const EMPTY_REPLY_FALLBACK: &str = "Better luck next time, featherweight!";

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server answered with HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("commentary is not available on this platform")]
    Unavailable,
}

/// A text-generation backend
#[allow(async_fn_in_trait)]
pub trait CommentaryProvider {
    async fn complete(&self, prompt: &str) -> Result<String, CommentaryError>;
}

/// Canned line for when the provider fails
pub fn fallback_for(score: u32) -> &'static str {
    if score < ROAST_THRESHOLD {
        ROAST_FALLBACK
    } else {
        NEUTRAL_FALLBACK
    }
}

/// Prompt describing the finished round
pub fn build_prompt(score: u32, prior_high: u32) -> String {
    let record = if score > prior_high && prior_high > 0 {
        "They set a new personal record!\n"
    } else {
        ""
    };
    format!(
        "You are a witty, slightly sarcastic commentator for a one-button flying game.\n\
         The player just finished a round.\n\
         Player score: {score}\n\
         Previous high score: {prior_high}\n\
         {record}\
         Reply with one short reaction of at most 20 words.\n\
         Under 5 points: be funny and roast them a little.\n\
         5 to 20 points: be encouraging but cool.\n\
         Over 20 points: be impressed.\n"
    )
}

/// Commentary with graceful degradation
pub struct CommentaryService<P> {
    provider: P,
}

impl<P: CommentaryProvider> CommentaryService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Reaction to a finished round; never fails
    pub async fn get_commentary(&self, score: u32, prior_high: u32) -> String {
        let prompt = build_prompt(score, prior_high);
        match self.provider.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => EMPTY_REPLY_FALLBACK.to_string(),
            Err(e) => {
                log::error!("Commentary failed: {}", e);
                fallback_for(score).to_string()
            }
        }
    }
}

/// Provider for builds without network access; always falls back
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl CommentaryProvider for OfflineProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, CommentaryError> {
        Err(CommentaryError::Unavailable)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// JSON body for a `generateContent` call
pub fn request_body(prompt: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&GenerateRequest {
        contents: [RequestContent {
            parts: [RequestPart { text: prompt }],
        }],
    })
}

/// Text of the first candidate; empty if the model returned none
pub fn parse_response(json: &str) -> Result<String, CommentaryError> {
    let response: GenerateResponse = serde_json::from_str(json)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    Ok(text)
}

/// Gemini `generateContent` over browser fetch
#[cfg(target_arch = "wasm32")]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
}

#[cfg(target_arch = "wasm32")]
impl GeminiClient {
    /// Key baked in at build time through `GEMINI_API_KEY`
    pub fn from_build_env() -> Self {
        let api_key = option_env!("GEMINI_API_KEY")
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        if api_key.is_none() {
            log::warn!("GEMINI_API_KEY not set at build time, using canned commentary");
        }
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl CommentaryProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CommentaryError> {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        fn js_err(e: JsValue) -> CommentaryError {
            CommentaryError::Transport(format!("{e:?}"))
        }

        let key = self
            .api_key
            .as_deref()
            .ok_or(CommentaryError::MissingApiKey)?;
        let url = format!("{API_BASE}/{}:generateContent?key={key}", self.model);

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&request_body(prompt)?));
        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_err)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_err)?;

        let window = web_sys::window()
            .ok_or_else(|| CommentaryError::Transport("no window".to_string()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        if !response.ok() {
            return Err(CommentaryError::Status(response.status()));
        }

        let body = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?
            .as_string()
            .ok_or_else(|| CommentaryError::Transport("response body is not text".to_string()))?;
        parse_response(&body)
    }
}
