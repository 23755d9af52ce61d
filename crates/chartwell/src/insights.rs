//! Language-model insights for a loaded dataset.
//!
//! This module turns a dataset and chart selection into a bounded prompt,
//! sends it to a language model, and decodes the structured reply.
//!
//! # Pipeline
//!
//! ```text
//! Dataset + ChartSelection
//!     ↓ build_prompt (sampled to PromptOptions::sample_rows)
//! PromptPayload
//!     ↓ LanguageModel::complete
//! Raw reply text
//!     ↓ parse_response
//! InsightsResult
//! ```
//!
//! Prompt building and response parsing are stateless. Association of a
//! reply with the request that produced it is handled by [`RequestTracker`]
//! and [`crate::session::Session`].
//!
//! # Errors
//!
//! [`InsightsError::Transport`] covers failures to reach the model or a
//! non-success status. [`InsightsError::Decode`] covers replies that arrive
//! but do not have the expected shape. The two are kept apart so callers can
//! tell "try again later" from "the model misbehaved".

mod client;
mod prompt;
mod response;
mod tracker;

pub use client::{ChatMessage, CompletionRequest, HttpLanguageModel, LanguageModel, Role};
pub use prompt::{
    CaptionRequest, InsightsRequest, PromptOptions, PromptPayload, build_caption_prompt,
    build_prompt,
};
pub use response::{Caption, InsightsResult, parse_caption, parse_response};
pub use tracker::{RequestToken, RequestTracker};

use log::info;
use thiserror::Error;

/// Errors raised while requesting or decoding insights.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightsError {
    /// The request could not be delivered or the endpoint refused it.
    #[error("insights request failed: {0}")]
    Transport(String),

    /// The reply arrived but could not be decoded.
    #[error("insights reply could not be decoded: {0}")]
    Decode(String),
}

/// Sends `payload` to `model` and decodes the structured reply.
///
/// # Errors
///
/// Returns [`InsightsError::Transport`] if the model cannot be reached and
/// [`InsightsError::Decode`] if the reply is not a valid insights object.
pub fn request_insights<M>(model: &M, payload: &PromptPayload) -> Result<InsightsResult, InsightsError>
where
    M: LanguageModel + ?Sized,
{
    info!(
        sampled_rows = payload.request().rows().len(),
        total_rows = payload.total_rows();
        "Requesting insights"
    );
    let reply = model.complete(&payload.completion())?;
    parse_response(&reply)
}

/// Sends a caption prompt for `request` to `model`.
///
/// # Errors
///
/// Returns [`InsightsError::Transport`] if the model cannot be reached.
pub fn request_caption<M>(
    model: &M,
    request: &CaptionRequest,
    language: &str,
) -> Result<Caption, InsightsError>
where
    M: LanguageModel + ?Sized,
{
    info!(chart_type = request.chart_type(); "Requesting caption");
    let reply = model.complete(&build_caption_prompt(request, language))?;
    Ok(parse_caption(&reply))
}
