// src/error.rs

use reqwest::header::InvalidHeaderValue;
use serde_json::Value;
use thiserror::Error;

use crate::interpreter::InterpretError;
use crate::ops::OpError;
use crate::safety::SafetyViolation;

#[derive(Error, Debug)]
pub enum MapLlmError {
    #[error("HTTP request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL parsing failed: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON processing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(InvalidHeaderValue),

    #[error("LLM provider API key is missing")]
    MissingApiKey,

    #[error("LLM provider error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected provider response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Interpret(#[from] InterpretError),

    #[error(transparent)]
    InvalidOperations(#[from] OpError),

    #[error(transparent)]
    UnsafeCode(#[from] SafetyViolation),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MapLlmError {
    /// Creates a `MapLlmError` from a non-2xx provider status and its JSON
    /// body. Providers wrap details as `{"error": {"message": ...}}` or a
    /// bare `{"error": "..."}` string.
    pub(crate) fn from_response(status_code: u16, response_body: Value) -> Self {
        let message = response_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .or_else(|| response_body.get("error").and_then(|e| e.as_str()))
            .unwrap_or("Unknown provider error")
            .to_string();

        MapLlmError::ApiError {
            status: status_code,
            message,
        }
    }

    /// The HTTP-equivalent status a transport layer should report for this
    /// error: 400 for bad inbound input, 403 for the safety filter, 422 for
    /// an operation payload that fails validation, 500 for everything that
    /// went wrong between us and the provider.
    pub fn status_code(&self) -> u16 {
        match self {
            MapLlmError::InvalidInput(_) => 400,
            MapLlmError::UnsafeCode(_) => 403,
            MapLlmError::InvalidOperations(_) => 422,
            _ => 500,
        }
    }
}
