// src/interpreter.rs

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Explanation used when the model returned valid JSON but omitted its own.
pub const DEFAULT_EXPLANATION: &str = "Map operation implemented successfully.";

/// Explanation used when code had to be mined out of a fenced block.
pub const EXTRACTED_EXPLANATION: &str =
    "Code extracted from response. Original formatting was not proper JSON.";

/// The validated outcome of interpreting a model reply. `code` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeResult {
    pub code: String,
    pub explanation: String,
}

/// Failure to turn a raw model reply into code. Every variant carries the
/// original text for diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    #[error("model reply was not valid JSON")]
    MalformedJson { raw: String },

    #[error("model reply JSON has no usable code field")]
    MissingCodeField { raw: String },

    #[error("no code could be extracted from the model reply")]
    NoExtractableCode { raw: String },
}

impl InterpretError {
    /// The raw reply text that failed interpretation.
    pub fn raw(&self) -> &str {
        match self {
            InterpretError::MalformedJson { raw }
            | InterpretError::MissingCodeField { raw }
            | InterpretError::NoExtractableCode { raw } => raw,
        }
    }
}

// Checked in this exact order; the first pattern that matches wins, even if a
// later one would capture more. `json` sits before `js` because the `js`
// pattern would otherwise match the prefix of a `json` label.
fn fence_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"```javascript([\s\S]*?)```",
            r"```json([\s\S]*?)```",
            r"```js([\s\S]*?)```",
            r"```([\s\S]*?)```",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("fence pattern is valid"))
        .collect()
    })
}

/// Strict first-tier parse: the reply must be a JSON object whose `code`
/// field is a non-empty string. A missing `explanation` is filled with
/// [`DEFAULT_EXPLANATION`].
pub fn parse_strict(raw: &str) -> Result<CodeResult, InterpretError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| InterpretError::MalformedJson {
        raw: raw.to_string(),
    })?;

    let code = value.get("code").and_then(|v| v.as_str()).unwrap_or("");
    if code.is_empty() {
        return Err(InterpretError::MissingCodeField {
            raw: raw.to_string(),
        });
    }

    let explanation = value
        .get("explanation")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_EXPLANATION)
        .to_string();

    Ok(CodeResult {
        code: code.to_string(),
        explanation,
    })
}

/// Interprets raw model text into a `{code, explanation}` result.
///
/// Providers do not reliably honor structured-output instructions, so the
/// strategies chain rather than failing fast: a strict JSON parse first, then
/// fenced-block extraction in fixed priority order. Only when every fallback
/// fails does this return [`InterpretError::NoExtractableCode`].
pub fn interpret_model_reply(raw: &str) -> Result<CodeResult, InterpretError> {
    match parse_strict(raw) {
        Ok(result) => return Ok(result),
        Err(e) => log::debug!("Strict parse of model reply failed: {}", e),
    }

    for pattern in fence_patterns() {
        if let Some(captures) = pattern.captures(raw) {
            let code = captures.get(1).map_or("", |m| m.as_str()).trim();
            if code.is_empty() {
                // First matching fence wins outright; an empty one means the
                // reply carried no code.
                break;
            }
            return Ok(CodeResult {
                code: code.to_string(),
                explanation: EXTRACTED_EXPLANATION.to_string(),
            });
        }
    }

    Err(InterpretError::NoExtractableCode {
        raw: raw.to_string(),
    })
}
