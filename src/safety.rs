// src/safety.rs

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// A generated code payload matched one of the disallowed patterns.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Generated code contains a disallowed operation: {pattern}")]
pub struct SafetyViolation {
    /// Human-readable name of the pattern that matched.
    pub pattern: String,
}

// Operations the map boundary must never receive: cookie and storage access,
// network calls, dynamic evaluation, and navigation.
const DISALLOWED: &[(&str, &str)] = &[
    ("document.cookie", r"(?i)document\.cookie"),
    ("localStorage", r"(?i)localStorage"),
    ("sessionStorage", r"(?i)sessionStorage"),
    ("fetch()", r"(?i)fetch\s*\("),
    ("XMLHttpRequest", r"(?i)XMLHttpRequest"),
    ("eval()", r"(?i)eval\s*\("),
    ("Function()", r"(?i)Function\s*\("),
    ("document.write", r"(?i)document\.write"),
    ("window.open", r"(?i)window\.open"),
    ("window.location", r"(?i)window\.location"),
];

fn patterns() -> &'static [(String, Regex)] {
    static PATTERNS: OnceLock<Vec<(String, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DISALLOWED
            .iter()
            .map(|(name, pattern)| {
                (
                    (*name).to_string(),
                    Regex::new(pattern).expect("disallowed pattern is valid"),
                )
            })
            .collect()
    })
}

/// Scans a code payload and rejects it if any disallowed pattern matches.
/// Reports the first match found, in the fixed order of the pattern list.
pub fn check_code(code: &str) -> Result<(), SafetyViolation> {
    for (name, regex) in patterns() {
        if regex.is_match(code) {
            log::warn!("Safety filter rejected code matching '{}'", name);
            return Err(SafetyViolation {
                pattern: name.clone(),
            });
        }
    }
    Ok(())
}
