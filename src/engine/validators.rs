//! Post-match validators
//!
//! A validator returns `true` when a candidate should still be reported.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::rules::Validator;

/// Token prefixes worth reporting when found inside decoded base64
static HIGH_CONFIDENCE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(?:AKIA|ASIA)[0-9A-Z]{16}\b",
        r"\bgh[pousr]_[A-Za-z0-9]{36,}",
        r"\bgithub_pat_[A-Za-z0-9_]{22,}",
        r"\bsk-ant-[A-Za-z0-9_\-]{20,}",
        r"\bsk-(?:proj|svcacct|admin)-[A-Za-z0-9_\-]{20,}",
        r"\b[sr]k_live_[A-Za-z0-9]{10,}",
        r"\bxox[abposr]-[A-Za-z0-9\-]{10,}",
        r"\bAIza[0-9A-Za-z_\-]{35}",
        r"-----BEGIN [A-Z ]*PRIVATE KEY-----",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Words in a claim value that mark a token as a sample
const SAMPLE_MARKERS: &[&str] = &[
    "test",
    "example",
    "sample",
    "demo",
    "dummy",
    "fake",
    "mock",
    "placeholder",
];

/// Whole claim values seen in published sample tokens
const SAMPLE_VALUES: &[&str] = &["1234567890", "john doe"];

/// Claims inspected for sample markers
const SAMPLE_CLAIMS: &[&str] = &["sub", "iss", "aud", "name"];

impl Validator {
    /// Check a candidate `value` (the `secret` capture or the whole match)
    pub fn validate(&self, value: &str, caps: &Captures) -> bool {
        match self {
            Validator::Luhn => luhn_valid(value),
            Validator::StructuredToken => structured_token_reportable(value),
            Validator::Base64Rescan => base64_hides_secret(value),
            Validator::BalancedDelimiter => delimiters_balanced(caps),
        }
    }
}

/// Luhn checksum over the digits of `candidate`, ignoring separators
pub fn luhn_valid(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();
    if !(12..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Decode base64 in either alphabet, with or without padding
fn decode_lenient(encoded: &str) -> Option<Vec<u8>> {
    let standard: String = encoded
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    STANDARD_NO_PAD.decode(standard).ok()
}

/// Inspect the payload of a three-part token.
///
/// Tokens whose claims carry an obvious sample marker are dropped. Anything
/// that cannot be decoded is still reported.
pub fn structured_token_reportable(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return true;
    }

    let Some(bytes) = decode_lenient(parts[1]) else {
        return true;
    };
    let Ok(serde_json::Value::Object(claims)) = serde_json::from_slice(&bytes) else {
        return true;
    };

    let is_sample = SAMPLE_CLAIMS
        .iter()
        .filter_map(|field| claims.get(*field))
        .any(claim_is_sample);

    !is_sample
}

fn claim_is_sample(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::String(s) => {
            let lower = s.to_lowercase();
            let words: Vec<&str> = lower
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
                .collect();
            SAMPLE_VALUES.contains(&words.join(" ").as_str())
                || words.iter().any(|w| SAMPLE_MARKERS.contains(w))
        }
        serde_json::Value::Array(items) => items.iter().any(claim_is_sample),
        _ => false,
    }
}

/// Decode a base64 run and rescan it for high-confidence token prefixes.
///
/// The run may start inside an identifier (`TOKEN_<base64>`), so every
/// leading offset up to one quantum is tried. Decoded text is split at
/// control and invalid characters, which separates bytes from the glued
/// prefix.
pub fn base64_hides_secret(run: &str) -> bool {
    (0_usize..4)
        .filter_map(|skip| run.get(skip..))
        .filter_map(decode_lenient)
        .any(|bytes| {
            String::from_utf8_lossy(&bytes)
                .split(|c: char| c.is_control() || c == char::REPLACEMENT_CHARACTER)
                .any(|piece| HIGH_CONFIDENCE.iter().any(|re| re.is_match(piece)))
        })
}

/// The `open` and `close` captures must both exist and be identical
pub fn delimiters_balanced(caps: &Captures) -> bool {
    match (caps.name("open"), caps.name("close")) {
        (Some(open), Some(close)) => open.as_str() == close.as_str(),
        _ => false,
    }
}
