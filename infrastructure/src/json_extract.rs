//! Best-effort recovery of a JSON object embedded in free-form model output.
//!
//! Model replies are not guaranteed to be pure JSON: they may wrap the object in
//! markdown fences or prose. The scanner only locates a candidate region; schema
//! checks happen afterwards when the region is decoded.

use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use shared::types::Result;

/// First top-level balanced `{...}` region of `raw`.
///
/// Braces inside JSON string literals are ignored and a stray `}` before any
/// `{` is skipped. A `{` that never closes is treated as prose and the scan
/// resumes at the next `{`. Returns `None` when no region closes.
pub fn extract_first_object(raw: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(offset) = raw[from..].find('{') {
        let start = from + offset;
        if let Some(end) = balanced_end(&raw.as_bytes()[start..]) {
            return Some(&raw[start..=start + end]);
        }
        from = start + 1;
    }
    None
}

/// Index of the `}` closing the object that opens at `bytes[0]`.
fn balanced_end(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if b == b'\\' {
                escape_next = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate the first embedded object and decode it as `T`.
pub fn parse_embedded<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let json = extract_first_object(raw).ok_or_else(|| anyhow!("no JSON object found in model reply"))?;
    serde_json::from_str(json).context("embedded JSON object does not match the expected shape")
}
