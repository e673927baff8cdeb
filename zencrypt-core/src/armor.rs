//! Armored text blocks: text-safe framing for binary packets.
//!
//! `-----BEGIN ZENCRYPT <LABEL>-----`, base64 payload wrapped at 64 columns,
//! matching END line. Labels bind a block to its purpose so a private key
//! block can never be fed where a message is expected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

pub(crate) const PUBLIC_KEY: &str = "PUBLIC KEY";
pub(crate) const PRIVATE_KEY: &str = "PRIVATE KEY";
pub(crate) const MESSAGE: &str = "MESSAGE";

const LINE_WIDTH: usize = 64;

#[derive(Debug, Error)]
pub(crate) enum ArmorError {
    #[error("not a ZENCRYPT {0} block")]
    WrongLabel(&'static str),

    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}

pub(crate) fn enarmor(label: &str, payload: &[u8]) -> String {
    let body = STANDARD.encode(payload);
    let mut out = format!("-----BEGIN ZENCRYPT {label}-----\n");
    let mut rest = body.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push_str(&format!("-----END ZENCRYPT {label}-----\n"));
    out
}

pub(crate) fn dearmor(label: &'static str, text: &str) -> Result<Vec<u8>, ArmorError> {
    let header = format!("-----BEGIN ZENCRYPT {label}-----");
    let footer = format!("-----END ZENCRYPT {label}-----");

    let body = text
        .trim()
        .strip_prefix(&header)
        .and_then(|rest| rest.trim_end().strip_suffix(&footer))
        .ok_or(ArmorError::WrongLabel(label))?;

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}
