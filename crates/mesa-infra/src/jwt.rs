//! Unverified JWT payload inspection.
//!
//! The client never validates signatures; it only reads the subject to show
//! who is signed in.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Return the `sub` claim of `token`, or `None` if the token is malformed.
pub fn subject(token: &str) -> Option<String> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims
        .get("sub")
        .and_then(|sub| sub.as_str())
        .filter(|sub| !sub.is_empty())
        .map(str::to_string)
}
