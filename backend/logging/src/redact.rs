//! Log Redaction Layer
//!
//! Scrubs Discord bot tokens and authorization headers from strings prior
//! to logging. Message content is user input and may contain pasted secrets.

use regex::Regex;
use std::sync::LazyLock;

static DISCORD_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_\-]{23,28}\.[A-Za-z0-9_\-]{6,7}\.[A-Za-z0-9_\-]{27,}").unwrap()
});
static AUTH_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:Bot|Bearer)\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = AUTH_HEADER_RE.replace_all(input, "[REDACTED_AUTH]");
    DISCORD_TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}
