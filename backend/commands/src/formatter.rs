//! Quote rendering for chat replies.

/// Sources containing this marker turn `http…` quotes into bare media links.
pub const GIF_SOURCE_MARKER: &str = "gif";

/// Render a `(quote, source)` pair as a quoted block.
///
/// A link quoted from a gif source is passed through untouched so the
/// platform embeds it.
pub fn format_quote(quote: &str, source: &str) -> String {
    if quote.is_empty() && source.is_empty() {
        return String::new();
    }
    if quote.starts_with("http") && source.to_lowercase().contains(GIF_SOURCE_MARKER) {
        return quote.to_string();
    }
    format!("> {quote} \n > - {source}")
}
