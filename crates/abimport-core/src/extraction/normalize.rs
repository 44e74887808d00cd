//! Cleanup of wrapping the model puts around its JSON answer.

const FENCE: &str = "```";

/// Remove a code fence wrapped around the whole response.
///
/// Trims whitespace, drops an opening fence with an optional language tag
/// (```` ```json ````) and a closing fence, then trims again. Only the string
/// boundaries are touched; interior text is returned as-is, so the result may
/// still be invalid JSON.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();

    if let Some(rest) = s.strip_prefix(FENCE) {
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        s = &rest[tag_len..];
    }

    if let Some(rest) = s.strip_suffix(FENCE) {
        s = rest;
    }

    s.trim()
}

/// Find the first fenced block inside surrounding prose.
///
/// Handles answers like "Hier ist das Ergebnis: ```json [...] ``` Viel Erfolg".
/// Returns the block's inner text, or `None` without a complete fence pair.
pub fn find_fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find(FENCE)?;
    let after_open = &raw[open + FENCE.len()..];
    let tag_len = after_open
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after_open.len());
    let body = &after_open[tag_len..];
    let close = body.find(FENCE)?;
    Some(body[..close].trim())
}
