//! RADx Data Hub study-explorer links for vocabulary terms.

const EXPLORER_BASE: &str = "https://radxdatahub.nih.gov/studyExplorer?&facets=";

/// Build the study-explorer URL that filters by `value` within `facet`.
///
/// Both parts are HTML-escaped before being spliced into the
/// percent-encoded facet JSON.
#[must_use]
pub fn search_url(facet: &str, value: &str) -> String {
    format!(
        "{EXPLORER_BASE}%5B%7B%22name%22:%22{}%22,%22facets%22:%5B%22{}%22%5D%7D%5D",
        escape_html(facet),
        escape_html(value)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
