//! URL ingestion: fetch a page, extract its textual content, then treat it
//! like pasted text.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;

use deckgen_schema::ParsedTable;

use crate::error::{IngestError, Result};
use crate::sources::text::ingest_text;

/// Request timeout for page fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch a URL and ingest its extracted text content.
pub fn ingest_url(url: &str) -> Result<ParsedTable> {
    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("deckgen/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(IngestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let html = response.text()?;
    let text = extract_text(&html);
    log::debug!("extracted {} chars of text from {}", text.len(), url);

    ingest_text(&text, url)
}

fn script_style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style|head|noscript)[^>]*>.*?</(script|style|head|noscript)>")
            .expect("static regex")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("static regex"))
}

/// Strip markup down to readable text: drop script/style subtrees, turn
/// block-level tags into line breaks, remove remaining tags, and decode
/// common entities.
pub fn extract_text(html: &str) -> String {
    let cleaned = script_style_re().replace_all(html, " ");

    // Block boundaries become newlines so lines survive tag removal
    let block_re = Regex::new(r"(?i)</?(p|div|br|li|tr|h[1-6]|section|article)[^>]*>")
        .expect("static regex");
    let blocked = block_re.replace_all(&cleaned, "\n");

    let no_tags = tag_re().replace_all(&blocked, " ");

    let decoded = no_tags
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");

    decoded
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_strips_tags() {
        let html = "<html><body><h1>Title</h1><p>First para</p><p>Second</p></body></html>";
        let text = extract_text(html);

        assert_eq!(text, "Title\nFirst para\nSecond");
    }

    #[test]
    fn test_extract_text_drops_scripts() {
        let html = "<p>Keep</p><script>var x = 'drop me';</script><style>p{}</style><p>Also</p>";
        let text = extract_text(html);

        assert!(text.contains("Keep"));
        assert!(text.contains("Also"));
        assert!(!text.contains("drop me"));
    }

    #[test]
    fn test_extract_text_decodes_entities() {
        let text = extract_text("<p>Fish &amp; chips &lt;fresh&gt;</p>");
        assert_eq!(text, "Fish & chips <fresh>");
    }

    #[test]
    #[ignore] // Requires network access
    fn test_ingest_url_live() {
        let result = ingest_url("https://example.com");
        match result {
            Ok(table) => assert!(!table.sheets.is_empty()),
            Err(e) => eprintln!("fetch test skipped (network error): {}", e),
        }
    }
}
