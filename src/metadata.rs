use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::PageMetadata;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

// Quoted attribute values may contain `>`
static META_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<meta\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap());

static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)([a-z:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Reads the page at `url` and extracts what the content script would.
pub fn fetch_metadata(agent: &ureq::Agent, url: &str) -> Result<PageMetadata> {
    let response = agent
        .get(url)
        .call()
        .map_err(|error| anyhow!("Cannot read {}: {}", url, error))?;

    let final_url = response.get_url().to_string();
    let html = response.into_string()?;

    debug!(%url, bytes = html.len(), "Fetched page for metadata");

    Ok(extract_metadata(&html, &final_url))
}

pub fn extract_metadata(html: &str, url: &str) -> PageMetadata {
    PageMetadata {
        title: extract_title(html).unwrap_or_default(),
        description: extract_description(html).unwrap_or_default(),
        url: url.to_string(),
    }
}

fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
}

/// `meta[name=description]` wins over `meta[property=og:description]`.
fn extract_description(html: &str) -> Option<String> {
    let mut og_description = None;

    for tag in META_RE.find_iter(html) {
        let mut key = None;
        let mut content = None;

        for captures in ATTRIBUTE_RE.captures_iter(tag.as_str()) {
            let name = captures[1].to_ascii_lowercase();
            let value = captures
                .get(2)
                .or_else(|| captures.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            match name.as_str() {
                "name" | "property" => key = Some(value.to_ascii_lowercase()),
                "content" => content = Some(value),
                _ => {}
            }
        }

        match (key.as_deref(), content) {
            (Some("description"), Some(content)) => return Some(decode_entities(&content)),
            (Some("og:description"), Some(content)) if og_description.is_none() => {
                og_description = Some(decode_entities(&content))
            }
            _ => {}
        }
    }

    og_description
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
