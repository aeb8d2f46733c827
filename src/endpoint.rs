use anyhow::{anyhow, Result};
use url::Url;

use crate::types::BookmarkDraft;

const BOOKMARKLET_PATH: &str = "/static/bookmarklet.html";
const ADD_PATH: &str = "/add";

pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let parsed = Url::parse(endpoint)?;

    let is_http = match parsed.scheme() {
        "http" => true,
        "https" => true,
        _ => false,
    };

    if !is_http || parsed.host_str().is_none() {
        return Err(anyhow!(
            "Endpoint \"{}\" is not an http(s) URL with a host",
            endpoint
        ));
    }

    Ok(parsed)
}

/// `{endpoint}?title=&description=&tags=&url=`, empty fields included.
pub fn bookmarklet_url(endpoint: &Url, draft: &BookmarkDraft) -> Url {
    let mut url = endpoint.clone();

    url.set_query(None);
    url.query_pairs_mut().extend_pairs(draft.form_fields());

    url
}

/// Where a direct (popup-less) save gets written after the bookmarklet page loaded.
pub fn write_url(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    url.set_query(None);

    if let Some(prefix) = endpoint.path().strip_suffix(BOOKMARKLET_PATH) {
        let path = format!("{}{}", prefix, ADD_PATH);
        url.set_path(&path);
    }

    url
}
