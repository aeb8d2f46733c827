use serde::{Deserialize, Serialize};

use crate::types::{BookmarkDraft, PageMetadata};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save bookmark. Server may be down or unreachable.";
pub const SAVE_SUCCEEDED_MESSAGE: &str = "Bookmark saved successfully!";

/// Messages sent by the extension popup or content script.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionRequest {
    SaveBookmark {
        data: BookmarkDraft,
    },
    GetMetadata {
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn saved() -> Self {
        SaveResponse {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        SaveResponse {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtensionResponse {
    Save(SaveResponse),
    Metadata(PageMetadata),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::types::{BookmarkDraft, PageMetadata};

    use super::{ExtensionRequest, ExtensionResponse, SaveResponse};

    #[test]
    fn it_parses_save_bookmark_message() {
        let message = json!({
            "action": "saveBookmark",
            "data": {
                "title": "Example",
                "description": "",
                "tags": "rust web",
                "url": "https://example.com"
            }
        });

        let request: ExtensionRequest = serde_json::from_value(message).unwrap();

        assert_eq!(
            request,
            ExtensionRequest::SaveBookmark {
                data: BookmarkDraft {
                    title: "Example".to_string(),
                    description: "".to_string(),
                    url: "https://example.com".to_string(),
                    tags: "rust web".to_string(),
                }
            }
        );
    }

    #[test]
    fn it_defaults_missing_tags_and_description() {
        let message = json!({
            "action": "saveBookmark",
            "data": { "title": "Example", "url": "https://example.com" }
        });

        let request: ExtensionRequest = serde_json::from_value(message).unwrap();

        match request {
            ExtensionRequest::SaveBookmark { data } => {
                assert_eq!(data.tags, "");
                assert_eq!(data.description, "");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn it_parses_get_metadata_message() {
        let message = json!({ "action": "getMetadata", "url": "https://example.com" });

        let request: ExtensionRequest = serde_json::from_value(message).unwrap();

        assert_eq!(
            request,
            ExtensionRequest::GetMetadata {
                url: "https://example.com".to_string(),
                title: None,
            }
        );
    }

    #[test]
    fn it_omits_error_on_success() {
        let saved = serde_json::to_value(ExtensionResponse::Save(SaveResponse::saved())).unwrap();
        let failed = serde_json::to_value(ExtensionResponse::Save(SaveResponse::failed("nope"))).unwrap();

        assert_eq!(saved, json!({ "success": true }));
        assert_eq!(failed, json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn it_serializes_metadata_flat() {
        let response = ExtensionResponse::Metadata(PageMetadata {
            title: "T".to_string(),
            description: "D".to_string(),
            url: "https://example.com".to_string(),
        });

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "title": "T", "description": "D", "url": "https://example.com" })
        );
    }
}
