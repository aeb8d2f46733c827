use std::io::{ErrorKind, Read, Write};

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    error::SubmitError,
    types::{BookmarkDraft, PageMetadata, Submission},
};

use super::message::{ExtensionRequest, ExtensionResponse, SaveResponse, SAVE_FAILED_MESSAGE};

/// Browsers refuse host messages larger than this.
const MAX_OUTGOING_MESSAGE: usize = 1024 * 1024;
/// Extension requests are small, a larger prefix means a corrupt stream.
const MAX_INCOMING_MESSAGE: usize = 8 * 1024 * 1024;

pub trait BookmarkService {
    fn save(&self, draft: &BookmarkDraft) -> Result<Submission, SubmitError>;
    /// Never fails: falls back to tab level information.
    fn metadata(&self, url: &str, title: Option<&str>) -> PageMetadata;
}

/// Serves length-prefixed JSON messages until the browser closes stdin.
pub fn run<R: Read, W: Write, S: BookmarkService>(
    reader: &mut R,
    writer: &mut W,
    service: &S,
) -> Result<()> {
    while let Some(message) = read_message(reader)? {
        let response = limit_response(handle_message(&message, service));
        write_message(writer, &response)?;
    }

    info!("Browser closed the connection");

    Ok(())
}

pub fn handle_message<S: BookmarkService>(message: &[u8], service: &S) -> ExtensionResponse {
    let value: serde_json::Value = match serde_json::from_slice(message) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Malformed message");
            return ExtensionResponse::Save(SaveResponse::failed(&format!("Invalid message: {}", e)));
        }
    };

    let is_known = matches!(
        value.get("action").and_then(|action| action.as_str()),
        Some("saveBookmark") | Some("getMetadata")
    );

    if !is_known {
        warn!(message = %value, "Unknown action");
        return ExtensionResponse::Save(SaveResponse::failed("Unknown action"));
    }

    let request: ExtensionRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid message");
            return ExtensionResponse::Save(SaveResponse::failed(&format!("Invalid message: {}", e)));
        }
    };

    handle_request(request, service)
}

/// Replaces a response the browser would refuse with a failure the popup can show.
fn limit_response(response: ExtensionResponse) -> ExtensionResponse {
    match serde_json::to_vec(&response) {
        Ok(bytes) if bytes.len() <= MAX_OUTGOING_MESSAGE => response,
        Ok(bytes) => {
            warn!(bytes = bytes.len(), "Response too large for native messaging");
            ExtensionResponse::Save(SaveResponse::failed("Response too large"))
        }
        Err(e) => {
            error!(error = %e, "Cannot serialize response");
            ExtensionResponse::Save(SaveResponse::failed("Invalid response"))
        }
    }
}

pub fn handle_request<S: BookmarkService>(request: ExtensionRequest, service: &S) -> ExtensionResponse {
    match request {
        ExtensionRequest::SaveBookmark { data } => {
            info!(url = %data.url, "Received saveBookmark message");

            match service.save(&data) {
                Ok(_) => {
                    info!("Bookmark saved successfully");
                    ExtensionResponse::Save(SaveResponse::saved())
                }
                Err(e) => {
                    error!(error = %e, "All requests failed");
                    ExtensionResponse::Save(SaveResponse::failed(SAVE_FAILED_MESSAGE))
                }
            }
        }
        ExtensionRequest::GetMetadata { url, title } => {
            ExtensionResponse::Metadata(service.metadata(&url, title.as_deref()))
        }
    }
}

pub fn read_message<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut length = [0u8; 4];

    match reader.read_exact(&mut length) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let length = u32::from_ne_bytes(length) as usize;

    if length > MAX_INCOMING_MESSAGE {
        return Err(anyhow!(
            "Incoming message of {} bytes exceeds the {} byte limit",
            length,
            MAX_INCOMING_MESSAGE
        ));
    }

    let mut message = vec![0; length];
    reader.read_exact(&mut message)?;

    Ok(Some(message))
}

pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<()> {
    let bytes = serde_json::to_vec(message)?;

    if bytes.len() > MAX_OUTGOING_MESSAGE {
        return Err(anyhow!(
            "Response of {} bytes exceeds the native messaging limit",
            bytes.len()
        ));
    }

    writer.write_all(&(bytes.len() as u32).to_ne_bytes())?;
    writer.write_all(&bytes)?;
    writer.flush()?;

    Ok(())
}
