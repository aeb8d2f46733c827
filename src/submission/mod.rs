use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{info, warn};
use url::Url;

use crate::{
    endpoint::{bookmarklet_url, write_url},
    error::SubmitError,
    types::{AttemptOutcome, BookmarkDraft, Method, Submission, SubmissionAttempt},
};

use self::acknowledgement::{Acknowledgement, OpenPopup};

pub mod acknowledgement;
pub mod http_transport;

pub trait Popup {
    /// Messages posted back by the page loaded in the popup.
    fn messages(&self) -> &Receiver<String>;
    fn close(&mut self);
}

pub trait Transport {
    /// `None` means the popup could not be opened.
    fn open_popup(&self, url: &Url) -> Option<Box<dyn Popup>>;
    fn get(&self, url: &Url) -> Result<(), SubmitError>;
    fn post_form(&self, url: &Url, fields: &[(&str, &str)]) -> Result<(), SubmitError>;
}

/// Tries every endpoint in order, GET first and POST as fallback, and stops at
/// the first success. Fails with the last error seen.
pub fn save_to_any_endpoint<T: Transport + ?Sized>(
    transport: &T,
    endpoints: &[Url],
    draft: &BookmarkDraft,
    ack_timeout: Duration,
) -> Result<Submission, SubmitError> {
    let mut attempts: Vec<SubmissionAttempt> = vec![];
    let mut last_error: Option<SubmitError> = None;

    for endpoint in endpoints {
        info!(%endpoint, "Trying GET request");

        match make_get_request(transport, endpoint, draft, ack_timeout) {
            Ok(outcome) => {
                info!(%endpoint, "GET request succeeded");
                attempts.push(SubmissionAttempt {
                    endpoint: endpoint.clone(),
                    method: Method::Get,
                    outcome,
                });

                return Ok(Submission {
                    endpoint: endpoint.clone(),
                    method: Method::Get,
                    attempts,
                });
            }
            Err(error) => {
                warn!(%endpoint, %error, "GET request failed");
                attempts.push(SubmissionAttempt {
                    endpoint: endpoint.clone(),
                    method: Method::Get,
                    outcome: error.outcome(),
                });
            }
        }

        info!(%endpoint, "Trying POST request");

        match transport.post_form(endpoint, &draft.form_fields()) {
            Ok(()) => {
                info!(%endpoint, "POST request succeeded");
                attempts.push(SubmissionAttempt {
                    endpoint: endpoint.clone(),
                    method: Method::Post,
                    outcome: AttemptOutcome::Success,
                });

                return Ok(Submission {
                    endpoint: endpoint.clone(),
                    method: Method::Post,
                    attempts,
                });
            }
            Err(error) => {
                warn!(%endpoint, %error, "POST request failed");
                attempts.push(SubmissionAttempt {
                    endpoint: endpoint.clone(),
                    method: Method::Post,
                    outcome: error.outcome(),
                });
                last_error = Some(error);
            }
        }
    }

    warn!(attempts = attempts.len(), "All requests failed");

    Err(last_error.unwrap_or(SubmitError::NoEndpoints))
}

fn make_get_request<T: Transport + ?Sized>(
    transport: &T,
    endpoint: &Url,
    draft: &BookmarkDraft,
    ack_timeout: Duration,
) -> Result<AttemptOutcome, SubmitError> {
    let url = bookmarklet_url(endpoint, draft);

    if let Some(popup) = transport.open_popup(&url) {
        let outcome = match OpenPopup::new(popup).wait(ack_timeout) {
            Acknowledgement::Received => AttemptOutcome::Success,
            Acknowledgement::TimedOut => AttemptOutcome::Timeout,
        };

        return Ok(outcome);
    }

    info!("Popup could not be opened, falling back to direct requests");

    transport.get(&url)?;

    let add_url = write_url(endpoint);
    info!(%add_url, "Directly submitting");
    transport.post_form(&add_url, &draft.form_fields())?;

    Ok(AttemptOutcome::Success)
}
