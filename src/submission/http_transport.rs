use std::{
    io::{Error, ErrorKind},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, warn};
use url::Url;

use crate::error::SubmitError;

use super::{Popup, Transport};

/// Openers like `xdg-open` hand the URL to the browser and exit within this.
const OPENER_GRACE: Duration = Duration::from_millis(1500);
const OPENER_POLL: Duration = Duration::from_millis(20);

pub struct HttpTransport {
    agent: ureq::Agent,
    popup_command: Option<String>,
}

impl HttpTransport {
    /// Without a `popup_command` every popup counts as blocked and the direct
    /// request path is used.
    pub fn new(request_timeout: Duration, popup_command: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(request_timeout)
            .user_agent(concat!("bookerics-save/", env!("CARGO_PKG_VERSION")))
            .build();

        HttpTransport {
            agent,
            popup_command,
        }
    }

    pub fn agent(&self) -> &ureq::Agent {
        &self.agent
    }
}

impl Transport for HttpTransport {
    fn open_popup(&self, url: &Url) -> Option<Box<dyn Popup>> {
        let command = self.popup_command.as_ref()?;

        match BrowserPopup::open(command, url) {
            Ok(popup) => Some(Box::new(popup)),
            Err(error) => {
                warn!(%command, %error, "window.open failed");
                None
            }
        }
    }

    fn get(&self, url: &Url) -> Result<(), SubmitError> {
        let response = self.agent.get(url.as_str()).call();

        check_response(url, response)
    }

    fn post_form(&self, url: &Url, fields: &[(&str, &str)]) -> Result<(), SubmitError> {
        let response = self.agent.post(url.as_str()).send_form(fields);

        check_response(url, response)
    }
}

fn check_response(url: &Url, response: Result<ureq::Response, ureq::Error>) -> Result<(), SubmitError> {
    match response {
        Ok(response) => {
            debug!(%url, status = response.status(), "Response received");

            // ureq follows redirects, anything else outside 2xx is a failure
            if (200..300).contains(&response.status()) {
                Ok(())
            } else {
                Err(SubmitError::Http {
                    url: url.to_string(),
                    status: response.status(),
                    status_text: response.status_text().to_string(),
                })
            }
        }
        Err(ureq::Error::Status(status, response)) => Err(SubmitError::Http {
            url: url.to_string(),
            status,
            status_text: response.status_text().to_string(),
        }),
        Err(error) => Err(SubmitError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }),
    }
}

/// The bookmarklet page opened in the user's browser. The page cannot post
/// messages back to this process, so it resolves on the timer.
pub struct BrowserPopup {
    child: Child,
    _sender: Sender<String>,
    receiver: Receiver<String>,
}

impl BrowserPopup {
    /// Fails when the opener is missing or exits unsuccessfully. An opener
    /// still running after the grace period is the browser itself.
    pub fn open(command: &str, url: &Url) -> std::io::Result<BrowserPopup> {
        let mut child = Command::new(command)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let started = Instant::now();
        while started.elapsed() < OPENER_GRACE {
            match child.try_wait()? {
                Some(status) if status.success() => break,
                Some(status) => {
                    return Err(Error::new(
                        ErrorKind::Other,
                        format!("{} exited with {}", command, status),
                    ))
                }
                None => thread::sleep(OPENER_POLL),
            }
        }

        let (sender, receiver) = bounded(1);

        Ok(BrowserPopup {
            child,
            _sender: sender,
            receiver,
        })
    }
}

impl Popup for BrowserPopup {
    fn messages(&self) -> &Receiver<String> {
        &self.receiver
    }

    fn close(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}
