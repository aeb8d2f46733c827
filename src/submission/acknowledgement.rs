use std::time::Duration;

use crossbeam_channel::{after, select, Receiver};
use tracing::{debug, info};

use super::Popup;

pub const ACK_MESSAGE: &str = "bookmark_saving";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    Received,
    TimedOut,
}

/// Owns an open popup for the length of one attempt and closes it however the
/// attempt ends.
pub struct OpenPopup(Box<dyn Popup>);

impl OpenPopup {
    pub fn new(popup: Box<dyn Popup>) -> Self {
        OpenPopup(popup)
    }

    /// Waits for the acknowledgement or the timer, whichever comes first.
    pub fn wait(self, timeout: Duration) -> Acknowledgement {
        let result = wait_for_ack(self.0.messages(), timeout);

        match result {
            Acknowledgement::Received => info!("Bookmark saving message received, closing popup"),
            Acknowledgement::TimedOut => info!("Timeout reached, assuming bookmark was saved"),
        }

        result
    }
}

impl Drop for OpenPopup {
    fn drop(&mut self) {
        self.0.close();
    }
}

pub fn wait_for_ack(messages: &Receiver<String>, timeout: Duration) -> Acknowledgement {
    let deadline = after(timeout);

    loop {
        let resolved = select! {
            recv(messages) -> message => match message {
                Ok(message) if message == ACK_MESSAGE => Some(Acknowledgement::Received),
                Ok(message) => {
                    debug!(%message, "Ignoring message from popup");
                    None
                }
                Err(_) => {
                    // Sender is gone, only the timer can resolve now.
                    let _ = deadline.recv();
                    Some(Acknowledgement::TimedOut)
                }
            },
            recv(deadline) -> _ => Some(Acknowledgement::TimedOut),
        };

        if let Some(resolved) = resolved {
            return resolved;
        }
    }
}
