use std::time::Duration;

use anyhow::Result;
use tracing::warn;
use url::Url;

use crate::{
    api::native_host::BookmarkService,
    config::Config,
    error::SubmitError,
    metadata::fetch_metadata,
    submission::{http_transport::HttpTransport, save_to_any_endpoint},
    types::{BookmarkDraft, PageMetadata, Submission},
};

pub struct BookmarkClient {
    transport: HttpTransport,
    endpoints: Vec<Url>,
    ack_timeout: Duration,
}

impl BookmarkClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(BookmarkClient {
            transport: HttpTransport::new(config.get_request_timeout(), config.get_popup_command()),
            endpoints: config.get_endpoints()?,
            ack_timeout: config.get_ack_timeout(),
        })
    }
}

impl BookmarkService for BookmarkClient {
    fn save(&self, draft: &BookmarkDraft) -> Result<Submission, SubmitError> {
        save_to_any_endpoint(&self.transport, &self.endpoints, draft, self.ack_timeout)
    }

    fn metadata(&self, url: &str, title: Option<&str>) -> PageMetadata {
        match fetch_metadata(self.transport.agent(), url) {
            Ok(mut metadata) => {
                if metadata.title.is_empty() {
                    metadata.title = title.unwrap_or(url).to_string();
                }
                metadata
            }
            Err(error) => {
                warn!(%url, %error, "Error getting metadata, using tab info");
                PageMetadata::fallback(url, title)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread::{self, JoinHandle},
        time::Duration,
    };

    use crate::{api::native_host::BookmarkService, submission::http_transport::HttpTransport};

    use super::BookmarkClient;

    /// Answers one GET with `status` and an HTML `body`.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim_end().is_empty() {
                    break;
                }
            }

            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        });

        (format!("http://{}/page", address), handle)
    }

    fn client() -> BookmarkClient {
        BookmarkClient {
            transport: HttpTransport::new(Duration::from_secs(5), None),
            endpoints: vec![],
            ack_timeout: Duration::from_millis(50),
        }
    }

    #[test]
    fn it_reads_title_and_description_from_page() {
        let (url, server) = serve_once(
            "200 OK",
            r#"<html><head><title>Example Domain</title><meta property="og:description" content="For examples"></head></html>"#,
        );

        let metadata = client().metadata(&url, Some("Tab title"));
        server.join().unwrap();

        assert_eq!(metadata.title, "Example Domain");
        assert_eq!(metadata.description, "For examples");
        assert_eq!(metadata.url, url);
    }

    #[test]
    fn it_uses_tab_title_when_page_has_none() {
        let (url, server) = serve_once(
            "200 OK",
            r#"<html><head><meta name="description" content="No title here"></head></html>"#,
        );

        let metadata = client().metadata(&url, Some("Tab title"));
        server.join().unwrap();

        assert_eq!(metadata.title, "Tab title");
        assert_eq!(metadata.description, "No title here");
    }

    #[test]
    fn it_falls_back_to_tab_info_on_http_error() {
        let (url, server) = serve_once(
            "500 Internal Server Error",
            r#"<html><head><title>Oops</title><meta name="description" content="error page"></head></html>"#,
        );

        let metadata = client().metadata(&url, Some("Tab title"));
        server.join().unwrap();

        assert_eq!(metadata.title, "Tab title");
        assert_eq!(metadata.description, "");
        assert_eq!(metadata.url, url);
    }

    #[test]
    fn it_falls_back_to_url_when_page_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/page", address);
        let metadata = client().metadata(&url, None);

        assert_eq!(metadata.title, url);
        assert_eq!(metadata.description, "");
        assert_eq!(metadata.url, url);
    }
}
