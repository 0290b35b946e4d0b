//! Transport to the session server.

use crate::protocol::{MoveRequest, SessionSnapshot, SnapshotError};
use derive_more::{Display, Error, From};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Failure talking to the session server.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum TransportError {
    /// The request never produced a response (connect error, timeout).
    #[display("HTTP request failed: {}", message)]
    #[from(skip)]
    Request {
        /// Underlying error text.
        message: String,
    },
    /// Server answered with a non-success status.
    #[display("Server rejected request with status {}", status)]
    #[from(skip)]
    Rejected {
        /// HTTP status code.
        status: u16,
    },
    /// Success status but the body is not a valid session snapshot.
    #[display("Malformed session payload: {}", _0)]
    Snapshot(SnapshotError),
    /// Request body could not be encoded.
    #[display("Failed to encode request: {}", message)]
    #[from(skip)]
    Encode {
        /// Encoder message.
        message: String,
    },
    /// New-game endpoint did not redirect to a session.
    #[from(skip)]
    #[display("New game response carried no session redirect")]
    MissingRedirect,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Request {
            message: err.to_string(),
        }
    }
}

/// Remote authority owning game sessions.
#[async_trait::async_trait]
pub trait SessionTransport: Send {
    /// Fetches the current state of a session.
    async fn fetch(&mut self, session_id: &str) -> Result<SessionSnapshot, TransportError>;

    /// Submits a move and returns the resulting state.
    async fn submit(
        &mut self,
        session_id: &str,
        request: &MoveRequest,
    ) -> Result<SessionSnapshot, TransportError>;
}

/// HTTP client for the `/session-data/{id}` endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL including any application-root prefix, without trailing slash.
    base_url: String,
    /// HTTP client (redirects disabled).
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with a per-request timeout.
    #[instrument(skip_all)]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        info!(
            base_url = %base_url,
            timeout_ms = timeout.as_millis() as u64,
            "HTTP transport ready"
        );
        Ok(Self { base_url, client })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn session_url(&self, session_id: &str) -> String {
        format!("{}/session-data/{}", self.base_url, session_id)
    }

    /// Asks the server to open a new session and returns its id.
    ///
    /// The server answers with a redirect to `/session/<id>`.
    #[instrument(skip(self))]
    pub async fn start_new_game(&self) -> Result<String, TransportError> {
        let url = format!("{}/start-new-game", self.base_url);
        info!(url = %url, "Requesting new game session");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_redirection() && !status.is_success() {
            warn!(status = %status, "New game request rejected");
            return Err(TransportError::Rejected {
                status: status.as_u16(),
            });
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                error!(status = %status, "Missing Location header in new game response");
                TransportError::MissingRedirect
            })?;

        let session_id = session_id_from_location(location).ok_or_else(|| {
            error!(location = %location, "Redirect does not name a session");
            TransportError::MissingRedirect
        })?;

        info!(session_id = %session_id, "New game session created");
        Ok(session_id)
    }

    async fn read_snapshot(response: reqwest::Response) -> Result<SessionSnapshot, TransportError> {
        let status = response.status();
        debug!(status = %status, "Received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Server rejected request");
            return Err(TransportError::Rejected {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        debug!(response = %text, "Response body");
        Ok(SessionSnapshot::parse(&text)?)
    }
}

/// Extracts `<id>` from a `/session/<id>` location, absolute or relative.
pub fn session_id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next()?;
    let mut segments = path.trim_end_matches('/').rsplit('/');
    let id = segments.next()?;
    match segments.next() {
        Some("session") if !id.is_empty() => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait::async_trait]
impl SessionTransport for HttpTransport {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&mut self, session_id: &str) -> Result<SessionSnapshot, TransportError> {
        debug!("Fetching session state");
        let response = self.client.get(self.session_url(session_id)).send().await?;
        Self::read_snapshot(response).await
    }

    #[instrument(
        skip(self, request),
        fields(
            base_url = %self.base_url,
            row = request.args.row,
            column = request.args.column
        )
    )]
    async fn submit(
        &mut self,
        session_id: &str,
        request: &MoveRequest,
    ) -> Result<SessionSnapshot, TransportError> {
        let fields = request.form_fields().map_err(|e| TransportError::Encode {
            message: e.to_string(),
        })?;
        info!(mark = %request.args.mark, "Posting move");

        let response = self
            .client
            .post(self.session_url(session_id))
            .form(&fields)
            .send()
            .await?;
        Self::read_snapshot(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_from_location() {
        assert_eq!(session_id_from_location("/session/12345"), Some("12345".to_string()));
        assert_eq!(
            session_id_from_location("http://host/ttt/session/54321?x=1"),
            Some("54321".to_string())
        );
        assert_eq!(session_id_from_location("/home"), None);
        assert_eq!(session_id_from_location("/session/"), None);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let transport =
            HttpTransport::new("http://localhost:5000/ttt/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000/ttt");
        assert_eq!(transport.session_url("7"), "http://localhost:5000/ttt/session-data/7");
    }
}
