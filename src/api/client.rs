use serde_json::Value;
use tracing::{debug, info, warn};

use super::request::RecommendationRequest;
use crate::error::{RecommendError, FALLBACK_FAILURE};
use crate::models::Song;

/// Anything that can answer a recommendation request. The dispatcher talks to
/// this trait so the UI can be driven without a live server.
pub trait RecommendationSource: Send + Sync {
    fn fetch(&self, request: &RecommendationRequest) -> Result<Vec<Song>, RecommendError>;
}

/// Blocking client for the recommendation API backed by `ureq`.
pub struct HttpClient {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpClient {
    /// No read or write timeout is configured: a slow server keeps the request
    /// pending until it answers or the connection drops.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RecommendationSource for HttpClient {
    fn fetch(&self, request: &RecommendationRequest) -> Result<Vec<Song>, RecommendError> {
        let url = request.url(&self.base_url);
        info!(%url, "requesting recommendations");

        match self.agent.get(&url).set("Accept", "application/json").call() {
            Ok(response) => {
                let body = response.into_string()?;
                let songs: Vec<Song> = serde_json::from_str(&body)?;
                debug!(count = songs.len(), "received recommendations");
                Ok(songs)
            }
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string()?;
                let reason = error_reason(&body)?;
                warn!(code, %reason, "recommendation API returned an error");
                Err(RecommendError::Api(reason))
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(%transport, "recommendation request failed");
                Err(RecommendError::Transport(transport.to_string()))
            }
        }
    }
}

/// Pull the `error` message out of a failure body. A body that is not JSON at
/// all is a decode failure. A missing, null, false, zero or empty `error`
/// yields the fallback reason; any other value is shown as text.
fn error_reason(body: &str) -> Result<String, RecommendError> {
    let value: Value = serde_json::from_str(body)?;
    let reason = match value.get("error") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(number)) if number.as_f64() != Some(0.0) => number.to_string(),
        Some(other @ (Value::Array(_) | Value::Object(_))) => other.to_string(),
        _ => FALLBACK_FAILURE.to_string(),
    };
    Ok(reason)
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;
    use crate::models::Mood;

    /// Serve exactly one canned response and hand back the request line that
    /// was received.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("read header");
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            let mut stream = stream;
            stream
                .write_all(response.as_bytes())
                .expect("write response");
            request_line.trim_end().to_string()
        });

        (base_url, handle)
    }

    #[test]
    fn success_body_decodes_into_songs() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"name":"A","artists":"[\"X\",\"Y\"]","popularity":50}]"#,
        );
        let client = HttpClient::new(base);
        let request = RecommendationRequest::by_song("Imagine").expect("valid title");

        let songs = client.fetch(&request).expect("request should succeed");
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].name, "A");
        assert_eq!(
            server.join().expect("server thread"),
            "GET /recommend?song_title=Imagine HTTP/1.1"
        );
    }

    #[test]
    fn mood_request_hits_mood_endpoint() {
        let (base, server) = serve_once("200 OK", "[]");
        let client = HttpClient::new(base);

        let songs = client
            .fetch(&RecommendationRequest::ByMood(Mood::Happy))
            .expect("request should succeed");
        assert!(songs.is_empty());
        assert_eq!(
            server.join().expect("server thread"),
            "GET /mood?mood=happy HTTP/1.1"
        );
    }

    #[test]
    fn error_status_surfaces_api_message() {
        let (base, server) = serve_once("404 Not Found", r#"{"error":"not found"}"#);
        let client = HttpClient::new(base);
        let request = RecommendationRequest::by_song("nothing").expect("valid title");

        let err = client.fetch(&request).expect_err("404 must fail");
        assert!(matches!(err, RecommendError::Api(_)));
        assert_eq!(err.to_string(), "not found");
        server.join().expect("server thread");
    }

    #[test]
    fn error_status_without_message_uses_fallback() {
        let (base, server) = serve_once("500 Internal Server Error", "{}");
        let client = HttpClient::new(base);

        let err = client
            .fetch(&RecommendationRequest::ByMood(Mood::Chill))
            .expect_err("500 must fail");
        assert_eq!(err.to_string(), FALLBACK_FAILURE);
        server.join().expect("server thread");
    }

    #[test]
    fn non_json_success_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>");
        let client = HttpClient::new(base);

        let err = client
            .fetch(&RecommendationRequest::ByMood(Mood::Sad))
            .expect_err("html is not a song list");
        assert!(matches!(err, RecommendError::Decode(_)));
        server.join().expect("server thread");
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));
        drop(listener);

        let err = HttpClient::new(base)
            .fetch(&RecommendationRequest::ByMood(Mood::Energetic))
            .expect_err("nothing is listening");
        assert!(matches!(err, RecommendError::Transport(_)));
    }

    #[test]
    fn error_reason_shows_non_string_values_as_text() {
        assert_eq!(error_reason(r#"{"error":42}"#).expect("valid json"), "42");
        assert_eq!(error_reason(r#"{"error":true}"#).expect("valid json"), "true");
        assert_eq!(
            error_reason(r#"{"error":{"code":7}}"#).expect("valid json"),
            r#"{"code":7}"#
        );
    }

    #[test]
    fn error_reason_falls_back_on_empty_values() {
        for body in [
            r#"{"error":""}"#,
            r#"{"error":0}"#,
            r#"{"error":false}"#,
            r#"{"error":null}"#,
            r#"{"message":"x"}"#,
            "[]",
        ] {
            assert_eq!(error_reason(body).expect("valid json"), FALLBACK_FAILURE);
        }
        assert!(error_reason("not json").is_err());
    }
}
