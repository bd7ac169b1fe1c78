//! Client for the external pseudocode analysis service.
//!
//! The editor posts the buffer as `{"pseudocode": "..."}` to
//! `<base>/analyze` and shows whatever JSON object comes back. The response
//! schema belongs to the service, so [`AnalysisReport`] keeps it opaque.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const USER_AGENT: &str = concat!("pseudopad/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("nothing to analyze")]
    EmptyInput,
    #[error("analysis request failed: {0}")]
    Transport(String),
    #[error("analysis service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("analysis response is not valid JSON: {0}")]
    Decode(#[from] std::io::Error),
}

/// The service's response, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub body: Value,
}

impl AnalysisReport {
    /// Top-level keys of an object response, sorted.
    pub fn keys(&self) -> Vec<&str> {
        self.body
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// One-line description for a status message.
    pub fn summary(&self) -> String {
        match &self.body {
            Value::Object(map) if map.is_empty() => "Analysis returned no fields".to_string(),
            Value::Object(_) => format!("Analysis: {}", self.keys().join(", ")),
            other => format!("Analysis: {other}"),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    pseudocode: &'a str,
}

/// Something that can analyze pseudocode.
pub trait AnalysisClient: Send + Sync {
    fn analyze(&self, pseudocode: &str) -> Result<AnalysisReport, AnalysisError>;
}

/// Blocking HTTP client for the analysis endpoint.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpAnalysisClient {
    /// Client for the service rooted at `base_url`.
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            endpoint: endpoint_for(base_url),
            agent,
        }
    }
}

impl AnalysisClient for HttpAnalysisClient {
    fn analyze(&self, pseudocode: &str) -> Result<AnalysisReport, AnalysisError> {
        if pseudocode.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        tracing::debug!(endpoint = %self.endpoint, bytes = pseudocode.len(), "analysis.request");

        match self
            .agent
            .post(&self.endpoint)
            .send_json(AnalyzeRequest { pseudocode })
        {
            Ok(response) => {
                let body: Value = response.into_json()?;
                Ok(AnalysisReport { body })
            }
            Err(ureq::Error::Status(status, response)) => Err(AnalysisError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(err) => Err(AnalysisError::Transport(err.to_string())),
        }
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}/analyze", base_url.trim_end_matches('/'))
}

/// Run `client.analyze(text)` on a background thread and send the result.
pub fn spawn_analysis(
    client: Arc<dyn AnalysisClient>,
    text: String,
    results: Sender<Result<AnalysisReport, AnalysisError>>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = client.analyze(&text);
        if let Err(err) = &result {
            tracing::debug!(error = %err, "analysis.failed");
        }
        let _ = results.send(result);
    })
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    use serde_json::json;

    use super::*;

    /// Serve one HTTP exchange and hand back the request body.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
            }
            let mut request = vec![0; content_length];
            reader.read_exact(&mut request).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            String::from_utf8(request).unwrap()
        });
        (base, handle)
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(endpoint_for("http://localhost:8000"), "http://localhost:8000/analyze");
        assert_eq!(endpoint_for("http://localhost:8000/"), "http://localhost:8000/analyze");
    }

    #[test]
    fn test_blank_input_is_rejected_without_request() {
        let client = HttpAnalysisClient::new("http://127.0.0.1:9");
        assert!(matches!(client.analyze(" \n\t"), Err(AnalysisError::EmptyInput)));
    }

    #[test]
    fn test_analyze_posts_pseudocode_and_parses_response() {
        let (base, server) = serve_once("200 OK", r#"{"complexity":"O(n)","loops":1}"#);
        let client = HttpAnalysisClient::new(&base);

        let report = client.analyze("for i ← 1 to n do\n    x ← i").unwrap();
        assert_eq!(report.body, json!({"complexity": "O(n)", "loops": 1}));

        let request: Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(request, json!({"pseudocode": "for i ← 1 to n do\n    x ← i"}));
    }

    #[test]
    fn test_error_status_carries_body() {
        let (base, server) = serve_once("422 Unprocessable Entity", r#"{"detail":"bad"}"#);
        let client = HttpAnalysisClient::new(&base);

        let err = client.analyze("x ← 1").unwrap_err();
        match err {
            AnalysisError::Status { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("bad"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_non_json_response_is_decode_error() {
        let (base, server) = serve_once("200 OK", "not json");
        let client = HttpAnalysisClient::new(&base);
        assert!(matches!(client.analyze("x"), Err(AnalysisError::Decode(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let client = HttpAnalysisClient::new(&base);
        assert!(matches!(client.analyze("x"), Err(AnalysisError::Transport(_))));
    }

    #[test]
    fn test_spawn_analysis_delivers_result() {
        struct Echo;
        impl AnalysisClient for Echo {
            fn analyze(&self, pseudocode: &str) -> Result<AnalysisReport, AnalysisError> {
                Ok(AnalysisReport {
                    body: json!({ "echo": pseudocode }),
                })
            }
        }

        let (tx, rx) = mpsc::channel();
        spawn_analysis(Arc::new(Echo), "return x".to_string(), tx)
            .join()
            .unwrap();
        let report = rx.recv().unwrap().unwrap();
        assert_eq!(report.keys(), vec!["echo"]);
    }

    #[test]
    fn test_report_summary() {
        let report = AnalysisReport {
            body: json!({"complexity": "O(n^2)", "loops": 2}),
        };
        assert_eq!(report.summary(), "Analysis: complexity, loops");
        let empty = AnalysisReport { body: json!({}) };
        assert_eq!(empty.summary(), "Analysis returned no fields");
        let scalar = AnalysisReport { body: json!(3) };
        assert_eq!(scalar.summary(), "Analysis: 3");
    }
}
