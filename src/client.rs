use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Endpoint used when neither the CLI, the environment nor the config file names one.
pub const DEFAULT_ENDPOINT: &str = "https://website-chatbot-sy3i.onrender.com/chat";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// A well-formed answer from the chat service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// `response` text, shown verbatim
    Answer(String),
    /// `error` text reported inside a successful response
    Rejected(String),
}

/// Anything that kept us from getting a usable JSON body.
///
/// The `Display` output is what the user sees after `Connection error: `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Decode(String),
}

/// Delivers one user message and waits for the reply
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatReply, TransportError>;
}

#[derive(Clone, Debug)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl ChatTransport for ChatClient {
    async fn send(&self, message: &str) -> Result<ChatReply, TransportError> {
        let request = ChatRequest { message };

        // `.json()` sets Content-Type: application/json
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), endpoint = %self.endpoint, "chat response status");

        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        parse_reply(&body)
    }
}

/// Interpret a 2xx body. A truthy `error` wins over `response`.
pub fn parse_reply(body: &str) -> Result<ChatReply, TransportError> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;

    if let Some(error) = data.get("error").filter(|v| is_truthy(v)) {
        return Ok(ChatReply::Rejected(display_value(error)));
    }

    let text = data
        .get("response")
        .map(display_value)
        .unwrap_or_default();
    Ok(ChatReply::Answer(text))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response and hand back the raw request.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut request = Vec::new();
            // Read until the JSON body has arrived
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if n == 0 || text.trim_end().ends_with('}') {
                    break;
                }
            }
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{}/chat", addr), handle)
    }

    #[test]
    fn test_parse_reply_prefers_truthy_error() {
        assert_eq!(
            parse_reply(r#"{"response": "hi"}"#).unwrap(),
            ChatReply::Answer("hi".to_string())
        );
        assert_eq!(
            parse_reply(r#"{"error": "bad request", "response": "hi"}"#).unwrap(),
            ChatReply::Rejected("bad request".to_string())
        );
        assert_eq!(
            parse_reply(r#"{"error": "", "response": "hi"}"#).unwrap(),
            ChatReply::Answer("hi".to_string())
        );
        assert_eq!(
            parse_reply(r#"{"error": null}"#).unwrap(),
            ChatReply::Answer(String::new())
        );
    }

    #[test]
    fn test_parse_reply_rejects_invalid_json() {
        let err = parse_reply("<html>oops</html>").unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(
            TransportError::Status(502).to_string(),
            "HTTP error! status: 502"
        );
    }

    #[tokio::test]
    async fn test_client_posts_json_message() {
        let (url, server) = one_shot_server("200 OK", r#"{"response":"hello there"}"#).await;
        let client = ChatClient::new(&url);

        let reply = client.send("hi bot").await.unwrap();
        assert_eq!(reply, ChatReply::Answer("hello there".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /chat"));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#"{"message":"hi bot"}"#));
    }

    #[tokio::test]
    async fn test_client_non_success_status_is_transport_failure() {
        let (url, _server) =
            one_shot_server("500 Internal Server Error", r#"{"response":"ignored"}"#).await;
        let client = ChatClient::new(&url);

        let err = client.send("hi").await.unwrap_err();
        assert_eq!(err, TransportError::Status(500));
    }

    #[tokio::test]
    async fn test_client_unreachable_endpoint_is_network_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ChatClient::new(&format!("http://{}/chat", addr));
        let err = client.send("hi").await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
