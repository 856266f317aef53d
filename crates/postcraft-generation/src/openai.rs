//! OpenAI-compatible chat-completions client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use postcraft_common::GenerationConfig;
use postcraft_core::traits::{
    Generation, GenerationClient, GenerationOptions, ResponseFormat, TokenUsage,
};
use postcraft_core::DomainError;

const SYSTEM_MESSAGE: &str = "You are a content creation assistant. Follow the instructions \
                              precisely and return valid JSON when requested.";

/// Leads every failure caused by a non-success HTTP status
pub(crate) const BACKEND_STATUS_PREFIX: &str = "backend returned ";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormatParam,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormatParam {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl From<ResponseFormat> for ResponseFormatParam {
    fn from(format: ResponseFormat) -> Self {
        let kind = match format {
            ResponseFormat::Json => "json_object",
            ResponseFormat::Text => "text",
        };
        Self { kind }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

impl ChatResponse {
    /// Missing content reads as empty and missing usage as zero
    fn into_generation(self, requested_model: &str) -> Generation {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        let usage = self
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Generation {
            content,
            usage,
            model: self
                .model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| requested_model.to_string()),
        }
    }
}

/// Client for `{base_url}/chat/completions`
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl OpenAiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::InternalError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_model: config.model.clone(),
        })
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    #[instrument(skip(self, prompt, options), fields(model = tracing::field::Empty, prompt_chars = prompt.len()))]
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, DomainError> {
        let model = options.model.as_deref().unwrap_or(&self.default_model);
        tracing::Span::current().record("model", model);

        let body = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: options.temperature,
            max_tokens: options.max_output_tokens,
            response_format: options.response_format.into(),
        };

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::GenerationFailed(format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(%status, "Generation backend returned an error");
            return Err(DomainError::GenerationFailed(format!(
                "{BACKEND_STATUS_PREFIX}{status}: {body}"
            )));
        }

        let parsed: ChatResponse = res.json().await.map_err(|e| {
            DomainError::GenerationFailed(format!("unreadable backend response: {e}"))
        })?;
        let generation = parsed.into_generation(model);

        tracing::debug!(
            input_tokens = generation.usage.input_tokens,
            output_tokens = generation.usage.output_tokens,
            "Generation completed"
        );

        Ok(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(base_url: String) -> GenerationConfig {
        GenerationConfig {
            api_key: "sk-test".to_string(),
            base_url,
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_output_tokens: 4096,
            timeout_secs: 5,
        }
    }

    /// Serve one canned HTTP response and hand back the raw request
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}/v1"), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let generation = parsed.into_generation("gpt-4o");
        assert_eq!(generation.content, "");
        assert_eq!(generation.usage, TokenUsage::default());
        assert_eq!(generation.model, "gpt-4o");

        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert_eq!(parsed.into_generation("gpt-4o").content, "");
    }

    #[test]
    fn test_blank_model_falls_back_to_requested() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"model": "  ", "choices": []}"#).unwrap();
        assert_eq!(parsed.into_generation("gpt-4o-mini").model, "gpt-4o-mini");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatRequest {
            model: "gpt-4o",
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: "Write a post",
                },
            ],
            temperature: 0.5,
            max_tokens: 100,
            response_format: ResponseFormat::Text.into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][1]["content"], "Write a post");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["response_format"]["type"], "text");
        assert_eq!(json["max_tokens"], 100);
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"model":"gpt-4o-2024-08-06","choices":[{"message":{"role":"assistant","content":"{\"title\":\"Hi\"}"}}],"usage":{"prompt_tokens":12,"completion_tokens":5}}"#,
        )
        .await;
        let client = OpenAiClient::new(&config(base_url)).unwrap();

        let generation = client
            .generate("Give me an idea", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(generation.content, r#"{"title":"Hi"}"#);
        assert_eq!(generation.model, "gpt-4o-2024-08-06");
        assert_eq!(generation.usage.total(), 17);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.contains("json_object"));
        assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let (base_url, server) =
            serve_once("429 Too Many Requests", r#"{"error":"rate limited"}"#).await;
        let client = OpenAiClient::new(&config(base_url)).unwrap();

        let err = client
            .generate("prompt", &GenerationOptions::default())
            .await
            .unwrap_err();

        match err {
            DomainError::GenerationFailed(cause) => {
                assert!(cause.contains("429"));
                assert!(cause.contains("rate limited"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_unreachable_backend() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = OpenAiClient::new(&config(format!("http://{addr}"))).unwrap();
        let err = client
            .generate("prompt", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_generation());
    }
}
