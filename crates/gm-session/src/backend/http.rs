//! A backend speaking the OpenAI-compatible chat completions protocol.
//!
//! Works with local servers such as LM Studio, llama.cpp's server, or
//! `ollama serve`. The whole prompt is sent as a single user message.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::Backend;
use crate::error::{BackendError, BackendResult};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Posts prompts to a chat completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    timeout: Duration,
    label: String,
}

impl HttpBackend {
    /// Create a backend for the server at `base_url`.
    pub fn new(
        base_url: &str,
        model: &str,
        temperature: f32,
        timeout: Duration,
    ) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint(base_url);
        let label = format!("{endpoint} ({model})");
        Ok(Self {
            client,
            endpoint,
            model: model.to_string(),
            temperature,
            timeout,
            label,
        })
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        }
    }

    fn classify(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Http(err)
        }
    }
}

impl Backend for HttpBackend {
    fn name(&self) -> &str {
        &self.label
    }

    fn complete(&mut self, prompt: &str) -> BackendResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request(prompt))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.classify(e))?
            .json::<ChatCompletionResponse>()
            .map_err(|e| self.classify(e))?;

        first_choice(response)
    }
}

fn endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}{COMPLETIONS_PATH}")
    }
}

fn first_choice(response: ChatCompletionResponse) -> BackendResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or(BackendError::EmptyChoices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        HttpBackend::new(
            "http://localhost:1234",
            "local-model",
            0.7,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_is_appended_once() {
        assert_eq!(
            endpoint("http://localhost:1234"),
            "http://localhost:1234/v1/chat/completions"
        );
        assert_eq!(
            endpoint("http://localhost:1234/"),
            "http://localhost:1234/v1/chat/completions"
        );
        assert_eq!(
            endpoint("http://host/v1/chat/completions"),
            "http://host/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_shape() {
        let backend = backend();
        let body = serde_json::to_value(backend.request("PROMPT")).unwrap();
        assert_eq!(body["model"], "local-model");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "PROMPT");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn first_choice_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"narration\":\"hi\"}"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_choice(response).unwrap(), "{\"narration\":\"hi\"}");
    }

    #[test]
    fn no_choices_is_an_error() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            first_choice(response),
            Err(BackendError::EmptyChoices)
        ));
    }

    #[test]
    fn unreachable_server_is_an_error() {
        // Port 9 (discard) is closed on test machines.
        let mut backend = HttpBackend::new(
            "http://127.0.0.1:9",
            "local-model",
            0.7,
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(backend.complete("hello").is_err());
    }
}
