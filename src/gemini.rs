//! Gemini `generateContent` backend
//!
//! Sends the persona instruction and resume context as the system
//! instruction and the visitor's question as the user turn.

use serde::{Deserialize, Serialize};

use crate::assistant::{AssistantError, CompletionBackend};

/// Hosted model client
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn text_part(text: &str) -> Part {
    Part {
        text: Some(text.to_string()),
    }
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    pub fn request(user_message: &str, context: &str, system_instruction: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![text_part(system_instruction), text_part(context)],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![text_part(user_message)],
            }],
        }
    }
}

impl CompletionBackend for GeminiBackend {
    async fn complete(
        &self,
        user_message: &str,
        context: &str,
        system_instruction: &str,
    ) -> Result<String, AssistantError> {
        let body = Self::request(user_message, context, system_instruction);
        tracing::debug!(model = %self.model, "sending completion request");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Malformed(e.to_string()))?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1beta")
    }

    #[test]
    fn url_includes_model() {
        let backend = GeminiBackend::new(
            "k".to_string(),
            "gemini-2.5-flash".to_string(),
            "https://example.test/v1beta/".to_string(),
        );
        assert_eq!(
            backend.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_puts_context_in_system_instruction() {
        let request = GeminiBackend::request("Hi?", "{\"a\":1}", "Be brief.");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["system_instruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(json["system_instruction"]["parts"][1]["text"], "{\"a\":1}");
        assert!(json["system_instruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hi?");
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"visitor."}]}},
                              {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Hello, visitor.");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn complete_round_trips_over_http() {
        let app = Router::new().route(
            "/v1beta/models/{model}",
            post(|headers: HeaderMap| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                axum::Json(serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": format!("key={key}")}]}}]
                }))
            }),
        );
        let endpoint = spawn(app).await;
        let backend = GeminiBackend::new("secret".to_string(), "m".to_string(), endpoint);

        let reply = backend.complete("q", "{}", "i").await.unwrap();
        assert_eq!(reply, "key=secret");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let app = Router::new().route(
            "/v1beta/models/{model}",
            post(|| async { (StatusCode::FORBIDDEN, "denied") }),
        );
        let endpoint = spawn(app).await;
        let backend = GeminiBackend::new("bad".to_string(), "m".to_string(), endpoint);

        let err = backend.complete("q", "{}", "i").await.unwrap_err();
        match err {
            AssistantError::Status { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "denied");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
