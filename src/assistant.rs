//! Portfolio assistant
//!
//! Answers visitor questions about the resume through a hosted language
//! model. The assistant never surfaces an error to the visitor: every failure
//! becomes a fixed in-persona reply.

use std::future::Future;

use thiserror::Error;

use crate::resume::{ResumeData, ResumeError};

/// Reply when no API key is configured
pub const MISSING_KEY_REPLY: &str =
    "Configuration Error: API Key is missing. Please set GEMINI_API_KEY in the environment.";

/// Reply when the backend call fails
pub const CONNECTION_LOST_REPLY: &str = "Connection interrupted. Re-establishing link...";

/// Reply when the backend answers with no text
pub const EMPTY_REPLY: &str = "I processed the data but received no verbal output.";

/// First message of every chat session
pub const GREETING: &str =
    "Greetings. I can provide details on my projects, engineering background, or technical skillset.";

/// Errors a completion backend can report
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The request could not be sent or the body not read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// A hosted text-completion service
pub trait CompletionBackend: Send + Sync {
    /// Complete `user_message` given the serialized resume and the persona
    /// instruction
    fn complete(
        &self,
        user_message: &str,
        context: &str,
        system_instruction: &str,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;
}

/// Build the persona instruction for a resume
pub fn system_instruction(resume: &ResumeData) -> String {
    let name = &resume.personal.name;
    let mut instruction = format!(
        "You are the assistant interface of {name}'s portfolio website.\n\
         Your persona is professional, concise and slightly robotic, but helpful.\n\
         \n\
         Answer the visitor's question using only the resume data supplied as context.\n\
         If the question is about something not in the data, politely explain that you only have access to {name}'s professional portfolio data.\n\
         Keep answers under 100 words unless the visitor asks for details."
    );

    if !resume.personal.interests.is_empty() {
        instruction.push_str(&format!(
            "\nIf asked about hobbies or interests, mention: {}.",
            resume.personal.interests.join(", ")
        ));
    }

    instruction
}

/// Resume-grounded assistant over an optional backend.
///
/// A missing backend means no credentials were configured.
pub struct Assistant<B> {
    backend: Option<B>,
    context: String,
    instruction: String,
}

impl<B: CompletionBackend> Assistant<B> {
    pub fn new(resume: &ResumeData, backend: Option<B>) -> Result<Self, ResumeError> {
        Ok(Self {
            backend,
            context: resume.to_context_json()?,
            instruction: system_instruction(resume),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn system_instruction(&self) -> &str {
        &self.instruction
    }

    /// Answer a question. Always resolves to displayable text.
    pub async fn respond(&self, query: &str) -> String {
        let Some(backend) = &self.backend else {
            return MISSING_KEY_REPLY.to_string();
        };

        match backend.complete(query, &self.context, &self.instruction).await {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(%err, "assistant backend failed");
                CONNECTION_LOST_REPLY.to_string()
            }
        }
    }
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// Transcript plus loading state of one conversation
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
    loading: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: vec![Message {
                sender: Sender::Assistant,
                text: GREETING.to_string(),
            }],
            loading: false,
        }
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record the user's message and enter the loading state.
    ///
    /// Returns the query to send, or `None` if the input is blank or a reply
    /// is still pending.
    pub fn begin(&mut self, input: &str) -> Option<String> {
        if input.trim().is_empty() || self.loading {
            return None;
        }
        self.messages.push(Message {
            sender: Sender::User,
            text: input.to_string(),
        });
        self.loading = true;
        Some(input.to_string())
    }

    /// Append the reply and leave the loading state
    pub fn finish(&mut self, reply: String) -> &Message {
        self.loading = false;
        self.messages.push(Message {
            sender: Sender::Assistant,
            text: reply,
        });
        &self.messages[self.messages.len() - 1]
    }

    /// Send one message and wait for the reply
    pub async fn send<B: CompletionBackend>(
        &mut self,
        assistant: &Assistant<B>,
        input: &str,
    ) -> Option<&Message> {
        let query = self.begin(input)?;
        let reply = assistant.respond(&query).await;
        Some(self.finish(reply))
    }
}
