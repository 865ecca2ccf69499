//! Process-wide conversation transcript shared by every request.

use tokio::sync::{Mutex, MutexGuard};

use crate::llm::ChatMessage;

pub const TUTOR_PERSONA: &str = "\
You are an AI tutor guiding a student.
Your goal is to:
1. Answer the user's question clearly and concisely.
2. Follow up with an engaging, open-ended question to encourage deeper thinking.
3. Remember previous responses and relate your responses with that.";

/// Append-only message history. Never truncated or deduplicated.
pub struct Conversation {
    messages: Mutex<Vec<ChatMessage>>,
}

impl Conversation {
    pub fn new(system_prompt: &str) -> Self {
        Self {
            messages: Mutex::new(vec![ChatMessage::system(system_prompt)]),
        }
    }

    pub fn tutor() -> Self {
        Self::new(TUTOR_PERSONA)
    }

    pub async fn append(&self, message: ChatMessage) {
        self.messages.lock().await.push(message);
    }

    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Lock the transcript for one append / complete / append cycle.
    ///
    /// Concurrent turns queue here, so a user message is always followed by
    /// its own reply (or by nothing, if the completion failed).
    pub async fn begin_turn(&self) -> ConversationTurn<'_> {
        ConversationTurn {
            messages: self.messages.lock().await,
        }
    }
}

pub struct ConversationTurn<'a> {
    messages: MutexGuard<'a, Vec<ChatMessage>>,
}

impl ConversationTurn<'_> {
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }
}
