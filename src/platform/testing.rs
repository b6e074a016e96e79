//! Mock implementations for testing
//!
//! These mocks enable navigation tests without a real messaging platform.

use super::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// An edit or send observed by the mock
#[derive(Debug, Clone)]
pub struct RecordedEdit {
    pub message: MessageRef,
    pub text: String,
    pub markup: Markup,
}

/// Mock messenger that records every call and replays queued failures
#[allow(dead_code)]
pub struct MockMessenger {
    edit_errors: Mutex<VecDeque<PlatformError>>,
    respond_errors: Mutex<VecDeque<PlatformError>>,
    next_message_id: AtomicI64,
    pub edits: Mutex<Vec<RecordedEdit>>,
    pub sends: Mutex<Vec<RecordedEdit>>,
    /// Ids of acknowledged callbacks
    pub responses: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockMessenger {
    pub fn new() -> Self {
        Self {
            edit_errors: Mutex::new(VecDeque::new()),
            respond_errors: Mutex::new(VecDeque::new()),
            next_message_id: AtomicI64::new(100),
            edits: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
            responses: Mutex::new(Vec::new()),
        }
    }

    /// Make the next edit fail
    pub fn queue_edit_error(&self, error: PlatformError) {
        self.edit_errors.lock().unwrap().push_back(error);
    }

    /// Make the next acknowledgement fail
    pub fn queue_respond_error(&self, error: PlatformError) {
        self.respond_errors.lock().unwrap().push_back(error);
    }

    pub fn recorded_edits(&self) -> Vec<RecordedEdit> {
        self.edits.lock().unwrap().clone()
    }

    pub fn recorded_sends(&self) -> Vec<RecordedEdit> {
        self.sends.lock().unwrap().clone()
    }

    pub fn recorded_responses(&self) -> Vec<String> {
        self.responses.lock().unwrap().clone()
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        let message = MessageRef {
            chat,
            message_id: self.next_message_id.fetch_add(1, Ordering::Relaxed),
            text: text.to_string(),
        };
        self.sends.lock().unwrap().push(RecordedEdit {
            message: message.clone(),
            text: text.to_string(),
            markup: markup.clone(),
        });
        Ok(message)
    }

    async fn edit(
        &self,
        message: &MessageRef,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        self.edits.lock().unwrap().push(RecordedEdit {
            message: message.clone(),
            text: text.to_string(),
            markup: markup.clone(),
        });
        if let Some(error) = self.edit_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(MessageRef {
            chat: message.chat,
            message_id: message.message_id,
            text: text.to_string(),
        })
    }

    async fn respond(&self, callback: &Callback) -> Result<(), PlatformError> {
        if let Some(error) = self.respond_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.responses.lock().unwrap().push(callback.id.clone());
        Ok(())
    }
}

/// Translator that echoes `locale:path`, so tests can see which key was used
pub struct EchoTranslator;

impl Translator for EchoTranslator {
    fn translate(&self, locale: &str, path: &str) -> String {
        format!("{locale}:{path}")
    }
}

/// A message handle for tests
pub fn message(text: &str) -> MessageRef {
    MessageRef {
        chat: ChatId(1),
        message_id: 1,
        text: text.to_string(),
    }
}
