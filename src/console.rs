//! Terminal stand-in for a chat platform

use crate::menu::Markup;
use crate::platform::{Callback, ChatId, MessageRef, Messenger, PlatformError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Prints every screen to stdout and remembers the options last shown
#[derive(Default)]
pub struct ConsoleMessenger {
    screen: Mutex<Markup>,
    next_message_id: AtomicI64,
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Option identifier of the 1-based `choice` on the current screen
    pub fn option(&self, choice: usize) -> Option<String> {
        let screen = self.screen.lock().unwrap_or_else(PoisonError::into_inner);
        let unique = screen
            .buttons()
            .nth(choice.checked_sub(1)?)
            .map(|button| button.unique.clone());
        unique
    }

    fn show(&self, text: &str, markup: &Markup) {
        println!("\n{text}");
        for (i, button) in markup.buttons().enumerate() {
            println!("  [{}] {}", i + 1, button.text);
        }
        *self.screen.lock().unwrap_or_else(PoisonError::into_inner) = markup.clone();
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        self.show(text, markup);
        Ok(MessageRef {
            chat,
            message_id: self.next_message_id.fetch_add(1, Ordering::Relaxed),
            text: text.to_string(),
        })
    }

    async fn edit(
        &self,
        message: &MessageRef,
        text: &str,
        markup: &Markup,
    ) -> Result<MessageRef, PlatformError> {
        self.show(text, markup);
        Ok(MessageRef {
            text: text.to_string(),
            ..message.clone()
        })
    }

    async fn respond(&self, callback: &Callback) -> Result<(), PlatformError> {
        tracing::debug!(callback = %callback.id, "Callback acknowledged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Button;

    #[tokio::test]
    async fn test_option_maps_choice_to_last_screen() {
        let console = ConsoleMessenger::new();
        let markup = Markup {
            rows: vec![
                vec![Button {
                    text: "One".to_string(),
                    unique: "1_node_en2".to_string(),
                }],
                vec![Button {
                    text: "Two".to_string(),
                    unique: "1_node_en3".to_string(),
                }],
            ],
        };
        let sent = console.send(ChatId(1), "Hi", &markup).await.unwrap();
        assert_eq!(console.option(2).as_deref(), Some("1_node_en3"));
        assert_eq!(console.option(0), None);
        assert_eq!(console.option(3), None);

        let edited = console.edit(&sent, "Bye", &Markup::default()).await.unwrap();
        assert_eq!(edited.message_id, sent.message_id);
        assert_eq!(console.option(1), None);
    }
}
