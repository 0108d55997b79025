//! The chat widget: input, conversation and the send/resolve cycle.
//!
//! A send action moves through `Idle -> AwaitingResponse -> Resolved`. The widget
//! itself never touches the network; [`ChatWidget::send_message`] hands back an
//! [`Outbound`] for the caller to deliver, and the caller reports the outcome through
//! [`ChatWidget::resolve`]. Both run on the same event loop turn-by-turn.

use tracing::{debug, info, warn};

use crate::client::{ChatReply, TransportError};
use crate::conversation::Conversation;
use crate::input::InputField;
use crate::state::{ClassList, Message, BOT_MESSAGE, ERROR, TYPING, USER_MESSAGE};

/// Text of the transient placeholder shown while a request is pending
pub const PLACEHOLDER_TEXT: &str = "Typing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A message that has been shown locally and still has to reach the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub id: RequestId,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ChatWidget {
    pub conversation: Conversation,
    pub input: InputField,
    next_id: u64,
}

impl ChatWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a send action from the current input.
    ///
    /// Returns `None` (and changes nothing) when the trimmed input is empty.
    pub fn send_message(&mut self) -> Option<Outbound> {
        let text = self.input.value().trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.append_message(text.clone(), USER_MESSAGE);
        self.input.clear();
        self.append_message(PLACEHOLDER_TEXT, [BOT_MESSAGE, TYPING]);

        self.next_id += 1;
        let id = RequestId(self.next_id);
        info!(request = %id, chars = text.chars().count(), "sending chat message");
        Some(Outbound { id, text })
    }

    /// Finish a send action.
    ///
    /// Every placeholder on screen is cleared, including ones still waiting on
    /// other requests.
    pub fn resolve(&mut self, id: RequestId, outcome: Result<ChatReply, TransportError>) {
        let cleared = self.conversation.remove_tagged(TYPING);
        debug!(request = %id, cleared, "removed typing placeholders");

        match outcome {
            Ok(ChatReply::Answer(text)) => {
                info!(request = %id, "chat reply received");
                self.append_message(text, BOT_MESSAGE);
            }
            Ok(ChatReply::Rejected(error)) => {
                info!(request = %id, %error, "chat service reported an error");
                self.append_message(format!("Error: {error}"), [BOT_MESSAGE, ERROR]);
            }
            Err(e) => {
                warn!(request = %id, error = %e, "chat request failed");
                self.append_message(format!("Connection error: {e}"), [BOT_MESSAGE, ERROR]);
            }
        }
    }

    /// Append a message with one or more tags and keep the newest entry in view.
    ///
    /// The text is stored as-is and rendered as plain text.
    pub fn append_message(&mut self, text: impl Into<String>, classes: impl Into<ClassList>) {
        self.conversation.append(Message::new(text, classes));
    }

    pub fn pending_placeholders(&self) -> usize {
        self.conversation.count_tagged(TYPING)
    }
}
