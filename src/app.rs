use std::sync::Arc;

use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::client::ChatTransport;
use crate::tui::AppEvent;
use crate::widget::{ChatWidget, Outbound};

pub struct App {
    // Core state
    pub should_quit: bool,
    pub widget: ChatWidget,
    pub endpoint: String,

    // Transport and the channel its tasks report back on
    transport: Arc<dyn ChatTransport>,
    events: mpsc::UnboundedSender<AppEvent>,

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub send_area: Option<Rect>,

    // Inner size of the conversation pane, for scroll calculations
    pub chat_width: u16,
    pub chat_height: u16,
    /// Wrapped height of the whole conversation at the last render
    pub chat_rows: u16,
}

impl App {
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn ChatTransport>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            widget: ChatWidget::new(),
            endpoint: endpoint.into(),
            transport,
            events,
            chat_area: None,
            send_area: None,
            chat_width: 0,
            chat_height: 0,
            chat_rows: 0,
        }
    }

    /// Run a send action; the request goes out on its own task.
    pub fn submit(&mut self) {
        if let Some(outbound) = self.widget.send_message() {
            self.dispatch(outbound);
        }
    }

    /// Deliver a message in the background and report the outcome to the loop.
    ///
    /// Runs exactly once. Nothing cancels or times out the task.
    pub fn dispatch(&self, outbound: Outbound) {
        let transport = Arc::clone(&self.transport);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = transport.send(&outbound.text).await;
            if events
                .send(AppEvent::Resolved {
                    id: outbound.id,
                    outcome,
                })
                .is_err()
            {
                tracing::debug!(request = %outbound.id, "event loop gone, dropping reply");
            }
        });
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.widget.conversation.scroll_up(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.widget
            .conversation
            .scroll_down(lines, self.chat_rows, self.chat_height);
    }

    /// Half the visible chat height, at least one line
    pub fn page(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::{ChatReply, TransportError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers from a script and records what it was asked
    pub(crate) struct ScriptedTransport {
        pub replies: Mutex<Vec<Result<ChatReply, TransportError>>>,
        pub seen: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(replies: Vec<Result<ChatReply, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, message: &str) -> Result<ChatReply, TransportError> {
            self.seen.lock().unwrap().push(message.to_string());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Err(TransportError::Network("no scripted reply".to_string()))
            } else {
                replies.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn test_submit_dispatches_and_reports_back() {
        let transport = ScriptedTransport::new(vec![Ok(ChatReply::Answer("pong".to_string()))]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new("http://test/chat", transport.clone(), tx);

        app.widget.input.set_value(" ping ");
        app.submit();
        assert_eq!(app.widget.pending_placeholders(), 1);

        match rx.recv().await.unwrap() {
            AppEvent::Resolved { id, outcome } => {
                assert_eq!(outcome, Ok(ChatReply::Answer("pong".to_string())));
                app.widget.resolve(id, outcome);
            }
            other => panic!("unexpected event {other:?}"),
        }

        assert_eq!(transport.seen.lock().unwrap().as_slice(), ["ping".to_string()]);
        assert_eq!(app.widget.pending_placeholders(), 0);
        assert_eq!(app.widget.conversation.last().unwrap().text, "pong");
    }

    #[tokio::test]
    async fn test_blank_submit_sends_nothing() {
        let transport = ScriptedTransport::new(vec![]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new("http://test/chat", transport.clone(), tx);

        app.widget.input.set_value("   ");
        app.submit();
        drop(app);

        assert!(rx.recv().await.is_none());
        assert!(transport.seen.lock().unwrap().is_empty());
    }
}
