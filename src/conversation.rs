use crate::state::Message;

/// Ordered list of rendered messages plus the pane's scroll position.
///
/// Append-only except for [`Conversation::remove_tagged`]. History is never capped.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    pub scroll: u16,
    /// When set, the next render scrolls so the newest message is visible
    pub follow: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            scroll: 0,
            follow: true,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.follow = true;
    }

    /// Remove every message carrying `tag`, returning how many went away
    pub fn remove_tagged(&mut self, tag: &str) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.has_class(tag));
        before - self.messages.len()
    }

    pub fn count_tagged(&self, tag: &str) -> usize {
        self.messages.iter().filter(|m| m.has_class(tag)).count()
    }

    /// Apply follow-newest scrolling. `total_rows` is the wrapped height of the
    /// whole conversation as measured by the renderer.
    pub fn scroll_to_bottom(&mut self, total_rows: u16, height: u16) {
        self.scroll = total_rows.saturating_sub(height);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow = false;
    }

    /// Scroll down; reaching the bottom turns follow mode back on.
    pub fn scroll_down(&mut self, lines: u16, total_rows: u16, height: u16) {
        let max = total_rows.saturating_sub(height);
        self.scroll = self.scroll.saturating_add(lines).min(max);
        self.follow = self.scroll >= max;
    }
}
