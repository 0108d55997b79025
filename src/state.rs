//! UI-agnostic message types
//!
//! This module contains the data structures rendered by the chat pane. They don't
//! depend on ratatui, so the headless `send` command can print them as well.

/// Tag carried by messages the user typed.
pub const USER_MESSAGE: &str = "user-message";
/// Tag carried by everything the bot side shows (answers, errors, placeholder).
pub const BOT_MESSAGE: &str = "bot-message";
/// Tag marking an error line.
pub const ERROR: &str = "error";
/// Tag marking the transient "Typing..." placeholder.
pub const TYPING: &str = "typing";

/// Who a message belongs to, derived from its tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
    Error,
    Typing,
}

impl Role {
    pub fn from_classes(classes: &ClassList) -> Self {
        if classes.contains(TYPING) {
            Role::Typing
        } else if classes.contains(ERROR) {
            Role::Error
        } else if classes.contains(USER_MESSAGE) {
            Role::User
        } else {
            Role::Bot
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You:",
            Role::Bot | Role::Typing => "Bot:",
            Role::Error => "Error:",
        }
    }
}

/// A non-empty, ordered set of presentation tags.
///
/// Built from a single tag or from an array of tags, so callers never shape-check
/// what they pass to [`crate::widget::ChatWidget::append_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Collect tags from a runtime collection. Returns `None` when it is empty.
    pub fn try_from_iter<I, S>(tags: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !list.contains(&tag) {
                list.push(tag);
            }
        }
        if list.is_empty() {
            None
        } else {
            Some(Self(list))
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl From<&str> for ClassList {
    fn from(tag: &str) -> Self {
        Self(vec![tag.to_string()])
    }
}

impl From<String> for ClassList {
    fn from(tag: String) -> Self {
        Self(vec![tag])
    }
}

impl<const N: usize> From<[&str; N]> for ClassList {
    fn from(tags: [&str; N]) -> Self {
        const { assert!(N > 0, "a message needs at least one tag") };
        match Self::try_from_iter(tags) {
            Some(list) => list,
            None => unreachable!("non-empty array"),
        }
    }
}

/// A rendered entry in the conversation pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub classes: ClassList,
}

impl Message {
    pub fn new(text: impl Into<String>, classes: impl Into<ClassList>) -> Self {
        let classes = classes.into();
        Self {
            role: Role::from_classes(&classes),
            text: text.into(),
            classes,
        }
    }

    pub fn has_class(&self, tag: &str) -> bool {
        self.classes.contains(tag)
    }
}
