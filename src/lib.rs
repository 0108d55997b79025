//! Terminal chat widget that relays user messages to a remote chatbot endpoint.
//!
//! - [`widget`]: the send/resolve cycle and the conversation it drives
//! - [`client`]: HTTP transport and reply interpretation
//! - [`app`], [`handler`], [`ui`], [`tui`]: the ratatui front-end

pub mod app;
pub mod client;
pub mod config;
pub mod conversation;
pub mod handler;
pub mod input;
pub mod state;
pub mod tui;
pub mod ui;
pub mod widget;

pub use client::{ChatClient, ChatReply, ChatTransport, TransportError};
pub use config::Config;
pub use state::{ClassList, Message, Role};
pub use widget::{ChatWidget, Outbound, RequestId};
