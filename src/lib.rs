//! menuflow - hierarchical button menus for chat bots
//!
//! Assemble a tree of screens with [`MenuBuilder`], bind it to a messaging
//! platform with [`Menu::new`], render it per locale, then feed button
//! presses into [`Menu::dispatch`].

pub mod config;
pub mod console;
pub mod i18n;
pub mod menu;
pub mod platform;
pub mod session;

pub use config::MenuConfig;
pub use menu::{
    endpoint_fn, Directive, Endpoint, EndpointContext, Markup, Menu, MenuBuilder, MenuError,
    MenuTree, NodeId, Transition,
};
pub use platform::{Callback, ChatId, MessageRef, Messenger, SessionStore, Translator, UserId};
pub use session::{InMemorySessions, Session, SessionHandle};
