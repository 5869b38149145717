//! Browser client for DocChat.
//!
//! [`view::ChatHistoryView`] holds the chat transcript and history pagination
//! as a pure state machine; [`runtime`] binds it to the page and runs its
//! effects. [`forms`] wires the upload, login and logout controls.

pub mod api;
pub mod dom;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod runtime;
pub mod transcript;
pub mod view;
pub mod wire;
