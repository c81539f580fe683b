//! Portfolio leads — the chat widget's lead dialogue and the mail relay
//! behind the site's contact surfaces.

pub mod config;
pub mod contact;
pub mod dialogue;
pub mod error;
pub mod relay;
pub mod server;
