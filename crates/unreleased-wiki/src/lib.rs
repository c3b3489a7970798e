//! Wiki publishing for Unreleased.
//!
//! Pushes the generated report to a Confluence page over XML-RPC:
//! - [`Value`]: XML-RPC values, with [`method_call`] and [`parse_response`]
//! - [`ConfluenceClient`]: `login`, `getPage` and `storePage`

mod client;
mod error;
mod xmlrpc;

pub use client::ConfluenceClient;
pub use error::{WikiError, WikiResult};
pub use xmlrpc::{Value, method_call, parse_response};
