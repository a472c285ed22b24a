//! Desktop client for NF-e fiscal documents: ZIP upload with simulated
//! progress, dashboard, document browser with AI analysis, and a chat
//! assistant. Remote endpoints fall back to built-in data when unavailable.

pub mod app;
pub mod chat;
pub mod config;
pub mod documents;
pub mod error;
pub mod export;
pub mod notify;
pub mod remote;
pub mod upload;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
