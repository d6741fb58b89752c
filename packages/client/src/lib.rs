//! Chalkboard client library: a local replica of a whiteboard room kept in
//! sync with the server over WebSocket, plus the CLI around it.

pub mod app;
pub mod board;
pub mod command;
pub mod connection;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::{ClientConfig, run_client};
