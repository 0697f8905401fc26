//! Obra: project tracking for a furniture and renovation business
//!
//! An in-memory store of clients, sellers and projects with file
//! attachments, driven from the command line or an interactive shell.

pub mod cli;
pub mod core;
pub mod entities;
