//! Blog Manager - posts and tags on SQLite or MySQL
//!
//! This library provides the post store and the command-line front end used
//! by the `blog-manager` binary.

pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
