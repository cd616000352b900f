// Crate root library declaration and module exports.
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod import;
pub mod logic;
pub mod model;
pub mod storage;
