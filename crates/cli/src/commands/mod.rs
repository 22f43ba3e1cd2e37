//! Subcommand implementations.
//!
//! One-shot commands apply their intents to the storefront and return the
//! rendered output; `main` prints it.

pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod shell;

/// Result of a one-shot command: the rendered output.
pub type CommandResult = Result<String, Box<dyn std::error::Error>>;
