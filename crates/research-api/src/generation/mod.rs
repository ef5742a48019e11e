//! Text generation helpers: prompts and HTML rendering

pub mod prompt;
pub mod render;

pub use prompt::PromptBuilder;
pub use render::{paragraph_count, render, split_blocks};
