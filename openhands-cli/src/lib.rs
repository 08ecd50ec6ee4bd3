//! OpenHands CLI: argument handling and error reporting around the agent chat session.

pub mod cli;
pub mod console;
pub mod utils;
