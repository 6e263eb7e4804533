pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, DetectArgs, LinkArgs};
pub use handlers::{handle_detect, handle_link};
