//! Terminal UI: startup banner and interactive credential prompts.

pub mod banner;
pub mod prompt;

/// Prints the welcome banner. Call once at startup, after tracing init.
pub fn init_ui() {
    banner::print_welcome();
}
