//! Core traits for the command handlers.
//!
//! These interfaces keep the handlers free of direct `println!`/stdin use so
//! they can be exercised with capturing fakes.

use pkgdock::console::InventoryConsole;
use pkgdock::gateway::HttpGateway;

/// Trait for outputting messages to the user.
pub trait Output {
    /// Print a line of text.
    fn println(&self, message: &str);

    /// Print an empty line.
    fn newline(&self) {
        self.println("");
    }

    /// Print a section header.
    fn header(&self, title: &str) {
        self.println(title);
        self.println(&"=".repeat(title.len()));
    }

    /// Print an indented line.
    fn indented(&self, message: &str) {
        self.println(&format!("  {}", message));
    }

    /// Print an error message.
    fn error(&self, message: &str) {
        self.println(&format!("Error: {}", message));
    }

    /// Print a success message.
    fn success(&self, message: &str) {
        self.println(&format!("Success: {}", message));
    }
}

/// Trait for user interaction (confirmation prompts).
pub trait UserInteraction {
    /// Prompt for yes/no confirmation.
    fn confirm(&self, message: &str) -> bool;
}

/// Context providing dependencies to command handlers.
pub struct CommandContext<'a> {
    /// The console driving the store.
    pub console: &'a mut InventoryConsole<HttpGateway>,

    /// Output interface for user messages.
    pub output: &'a dyn Output,

    /// User interaction for prompts.
    pub interaction: &'a dyn UserInteraction,
}

impl<'a> CommandContext<'a> {
    /// Create a new command context.
    pub fn new(
        console: &'a mut InventoryConsole<HttpGateway>,
        output: &'a dyn Output,
        interaction: &'a dyn UserInteraction,
    ) -> Self {
        Self {
            console,
            output,
            interaction,
        }
    }
}
