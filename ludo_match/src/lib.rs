mod agent;
mod config;
mod frontend;
mod mailbox;
mod orchestrator;
mod state;
pub use agent::*;
pub use config::*;
pub use frontend::*;
pub use mailbox::*;
pub use orchestrator::*;
pub use state::*;
