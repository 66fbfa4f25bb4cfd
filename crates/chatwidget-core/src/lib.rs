pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod escape;
pub mod pending;
pub mod state;
pub mod view;

// Re-export main types for convenience
pub use api::{ChatApi, ChatReply, SchedulerResults};
pub use client::{ChatClient, PollHandle, CONNECTION_ERROR_TEXT, DEFAULT_POLL_INTERVAL};
pub use config::Config;
pub use error::ApiError;
pub use pending::{PendingGuard, PendingIndicator};
pub use state::{History, Message, Sender};
pub use view::ChatView;
