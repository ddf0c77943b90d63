//! # Guide Core
//!
//! The contextual assistant delivery engine. It decides which guidance
//! content to show a visitor from where they are, who they are, and what
//! they have already been shown, and tracks the load/display/error
//! lifecycle of that content.
//!
//! ## Core Components
//!
//! - **ledger**: Persisted record of auto-presented locations and the opt-out flag
//! - **resolver**: Maps a `(context, role)` pair to a content request
//! - **fetch**: The content-fetch capability and its tickets
//! - **session**: The state machine hosts drive with [`AssistantEvent`]s
//! - **storage**: The injected key-value capability and two implementations
//!
//! ## Design Philosophy
//!
//! - **Event-Driven**: The session reacts to host events and never awaits I/O itself
//! - **Degrades Quietly**: Storage trouble falls back to defaults; only failed
//!   content resolution is surfaced, and it is always retryable

pub mod error;
pub mod events;
pub mod fetch;
pub mod ledger;
pub mod resolver;
pub mod session;
pub mod storage;

pub use error::{FetchError, StorageError};
pub use events::*;
pub use fetch::*;
pub use ledger::*;
pub use resolver::*;
pub use session::*;
pub use storage::*;
