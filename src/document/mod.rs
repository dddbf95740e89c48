//! Document file management
//!
//! [`DocumentManager`] is the single authority for the open document's path
//! and last-synced text. Consumers own one instance and borrow it; the
//! window, dialog and render seams are traits so the workflows run the same
//! under the terminal UI, headless export, and tests.

pub mod error;
pub mod events;
pub mod manager;
pub mod state;
pub mod window;

pub use error::{DocumentError, DocumentResult};
pub use events::DocumentEvent;
pub use manager::{DocumentManager, DocumentSettings};
pub use state::DocumentState;
pub use window::{EditorWindow, StaticWindow};
