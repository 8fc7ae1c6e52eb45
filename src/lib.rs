// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod catalog;
pub mod celebration;
pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod runtime;
pub mod session;
pub mod snapshot;
pub mod util;
pub mod validator;
pub mod word_source;

pub use controller::{SessionController, SessionEvent};
pub use error::{DrillError, FeedbackError, SourceError, StoreError};
pub use session::{Phase, SessionState, POINTS_PER_WORD};
pub use validator::{InputValidator, Outcome};
