//! Logging abstractions
//!
//! Components take an `Arc<dyn Logger>` so the host decides where output goes.

mod traits;
mod noop;
mod console;

pub use traits::{Logger, LogLevel, SharedLogger};
pub use noop::NoOpLogger;
pub use console::{ConsoleLogger, LOG_LEVEL_ENV};
