pub mod classification;
pub mod constructors;
pub mod conversions;
pub mod helpers;
pub mod types;

// Re-export main types and functions
pub use constructors::*;
pub use helpers::{IncompleteResponse, OperationCanceled, ResponseTooLarge, TimedOut};
pub use types::{Error, Inner, Kind, Result};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
