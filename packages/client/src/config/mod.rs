//! Dialer configuration
//!
//! Tunable knobs for the handshake reader, socket options and the client
//! identification sent to proxies, with validation.

pub mod dialer;
pub mod validation;

pub use dialer::{DialerConfig, DEFAULT_USER_AGENT};
pub use validation::{ConfigResult, ConfigurationError, Validator};
