//! # creditviz common
//!
//! Shared record types, errors, logging and formatting helpers used by
//! every crate in the creditviz workspace.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{CreditVizError, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
