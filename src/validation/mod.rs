//! Input validation that runs before a split starts.

mod preflight;

pub use preflight::{check_destination, check_source};
