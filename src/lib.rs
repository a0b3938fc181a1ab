pub mod cli;
pub mod error;
pub mod split;
pub mod validation;
