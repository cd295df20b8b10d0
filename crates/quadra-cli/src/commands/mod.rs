//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod decode;
pub mod encode;
pub mod generate;
pub mod info;
