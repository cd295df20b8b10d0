//! Configuration for the quadra SQ tools.
//!
//! [`Settings`] mirrors a small TOML file with `[filter]`, `[steering]` and
//! `[output]` sections. Every field is optional; missing values fall back to
//! the core defaults. [`Settings::filter_config`] and
//! [`Settings::steering_config`] validate the values into core types.
//!
//! ```rust
//! use quadra_config::Settings;
//!
//! let settings = Settings::from_toml("[filter]\nblock_size = 2048\noverlap = 1024\n")?;
//! let filter = settings.filter_config()?;
//! assert_eq!(filter.latency(), 1536);
//! # Ok::<(), quadra_config::ConfigError>(())
//! ```

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{FilterSettings, OutputFormat, OutputSettings, Settings, SteeringSettings};

/// Convenience result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
