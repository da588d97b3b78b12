pub mod config;
pub mod error;
pub mod types;

pub use config::VitrineConfig;
pub use error::{Result, VitrineError};
pub use types::*;
