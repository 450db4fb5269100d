pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod ui;
pub mod utils;

pub use error::{ExplorerError, Result};
