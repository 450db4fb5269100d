//! User interface layer
//!
//! Menu, prompts and the two table outputs: the fixed-width record
//! renderer and bordered tables for aggregates.

pub mod menu;
pub mod prompts;
pub mod result_display;
pub mod table_renderer;
