//! Command implementations for gpx2gp.

pub mod convert;
pub mod list;

pub use convert::{ConvertOptions, cmd_convert};
pub use list::cmd_list;
