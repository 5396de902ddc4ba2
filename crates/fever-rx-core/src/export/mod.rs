//! Export functionality for visit history.

mod history;

pub use history::*;
