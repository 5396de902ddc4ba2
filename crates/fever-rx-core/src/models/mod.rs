//! Domain models for fever-rx.

mod case;
mod history;
mod outcome;
mod patient;
mod rule;

pub use case::*;
pub use history::*;
pub use outcome::*;
pub use patient::*;
pub use rule::*;
