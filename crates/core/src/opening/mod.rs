//! Opening records and ECO classification.

mod eco;
mod moves;
mod types;

pub use eco::{EcoCode, EcoFamily, InvalidEcoCode};
pub use moves::tokenize_moves;
pub use types::*;
