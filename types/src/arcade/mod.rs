//! Arcade economy domain types.
//!
//! Defines tier/target/outcome state and constants used by the hit-resolution
//! engine and by downstream audit and anti-cheat consumers.

mod codec;
mod constants;
mod outcome;
mod target;
mod tier;

pub use codec::{read_string, string_encode_size, write_string};
pub use constants::*;
pub use outcome::*;
pub use target::*;
pub use tier::*;
