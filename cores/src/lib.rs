//! Emulation cores the harness can drive, plus the registry hosts use to
//! find them by name.

pub mod registry;
pub mod rom;
pub mod test_pattern;

pub use rom::{InesHeader, RomError, RomImage};
pub use test_pattern::TestPatternCore;
