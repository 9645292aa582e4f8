pub mod machine;

pub use machine::EmulationCore;
