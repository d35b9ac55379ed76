//! Utility types

mod timer;

pub use timer::Timer;
