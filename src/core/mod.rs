pub mod engine;
pub mod log;
pub mod roster;
