pub mod common;
pub mod frequency_sketch;
pub mod policies;
