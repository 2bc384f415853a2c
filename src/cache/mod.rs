pub mod config;
pub mod errors;
pub mod policies;
pub mod policy;
pub mod simulation;
pub mod stats;
pub mod trace;
pub mod types;
pub(crate) mod lfu;
pub(crate) mod window;
pub mod proxy;
