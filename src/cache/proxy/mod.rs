/// The module proxy exists only to allow writing benchmarks for non-public APIs.
/// `criterion` supports writing benchmarks only for public APIs, so the abstractions below get thin proxy objects
/// that delegate to the target objects:
    /// `frequency_sketch` : FrequencySketch counts the access frequency of keys using a 4-bit count-min sketch
pub mod frequency_sketch;
