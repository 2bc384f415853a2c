pub(crate) mod frequency_sketch;
