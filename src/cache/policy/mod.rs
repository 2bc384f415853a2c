pub mod entry;
pub mod segmented_cache;
pub(crate) mod segment_list;
