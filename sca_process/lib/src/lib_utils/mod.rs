pub mod alignment;
pub mod bundle;
pub mod errors;
pub mod gap_filter;
pub mod headers;
pub mod length_filter;
pub mod pairwise;
pub mod pipeline;
pub mod reference;
pub mod similarity;
pub mod structure;
pub mod struct_helper;
pub mod subsample;
