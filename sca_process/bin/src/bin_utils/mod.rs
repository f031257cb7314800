pub mod get_args;
pub mod process_msa;
