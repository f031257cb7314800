pub mod get_args;
pub mod commands;
