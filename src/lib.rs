pub mod cli;
pub mod config;
pub mod data;

pub use config::Config;
pub use data::{load_data_file, parse_data, DataFileError};
