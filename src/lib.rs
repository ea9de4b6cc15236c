pub mod config;

pub use config::{figment, load_config, prepare_storage};
