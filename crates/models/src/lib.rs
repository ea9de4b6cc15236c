pub mod config;
pub mod error;
pub mod organization;

pub use config::*;
pub use error::*;
pub use organization::*;
