pub mod activity_tree;
pub mod geo;
pub mod migrations;
pub mod registry;
mod seed;

pub use activity_tree::*;
pub use geo::*;
pub use registry::*;
