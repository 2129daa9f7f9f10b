//! Item graph: node registry, pairwise links and link-set construction

pub mod registry;
pub mod links;
pub mod builder;

pub use builder::LinkSetBuilder;
pub use links::Link;
pub use registry::{Node, NodeRegistry};
