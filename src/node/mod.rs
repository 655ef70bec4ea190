//! # Generic Node Tree
//!
//! The common intermediate form every attribute record persists to.
//! Disk persistence and inter-process messaging both build on it; the tree
//! itself is neither a file format nor a wire format.
//!
//! Design rule: this module knows nothing about concrete record types.

pub mod value;
pub mod data_node;

pub use value::NodeValue;
pub use data_node::DataNode;
