//! In-memory hierarchical container.
//!
//! A container is a tree of named [`Group`]s whose leaves are typed
//! [`Dataset`]s or links to datasets in other container files. Groups and
//! datasets both carry scalar attributes. See [`crate::format`] for the
//! on-disk encoding.

pub mod dataset;
pub mod group;

pub use dataset::{ArrayData, AttrValue, Attributes, Dataset, Precision};
pub use group::{Group, Node};
