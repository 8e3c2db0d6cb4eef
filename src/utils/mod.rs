//! Platform helpers shared by the tree engines and the storage layer.

pub(crate) mod access;
