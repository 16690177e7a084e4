//! Graph storage and traversal: the adapter boundary and the in-memory reference store.

pub mod builder;
pub mod memory_graph;
pub mod store;
pub mod traversal;

pub use builder::GraphBuilder;
pub use memory_graph::{GraphStats, MemoryGraph};
pub use store::GraphStore;
pub use traversal::{dijkstra, weighted_dfs, TraversalDirection};
