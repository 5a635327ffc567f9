pub mod arena;
mod context_iter;
pub mod error;
pub mod keyed;
pub mod traversal;

pub use arena::{Node, Tree};
pub use context_iter::ContextIterator;
pub use error::{TreeError, TreeResult};
pub use traversal::{BreadthFirst, BreadthFirstTraversal, DepthFirst, DepthFirstTraversal, Order, Traversal, ValueFirst, ValueFirstTraversal};
