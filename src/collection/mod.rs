//! Ordered collections
//!
//! The generic core of the ledger:
//!
//! - `AvlTree`: a self-balancing binary search tree keyed by any `Ord` type
//! - `Keyed`: the capability a value needs to live in an `OrderedCollection`
//! - `OrderedCollection`: values stored under their own key, with the
//!   collision-checked `redefine_key` rename primitive
//! - `SimpleStack`: a LIFO used to snapshot records before cascading updates
//!
//! None of these types lock; a caller sharing one across threads must
//! serialize access itself.

mod arena;
mod error;
mod keyed;
mod ordered;
mod stack;
mod tree;

pub use error::{CollectionError, CollectionResult, InvalidKey};
pub use keyed::{required_component, Keyed};
pub use ordered::OrderedCollection;
pub use stack::SimpleStack;
pub use tree::{AvlTree, Iter};
