//! # Value Model
//!
//! Every datum that flows through query execution is a [`Value`].
//! These types cross every boundary: materializer ↔ operators ↔ serializer.
//!
//! Design rule: NO I/O here. Entities are plain data; anything that needs
//! the store takes a `Connection` explicitly.

pub mod keys;
pub mod value;
pub mod property;
pub mod mapping;
pub mod edge;
pub mod adjacency;
pub mod vertex;
pub mod path;

pub use value::{Composite, JsonType, Scalar, Value};
pub use property::{Property, PropertyKind, PropertyMap};
pub use mapping::Mapping;
pub use edge::{Direction, Edge};
pub use adjacency::{AdjacencyList, EdgeKey};
pub use vertex::Vertex;
pub use path::PathTree;
