//! Object Graph Abstraction
//!
//! Core abstractions for reading a host's object graph:
//! - `ObjectGraph` trait: enumeration, containment, attribute reads
//! - `Value`: untyped attribute values and their typed views
//! - `SnapshotGraph`: in-memory graph from snapshot files (and test fixtures)

mod snapshot;
mod traits;
mod value;

pub use snapshot::{
    ObjectBuilder, ObjectDecl, Snapshot, SnapshotError, SnapshotGraph, SnapshotSequence, TypeDecl,
};
pub use traits::{GraphError, GraphResult, ObjectGraph};
pub use value::{ObjectId, Rect, RefValue, Value, Visual, TRANSPARENT_ALPHA};
