//! Object Graph Trait
//!
//! Core abstraction for reading a host's live object graph.

use super::value::{ObjectId, Rect, Value, Visual};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("object {0} no longer exists")]
    Vanished(ObjectId),

    #[error("type '{type_name}' has no attribute '{attribute}'")]
    MissingAttribute { type_name: String, attribute: String },

    #[error("reading '{attribute}' on {id} faulted")]
    ReadFault { id: ObjectId, attribute: String },

    #[error("unknown type '{0}'")]
    UnknownType(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Trait for reading a live object graph (host process, snapshot file, test fixture)
///
/// Every read may fail: objects can be destroyed between enumeration and
/// inspection, and attribute getters on the host side can fault.
pub trait ObjectGraph {
    /// All live objects, in graph-defined enumeration order
    fn live_objects(&self) -> Vec<ObjectId>;

    /// Runtime type name of an object
    fn type_name(&self, id: ObjectId) -> GraphResult<String>;

    /// Host-side object name (often empty)
    fn object_name(&self, id: ObjectId) -> GraphResult<String>;

    /// Active in hierarchy: the object and all of its ancestors are active
    fn is_active(&self, id: ObjectId) -> GraphResult<bool>;

    fn parent(&self, id: ObjectId) -> GraphResult<Option<ObjectId>>;

    fn children(&self, id: ObjectId) -> GraphResult<Vec<ObjectId>>;

    /// Screen rectangle, if the object is renderable
    fn rect(&self, id: ObjectId) -> GraphResult<Option<Rect>>;

    /// Image-like component data, if the object carries one
    fn visual(&self, id: ObjectId) -> GraphResult<Option<Visual>>;

    /// Readable instance attributes of a type, in declaration order
    fn type_attributes(&self, type_name: &str) -> GraphResult<Vec<String>>;

    /// Read one instance attribute
    fn read(&self, id: ObjectId, attribute: &str) -> GraphResult<Value>;

    /// Scan the loaded type catalogs for a type by exact name
    fn lookup_type(&self, name: &str) -> Option<String>;

    /// Read a static (type-level) attribute
    fn read_static(&self, type_name: &str, attribute: &str) -> GraphResult<Value>;

    /// Check whether a handle still resolves
    fn is_alive(&self, id: ObjectId) -> bool {
        self.type_name(id).is_ok()
    }

    /// Alive and active in hierarchy; any failure counts as inactive
    fn is_live_and_active(&self, id: ObjectId) -> bool {
        self.is_active(id).unwrap_or(false)
    }

    fn read_bool(&self, id: ObjectId, attribute: &str) -> Option<bool> {
        self.read(id, attribute).ok()?.as_bool()
    }

    fn read_int(&self, id: ObjectId, attribute: &str) -> Option<i64> {
        self.read(id, attribute).ok()?.as_int()
    }

    fn read_number(&self, id: ObjectId, attribute: &str) -> Option<i64> {
        self.read(id, attribute).ok()?.as_number()
    }

    fn read_ref(&self, id: ObjectId, attribute: &str) -> Option<ObjectId> {
        self.read(id, attribute).ok()?.as_ref_id()
    }

    /// Parent chain from the direct parent upward
    fn ancestors(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id).ok().flatten();
        while let Some(p) = current {
            // Malformed graphs can contain cycles
            if chain.contains(&p) || p == id {
                break;
            }
            chain.push(p);
            current = self.parent(p).ok().flatten();
        }
        chain
    }

    /// Depth-first descendants, excluding `id` itself
    fn descendants(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack: Vec<ObjectId> = self.children(id).unwrap_or_default();
        stack.reverse();
        while let Some(next) = stack.pop() {
            if next == id || out.contains(&next) {
                continue;
            }
            out.push(next);
            let mut kids = self.children(next).unwrap_or_default();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }
}
