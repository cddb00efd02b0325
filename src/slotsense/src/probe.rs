//! Type/Member Probe Cache
//!
//! Host types are only known at runtime. The first time a type is seen its
//! attribute list is scanned once and split into the names that look like
//! collections and the names that look like quantities. Entries are never
//! invalidated: host types are assumed structurally stable for the lifetime
//! of the process.
//!
//! The same cache backs the generic capability probe (`read_first`): given an
//! object and a list of candidate attribute names, return the first one the
//! type declares that reads with the expected shape.

use crate::graph::{ObjectGraph, ObjectId, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Name fragments of collection-like attributes
pub const COLLECTION_KEYWORDS: &[&str] = &["inventory", "items", "bag", "slots", "slotlist"];

/// Name fragments of quantity-like attributes
pub const QUANTITY_KEYWORDS: &[&str] = &["amount", "count", "quantity", "qty", "stack", "stackcount"];

/// Cached scan of one runtime type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    pub type_name: String,
    /// Collection-like attribute names, declaration order
    pub collection_like: Vec<String>,
    /// Quantity-like attribute names, declaration order
    pub quantity_like: Vec<String>,
    readable: HashSet<String>,
}

impl ProbeResult {
    fn scan(type_name: &str, attributes: Vec<String>) -> Self {
        let collection_like = attributes
            .iter()
            .filter(|a| matches_any(a, COLLECTION_KEYWORDS))
            .cloned()
            .collect();
        let quantity_like = attributes
            .iter()
            .filter(|a| matches_any(a, QUANTITY_KEYWORDS))
            .cloned()
            .collect();
        Self {
            type_name: type_name.to_string(),
            collection_like,
            quantity_like,
            readable: attributes.into_iter().collect(),
        }
    }

    /// Whether the type exposes a readable attribute with this exact name
    pub fn declares(&self, attribute: &str) -> bool {
        self.readable.contains(attribute)
    }
}

/// Case-insensitive substring match against any keyword
pub fn matches_any(name: &str, keywords: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// Per-type memo of probe results
#[derive(Debug, Default)]
pub struct ProbeCache {
    entries: HashMap<String, Arc<ProbeResult>>,
    scans: usize,
}

impl ProbeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct types cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attribute scans performed so far
    pub fn scans(&self) -> usize {
        self.scans
    }

    /// Probe result for a type, scanning it on first use
    ///
    /// A type whose attribute list cannot be read yields an empty result that
    /// is not cached, so a later poll can try again.
    pub fn probe(&mut self, graph: &dyn ObjectGraph, type_name: &str) -> Arc<ProbeResult> {
        if let Some(hit) = self.entries.get(type_name) {
            return Arc::clone(hit);
        }

        match graph.type_attributes(type_name) {
            Ok(attributes) => {
                self.scans += 1;
                let result = Arc::new(ProbeResult::scan(type_name, attributes));
                tracing::trace!(
                    type_name,
                    collections = ?result.collection_like,
                    quantities = ?result.quantity_like,
                    "probed type"
                );
                self.entries
                    .insert(type_name.to_string(), Arc::clone(&result));
                result
            }
            Err(e) => {
                tracing::trace!(type_name, error = %e, "type attributes unavailable");
                Arc::new(ProbeResult {
                    type_name: type_name.to_string(),
                    ..ProbeResult::default()
                })
            }
        }
    }

    /// Probe result for the runtime type of an object
    pub fn probe_object(&mut self, graph: &dyn ObjectGraph, id: ObjectId) -> Option<Arc<ProbeResult>> {
        let type_name = graph.type_name(id).ok()?;
        Some(self.probe(graph, &type_name))
    }

    pub fn collection_attributes_of(&mut self, graph: &dyn ObjectGraph, type_name: &str) -> Vec<String> {
        self.probe(graph, type_name).collection_like.clone()
    }

    pub fn quantity_attributes_of(&mut self, graph: &dyn ObjectGraph, type_name: &str) -> Vec<String> {
        self.probe(graph, type_name).quantity_like.clone()
    }

    /// Capability probe: the first candidate attribute the object's type
    /// declares whose value `extract` accepts.
    ///
    /// Undeclared names are skipped without a read. Read faults and shape
    /// mismatches move on to the next candidate.
    pub fn read_first<T>(
        &mut self,
        graph: &dyn ObjectGraph,
        id: ObjectId,
        candidates: &[&str],
        extract: impl Fn(&Value) -> Option<T>,
    ) -> Option<T> {
        let probe = self.probe_object(graph, id)?;
        candidates
            .iter()
            .filter(|name| probe.declares(name))
            .find_map(|name| match graph.read(id, name) {
                Ok(value) => extract(&value),
                Err(e) => {
                    tracing::trace!(%id, attribute = *name, error = %e, "read suppressed");
                    None
                }
            })
    }

    /// First quantity-like attribute of the object that reads as a number
    pub fn read_quantity(&mut self, graph: &dyn ObjectGraph, id: ObjectId) -> Option<i64> {
        let probe = self.probe_object(graph, id)?;
        probe
            .quantity_like
            .iter()
            .find_map(|name| graph.read(id, name).ok()?.as_number())
    }
}
