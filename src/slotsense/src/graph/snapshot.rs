//! Snapshot Object Graph
//!
//! An in-memory object graph loaded from a JSON or YAML snapshot, or built
//! programmatically for tests. Snapshots declare a type catalog and a flat list
//! of objects linked by parent ids:
//!
//! ```yaml
//! types:
//!   - name: InGameUI
//!     attributes: [items]
//!     statics: { instance: { ref: 2 } }
//! objects:
//!   - { id: 1, type: Canvas, name: HUD, rect: { x: 0, y: 0, width: 1920, height: 1080 } }
//!   - { id: 2, type: InGameUI, parent: 1, attributes: { items: [] } }
//! ```

use super::traits::{GraphError, GraphResult, ObjectGraph};
use super::value::{ObjectId, Rect, Value, Visual};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate object id {0}")]
    DuplicateId(ObjectId),
}

/// Type catalog entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Instance attributes in declaration order
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Type-level attributes (singleton accessors and the like)
    #[serde(default)]
    pub statics: IndexMap<String, Value>,
}

/// One object in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDecl {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub parent: Option<ObjectId>,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub visual: Option<Visual>,
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
    /// Attributes whose getter faults when read
    #[serde(default)]
    pub faults: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl ObjectDecl {
    fn new(id: ObjectId, type_name: &str) -> Self {
        Self {
            id,
            type_name: type_name.to_string(),
            name: String::new(),
            active: true,
            parent: None,
            rect: None,
            visual: None,
            attributes: IndexMap::new(),
            faults: Vec::new(),
        }
    }
}

/// Serialized form of a snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub objects: Vec<ObjectDecl>,
}

impl Snapshot {
    /// Parse snapshot text, treating `.json` paths as JSON and everything else as YAML
    pub fn parse(text: &str, path: &Path) -> Result<Self, SnapshotError> {
        if is_json(path) {
            Ok(serde_json::from_str(text)?)
        } else {
            Ok(serde_yaml::from_str(text)?)
        }
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Ordered frames of a changing graph, replayed one after another
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotSequence {
    pub frames: Vec<Snapshot>,
}

impl SnapshotSequence {
    /// One frame per file, in the given order
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, SnapshotError> {
        let frames = paths
            .iter()
            .map(|p| Snapshot::load(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames })
    }

    pub fn graphs(&self) -> Result<Vec<SnapshotGraph>, SnapshotError> {
        self.frames
            .iter()
            .cloned()
            .map(SnapshotGraph::from_snapshot)
            .collect()
    }
}

/// In-memory object graph backed by a snapshot
#[derive(Debug, Clone, Default)]
pub struct SnapshotGraph {
    types: IndexMap<String, TypeDecl>,
    objects: IndexMap<ObjectId, ObjectDecl>,
    next_id: u64,
}

impl SnapshotGraph {
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
            objects: IndexMap::new(),
            next_id: 1,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        let mut graph = Self::new();
        for decl in snapshot.types {
            graph.types.insert(decl.name.clone(), decl);
        }
        for obj in snapshot.objects {
            if graph.objects.contains_key(&obj.id) {
                return Err(SnapshotError::DuplicateId(obj.id));
            }
            graph.next_id = graph.next_id.max(obj.id.0.saturating_add(1));
            graph.objects.insert(obj.id, obj);
        }
        Ok(graph)
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        Self::from_snapshot(Snapshot::load(path)?)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add an object and return a builder for it
    pub fn spawn(&mut self, type_name: &str) -> ObjectBuilder<'_> {
        // Past the top of the id space, walk forward to the next free id
        let mut id = ObjectId(self.next_id.max(1));
        while self.objects.contains_key(&id) {
            id = ObjectId(id.0.wrapping_add(1).max(1));
        }
        self.next_id = id.0.saturating_add(1);
        self.objects.insert(id, ObjectDecl::new(id, type_name));
        ObjectBuilder { graph: self, id }
    }

    /// Declare a type in the catalog with its instance attributes
    pub fn declare_type(&mut self, name: &str, attributes: &[&str]) {
        let entry = self.types.entry(name.to_string()).or_insert_with(|| TypeDecl {
            name: name.to_string(),
            ..TypeDecl::default()
        });
        entry.attributes = attributes.iter().map(|a| a.to_string()).collect();
    }

    pub fn set_static(&mut self, type_name: &str, attribute: &str, value: impl Into<Value>) {
        let entry = self
            .types
            .entry(type_name.to_string())
            .or_insert_with(|| TypeDecl {
                name: type_name.to_string(),
                ..TypeDecl::default()
            });
        entry.statics.insert(attribute.to_string(), value.into());
    }

    pub fn set_attr(&mut self, id: ObjectId, attribute: &str, value: impl Into<Value>) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.attributes.insert(attribute.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: ObjectId, attribute: &str) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.attributes.shift_remove(attribute);
        }
    }

    pub fn set_active(&mut self, id: ObjectId, active: bool) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.active = active;
        }
    }

    pub fn set_visual(&mut self, id: ObjectId, visual: Option<Visual>) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.visual = visual;
        }
    }

    /// Destroy an object and everything beneath it
    pub fn remove(&mut self, id: ObjectId) {
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for d in doomed {
            self.objects.shift_remove(&d);
        }
    }

    fn get(&self, id: ObjectId) -> GraphResult<&ObjectDecl> {
        self.objects.get(&id).ok_or(GraphError::Vanished(id))
    }

    /// Attribute list for a type missing from the catalog: union of its
    /// instances' attributes, first-seen order
    fn derived_attributes(&self, type_name: &str) -> Option<Vec<String>> {
        let mut attrs: Vec<String> = Vec::new();
        let mut seen = false;
        for obj in self.objects.values().filter(|o| o.type_name == type_name) {
            seen = true;
            for key in obj.attributes.keys().chain(obj.faults.iter()) {
                if !attrs.contains(key) {
                    attrs.push(key.clone());
                }
            }
        }
        seen.then_some(attrs)
    }

    fn declares(&self, type_name: &str, attribute: &str) -> bool {
        match self.types.get(type_name) {
            Some(decl) => decl.attributes.iter().any(|a| a == attribute),
            None => false,
        }
    }
}

impl ObjectGraph for SnapshotGraph {
    fn live_objects(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }

    fn type_name(&self, id: ObjectId) -> GraphResult<String> {
        Ok(self.get(id)?.type_name.clone())
    }

    fn object_name(&self, id: ObjectId) -> GraphResult<String> {
        Ok(self.get(id)?.name.clone())
    }

    fn is_active(&self, id: ObjectId) -> GraphResult<bool> {
        let obj = self.get(id)?;
        if !obj.active {
            return Ok(false);
        }
        let mut current = obj.parent;
        let mut hops = 0usize;
        while let Some(pid) = current {
            // A dangling parent means the subtree was torn down
            let parent = self.get(pid)?;
            if !parent.active {
                return Ok(false);
            }
            current = parent.parent;
            hops += 1;
            if hops > self.objects.len() {
                break;
            }
        }
        Ok(true)
    }

    fn parent(&self, id: ObjectId) -> GraphResult<Option<ObjectId>> {
        Ok(self.get(id)?.parent)
    }

    fn children(&self, id: ObjectId) -> GraphResult<Vec<ObjectId>> {
        self.get(id)?;
        Ok(self
            .objects
            .values()
            .filter(|o| o.parent == Some(id))
            .map(|o| o.id)
            .collect())
    }

    fn rect(&self, id: ObjectId) -> GraphResult<Option<Rect>> {
        Ok(self.get(id)?.rect)
    }

    fn visual(&self, id: ObjectId) -> GraphResult<Option<Visual>> {
        Ok(self.get(id)?.visual.clone())
    }

    fn type_attributes(&self, type_name: &str) -> GraphResult<Vec<String>> {
        match self.types.get(type_name) {
            Some(decl) if !decl.attributes.is_empty() => Ok(decl.attributes.clone()),
            // Catalog entry with statics only
            Some(_) => Ok(self.derived_attributes(type_name).unwrap_or_default()),
            None => self
                .derived_attributes(type_name)
                .ok_or_else(|| GraphError::UnknownType(type_name.to_string())),
        }
    }

    fn read(&self, id: ObjectId, attribute: &str) -> GraphResult<Value> {
        let obj = self.get(id)?;
        if obj.faults.iter().any(|f| f == attribute) {
            return Err(GraphError::ReadFault {
                id,
                attribute: attribute.to_string(),
            });
        }
        if let Some(value) = obj.attributes.get(attribute) {
            return Ok(value.clone());
        }
        if self.declares(&obj.type_name, attribute) {
            return Ok(Value::Null);
        }
        Err(GraphError::MissingAttribute {
            type_name: obj.type_name.clone(),
            attribute: attribute.to_string(),
        })
    }

    fn lookup_type(&self, name: &str) -> Option<String> {
        if self.types.contains_key(name) || self.objects.values().any(|o| o.type_name == name) {
            Some(name.to_string())
        } else {
            None
        }
    }

    fn read_static(&self, type_name: &str, attribute: &str) -> GraphResult<Value> {
        let decl = self
            .types
            .get(type_name)
            .ok_or_else(|| GraphError::UnknownType(type_name.to_string()))?;
        decl.statics
            .get(attribute)
            .cloned()
            .ok_or_else(|| GraphError::MissingAttribute {
                type_name: type_name.to_string(),
                attribute: attribute.to_string(),
            })
    }
}

/// Fluent setup for a freshly spawned object
pub struct ObjectBuilder<'a> {
    graph: &'a mut SnapshotGraph,
    id: ObjectId,
}

impl ObjectBuilder<'_> {
    fn update(self, f: impl FnOnce(&mut ObjectDecl)) -> Self {
        if let Some(decl) = self.graph.objects.get_mut(&self.id) {
            f(decl);
        }
        self
    }

    pub fn name(self, name: &str) -> Self {
        self.update(|d| d.name = name.to_string())
    }

    pub fn parent(self, parent: ObjectId) -> Self {
        self.update(|d| d.parent = Some(parent))
    }

    pub fn inactive(self) -> Self {
        self.update(|d| d.active = false)
    }

    pub fn rect(self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.update(|d| {
            d.rect = Some(Rect {
                x,
                y,
                width,
                height,
            })
        })
    }

    pub fn visual(self, resource: &str, alpha: f32) -> Self {
        self.update(|d| d.visual = Some(Visual::new(resource, alpha)))
    }

    pub fn attr(self, attribute: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.update(|d| {
            d.attributes.insert(attribute.to_string(), value);
        })
    }

    pub fn fault(self, attribute: &str) -> Self {
        self.update(|d| d.faults.push(attribute.to_string()))
    }

    pub fn id(self) -> ObjectId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
types:
  - name: InGameUI
    attributes: [items, inventory]
    statics:
      instance: { ref: 2 }
objects:
  - { id: 1, type: Canvas, name: HUD, rect: { x: 0, y: 0, width: 1920, height: 1080 } }
  - id: 2
    type: InGameUI
    parent: 1
    attributes:
      items: [{ ref: 3 }, null]
  - { id: 3, type: ItemDef, attributes: { type: Sword } }
  - { id: 4, type: InventoryUIItem, parent: 1, active: false, faults: [quantity] }
"#;

    fn sample() -> SnapshotGraph {
        let snap = Snapshot::parse(SAMPLE, Path::new("sample.yaml")).unwrap();
        SnapshotGraph::from_snapshot(snap).unwrap()
    }

    #[test]
    fn test_load_yaml_sample() {
        let g = sample();
        assert_eq!(g.len(), 4);
        assert_eq!(
            g.live_objects(),
            vec![ObjectId(1), ObjectId(2), ObjectId(3), ObjectId(4)]
        );
        assert_eq!(g.type_name(ObjectId(2)).unwrap(), "InGameUI");
        assert_eq!(g.object_name(ObjectId(1)).unwrap(), "HUD");
        assert_eq!(g.children(ObjectId(1)).unwrap(), vec![ObjectId(2), ObjectId(4)]);
    }

    #[test]
    fn test_declared_but_unset_attribute_reads_null() {
        let g = sample();
        assert_eq!(g.read(ObjectId(2), "inventory").unwrap(), Value::Null);
        assert!(matches!(
            g.read(ObjectId(2), "nope"),
            Err(GraphError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_fault_and_vanished_reads() {
        let mut g = sample();
        assert!(matches!(
            g.read(ObjectId(4), "quantity"),
            Err(GraphError::ReadFault { .. })
        ));
        g.remove(ObjectId(1));
        assert_eq!(
            g.read(ObjectId(2), "items"),
            Err(GraphError::Vanished(ObjectId(2)))
        );
        assert!(!g.is_alive(ObjectId(4)));
        assert!(g.is_alive(ObjectId(3)));
    }

    #[test]
    fn test_active_in_hierarchy() {
        let mut g = SnapshotGraph::new();
        let root = g.spawn("Canvas").id();
        let mid = g.spawn("Panel").parent(root).id();
        let leaf = g.spawn("Slot").parent(mid).id();
        assert!(g.is_active(leaf).unwrap());
        g.set_active(mid, false);
        assert!(!g.is_active(leaf).unwrap());
        assert!(g.is_active(root).unwrap());
    }

    #[test]
    fn test_derived_type_attributes_first_seen_order() {
        let mut g = SnapshotGraph::new();
        g.spawn("Slot").attr("icon", Value::Null).attr("count", 1).id();
        g.spawn("Slot").attr("count", 2).attr("hasItem", true).id();
        assert_eq!(
            g.type_attributes("Slot").unwrap(),
            vec!["icon".to_string(), "count".to_string(), "hasItem".to_string()]
        );
        assert!(matches!(
            g.type_attributes("Ghost"),
            Err(GraphError::UnknownType(_))
        ));
    }

    #[test]
    fn test_statics_and_type_lookup() {
        let g = sample();
        assert_eq!(g.lookup_type("InGameUI").as_deref(), Some("InGameUI"));
        assert_eq!(g.lookup_type("ItemDef").as_deref(), Some("ItemDef"));
        assert_eq!(g.lookup_type("Missing"), None);
        assert_eq!(
            g.read_static("InGameUI", "instance").unwrap().as_ref_id(),
            Some(ObjectId(2))
        );
        assert!(g.read_static("InGameUI", "realInstance").is_err());
        assert!(g.read_static("Nope", "instance").is_err());
    }

    #[test]
    fn test_descendants_depth_first() {
        let mut g = SnapshotGraph::new();
        let root = g.spawn("Root").id();
        let a = g.spawn("A").parent(root).id();
        let a1 = g.spawn("A1").parent(a).id();
        let b = g.spawn("B").parent(root).id();
        assert_eq!(g.descendants(root), vec![a, a1, b]);
        assert_eq!(g.ancestors(a1), vec![a, root]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let snap = Snapshot {
            types: vec![],
            objects: vec![
                ObjectDecl::new(ObjectId(5), "A"),
                ObjectDecl::new(ObjectId(5), "B"),
            ],
        };
        assert!(matches!(
            SnapshotGraph::from_snapshot(snap),
            Err(SnapshotError::DuplicateId(ObjectId(5)))
        ));
    }

    #[test]
    fn test_spawn_after_load_does_not_collide() {
        let mut g = sample();
        let id = g.spawn("Extra").id();
        assert_eq!(id, ObjectId(5));
    }

    #[test]
    fn test_max_id_loads_and_spawn_stays_unique() {
        let snap = Snapshot::parse(
            r#"{"objects":[{"id":18446744073709551615,"type":"InventoryUIItem"}]}"#,
            Path::new("frame.json"),
        )
        .unwrap();
        let mut g = SnapshotGraph::from_snapshot(snap).unwrap();
        assert_eq!(g.len(), 1);

        let first = g.spawn("Extra").id();
        let second = g.spawn("Extra").id();
        assert_ne!(first, ObjectId(u64::MAX));
        assert_ne!(first, second);
        assert_eq!(g.len(), 3);
        assert_eq!(g.type_name(ObjectId(u64::MAX)).unwrap(), "InventoryUIItem");
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"objects": [{{"id": 7, "type": "Slot", "attributes": {{"qty": 3}}}}]}}"#
        )
        .unwrap();
        let g = SnapshotGraph::load(file.path()).unwrap();
        assert_eq!(g.read(ObjectId(7), "qty").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = SnapshotGraph::load(Path::new("/nonexistent/snap.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/snap.yaml"));
    }
}
