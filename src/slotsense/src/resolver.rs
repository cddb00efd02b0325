//! Occupancy and Quantity Resolver
//!
//! Decides whether a slot widget holds an item by running an ordered chain of
//! strategies. Each strategy answers `Some(bool)` when it is confident and
//! `None` when it has nothing to say; the first `Some` wins.
//!
//! | # | Signal   | Source                                                    |
//! |---|----------|-----------------------------------------------------------|
//! | 1 | Mirror   | controller item list, by slot position                    |
//! | 2 | Flag     | `hasItem`/`occupied`/... true, or `isEmpty`/`empty`       |
//! | 3 | Quantity | first quantity-like attribute, when positive              |
//! | 4 | Sentinel | negative slot index means empty                           |
//! | 5 | Icon     | icon attribute referencing a visible image                |
//! | 6 | Visual   | visible image on the slot or an active descendant         |
//! | 7 | Default  | empty                                                     |

use crate::context::EngineContext;
use crate::discovery::{slot_candidates, type_matches};
use crate::graph::{ObjectGraph, ObjectId, Value};
use crate::presenter::InventoryState;
use std::fmt;

const FLAG_ATTRIBUTES: &[&str] = &["hasItem", "occupied", "isOccupied", "isFilled"];
const EMPTY_FLAG_ATTRIBUTES: &[&str] = &["isEmpty", "empty"];
const SLOT_INDEX_ATTRIBUTES: &[&str] = &["slotValue", "slotIndex", "index", "itemIndex"];
const ICON_ATTRIBUTES: &[&str] = &["icon", "itemIcon", "image", "iconImage"];

/// Identity attributes used when counting generic collection elements
const ID_ATTRIBUTES: &[&str] = &["slotValue", "slotIndex", "index", "itemIndex", "id"];

/// Live-inventory members tried on the mirror controller type
const CONTROLLER_INVENTORY_ATTRIBUTES: &[&str] = &[
    "inventory",
    "playerInventory",
    "bag",
    "itemsInInventory",
    "currentInventory",
    "slots",
];

/// Which strategy decided a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Mirror,
    Flag,
    Quantity,
    Sentinel,
    Icon,
    Visual,
    Default,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Mirror => "mirror",
            Signal::Flag => "flag",
            Signal::Quantity => "quantity",
            Signal::Sentinel => "sentinel",
            Signal::Icon => "icon",
            Signal::Visual => "visual",
            Signal::Default => "default",
        };
        f.write_str(name)
    }
}

/// Outcome of the strategy chain for one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDecision {
    pub slot: ObjectId,
    pub slot_index: Option<i64>,
    pub occupied: bool,
    pub signal: Signal,
}

type Strategy = fn(&mut EngineContext, &dyn ObjectGraph, ObjectId, Option<i64>) -> Option<bool>;

const STRATEGIES: &[(Signal, Strategy)] = &[
    (Signal::Mirror, from_mirror),
    (Signal::Flag, from_flags),
    (Signal::Quantity, from_quantity),
    (Signal::Sentinel, from_sentinel),
    (Signal::Icon, from_icon),
    (Signal::Visual, from_visual),
];

/// Run the strategy chain and report which signal decided
pub fn explain_occupied(
    ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    slot: ObjectId,
    slot_index: Option<i64>,
) -> SlotDecision {
    let decided = STRATEGIES
        .iter()
        .find_map(|(signal, strategy)| strategy(ctx, graph, slot, slot_index).map(|o| (*signal, o)));
    let (signal, occupied) = decided.unwrap_or((Signal::Default, false));
    SlotDecision {
        slot,
        slot_index,
        occupied,
        signal,
    }
}

pub fn resolve_occupied(
    ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    slot: ObjectId,
    slot_index: Option<i64>,
) -> bool {
    explain_occupied(ctx, graph, slot, slot_index).occupied
}

/// First integer slot index the widget exposes
pub fn slot_index_of(ctx: &mut EngineContext, graph: &dyn ObjectGraph, slot: ObjectId) -> Option<i64> {
    ctx.probes.read_first(graph, slot, SLOT_INDEX_ATTRIBUTES, Value::as_int)
}

fn from_mirror(
    ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    _slot: ObjectId,
    slot_index: Option<i64>,
) -> Option<bool> {
    // Negative indices are left to the sentinel rule
    let index = slot_index.filter(|i| *i >= 0)?;
    ctx.mirror.resolve(graph, &mut ctx.probes, index)
}

fn from_flags(
    ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    slot: ObjectId,
    _slot_index: Option<i64>,
) -> Option<bool> {
    let set = ctx
        .probes
        .read_first(graph, slot, FLAG_ATTRIBUTES, |v| v.as_bool().filter(|b| *b));
    if set.is_some() {
        return Some(true);
    }
    ctx.probes
        .read_first(graph, slot, EMPTY_FLAG_ATTRIBUTES, Value::as_bool)
        .map(|empty| !empty)
}

fn from_quantity(
    ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    slot: ObjectId,
    _slot_index: Option<i64>,
) -> Option<bool> {
    ctx.probes
        .read_quantity(graph, slot)
        .filter(|q| *q > 0)
        .map(|_| true)
}

fn from_sentinel(
    ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    slot: ObjectId,
    _slot_index: Option<i64>,
) -> Option<bool> {
    let index = ctx.probes.read_first(graph, slot, SLOT_INDEX_ATTRIBUTES, Value::as_int)?;
    (index < 0).then_some(false)
}

fn from_icon(
    ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    slot: ObjectId,
    _slot_index: Option<i64>,
) -> Option<bool> {
    let icon = ctx.probes.read_first(graph, slot, ICON_ATTRIBUTES, Value::as_ref_id)?;
    has_visible_visual(graph, icon).then_some(true)
}

fn from_visual(
    _ctx: &mut EngineContext,
    graph: &dyn ObjectGraph,
    slot: ObjectId,
    _slot_index: Option<i64>,
) -> Option<bool> {
    if has_visible_visual(graph, slot) {
        return Some(true);
    }
    graph
        .descendants(slot)
        .into_iter()
        .any(|child| graph.is_live_and_active(child) && has_visible_visual(graph, child))
        .then_some(true)
}

fn has_visible_visual(graph: &dyn ObjectGraph, id: ObjectId) -> bool {
    matches!(graph.visual(id), Ok(Some(visual)) if visual.is_visible())
}

/// Quantity of one collection element: a positive quantity attribute, else 1
/// for an element with a non-negative id, else 0
pub fn resolve_quantity(ctx: &mut EngineContext, graph: &dyn ObjectGraph, element: ObjectId) -> usize {
    if let Some(q) = ctx.probes.read_quantity(graph, element) {
        if q > 0 {
            return usize::try_from(q).unwrap_or(usize::MAX);
        }
    }
    match ctx.probes.read_first(graph, element, ID_ATTRIBUTES, Value::as_int) {
        Some(id) if id >= 0 => 1,
        _ => 0,
    }
}

/// Number of elements of a list value with a positive quantity.
/// `None` when the value is not a list.
pub fn count_collection(ctx: &mut EngineContext, graph: &dyn ObjectGraph, value: &Value) -> Option<usize> {
    let items = value.as_list()?;
    let count = items
        .iter()
        .filter_map(Value::as_ref_id)
        .filter(|&element| resolve_quantity(ctx, graph, element) > 0)
        .count();
    Some(count)
}

/// Item count read from an inventory model object, if one can be found
pub fn count_from_model(ctx: &mut EngineContext, graph: &dyn ObjectGraph) -> Option<usize> {
    let keywords = ctx.config.discovery.model_keywords.clone();
    let controller = ctx.config.mirror.type_name.clone();

    for id in graph.live_objects() {
        let Ok(type_name) = graph.type_name(id) else {
            continue;
        };

        if type_name.eq_ignore_ascii_case(&controller) {
            let value = ctx.probes.read_first(
                graph,
                id,
                CONTROLLER_INVENTORY_ATTRIBUTES,
                |v| (!v.is_null()).then(|| v.clone()),
            );
            if let Some(count) = value.and_then(|v| count_collection(ctx, graph, &v)) {
                return Some(count);
            }
            continue;
        }

        if !keywords.iter().any(|k| type_matches(graph, id, k)) {
            continue;
        }
        for attribute in ctx.probes.collection_attributes_of(graph, &type_name) {
            let value = match graph.read(id, &attribute) {
                Ok(v) => v,
                Err(e) => {
                    tracing::trace!(%id, attribute = %attribute, error = %e, "read suppressed");
                    continue;
                }
            };
            if let Some(count) = count_collection(ctx, graph, &value) {
                return Some(count);
            }
        }
    }
    None
}

/// Occupancy of the visible slot widgets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiCount {
    pub occupied: usize,
    pub total_slots: usize,
    pub decisions: Vec<SlotDecision>,
}

pub fn count_from_ui(ctx: &mut EngineContext, graph: &dyn ObjectGraph) -> UiCount {
    let slots = slot_candidates(graph, &ctx.config.discovery);
    let decisions: Vec<SlotDecision> = slots
        .into_iter()
        .map(|slot| {
            let index = slot_index_of(ctx, graph, slot);
            explain_occupied(ctx, graph, slot, index)
        })
        .collect();
    UiCount {
        occupied: decisions.iter().filter(|d| d.occupied).count(),
        total_slots: decisions.len(),
        decisions,
    }
}

/// Merge model and UI counts: the larger wins, capped by the slot total
pub fn aggregate(model: Option<usize>, ui: &UiCount) -> InventoryState {
    let mut count = model.unwrap_or(0).max(ui.occupied);
    if ui.total_slots > 0 {
        count = count.min(ui.total_slots);
    }
    InventoryState {
        is_open: true,
        count,
        total_slots: ui.total_slots,
    }
}

/// Full recount with its breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub model: Option<usize>,
    pub ui: UiCount,
    pub state: InventoryState,
}

pub fn tally(ctx: &mut EngineContext, graph: &dyn ObjectGraph) -> Tally {
    let model = count_from_model(ctx, graph);
    let ui = count_from_ui(ctx, graph);
    let state = aggregate(model, &ui);
    Tally { model, ui, state }
}
