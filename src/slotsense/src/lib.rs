//! # slotsense
//!
//! Infers how many inventory slots are occupied in a host application whose
//! object model is only known at runtime.
//!
//! The engine reads the host through the [`ObjectGraph`] trait and never
//! holds on to host objects: every reference is a weak [`ObjectId`] that is
//! re-validated on each poll. From that graph it:
//! - Detects whether the inventory UI is open, and where it is
//! - Resolves each slot's occupancy through an ordered chain of heuristics,
//!   deferring to an authoritative item list when the host exposes one
//! - Reports `{is_open, count, total_slots}` to an [`OverlayPresenter`],
//!   only when it changes
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use slotsense::{EngineContext, Poller, RecordingPresenter, SnapshotGraph};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = SnapshotGraph::load(Path::new("share/snapshots/inventory_open.yaml"))?;
//! let mut ctx = EngineContext::default();
//! let mut poller = Poller::new(&ctx.config.polling);
//! let mut presenter = RecordingPresenter::new();
//!
//! poller.tick(&mut ctx, &graph, &mut presenter, Duration::from_millis(250));
//! println!("badge: {:?}", presenter.text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod discovery;
pub mod graph;
pub mod mirror;
pub mod poller;
pub mod presenter;
pub mod probe;
pub mod resolver;

#[doc(inline)]
pub use config::{BadgeLayout, ConfigError, DiscoveryConfig, EngineConfig, MirrorConfig, PollingConfig};
#[doc(inline)]
pub use context::EngineContext;
#[doc(inline)]
pub use discovery::{find_anchor, find_container_candidates, slot_candidates, Discovery, MatchTier};
#[doc(inline)]
pub use graph::{
    GraphError, GraphResult, ObjectGraph, ObjectId, Rect, SnapshotError, SnapshotGraph,
    SnapshotSequence, Value, Visual,
};
#[doc(inline)]
pub use mirror::{MirrorResolver, MirrorStatus};
#[doc(inline)]
pub use poller::{IntervalTimer, PollState, Poller};
#[doc(inline)]
pub use presenter::{
    badge_rect, AnchorSource, AnchorTarget, InventoryState, OverlayPresenter, PresenterEvent,
    RecordingPresenter,
};
#[doc(inline)]
pub use probe::{ProbeCache, ProbeResult};

// Occupancy and counting
#[doc(inline)]
pub use resolver::{
    aggregate, count_collection, count_from_model, count_from_ui, explain_occupied,
    resolve_occupied, resolve_quantity, tally, Signal, SlotDecision, Tally, UiCount,
};
