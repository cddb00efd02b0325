//! Replay command handler
//!
//! Feeds snapshot frames to the poller as if they were successive states of a
//! live host, and prints every overlay notification.

use anyhow::{bail, Context, Result};
use slotsense::{
    badge_rect, AnchorTarget, BadgeLayout, EngineConfig, EngineContext, InventoryState,
    OverlayPresenter, Poller, Rect, SnapshotGraph, SnapshotSequence,
};
use std::path::PathBuf;
use std::time::Duration;

pub struct ReplayOptions {
    pub ticks_per_frame: u32,
    pub tick: Duration,
    pub screen: Rect,
}

pub fn handle(snapshots: &[PathBuf], options: &ReplayOptions, config: &EngineConfig) -> Result<()> {
    if options.ticks_per_frame == 0 {
        bail!("--ticks-per-frame must be at least 1");
    }

    let sequence = SnapshotSequence::from_paths(snapshots).context("Failed to load snapshots")?;
    let frames = sequence.graphs().context("Failed to build snapshot graphs")?;
    eprintln!("Replaying {} frame(s)", frames.len());

    let mut presenter = ConsolePresenter::new(config.layout.clone(), options.screen, true);
    replay(&frames, options, config, &mut presenter);
    Ok(())
}

fn replay(
    frames: &[SnapshotGraph],
    options: &ReplayOptions,
    config: &EngineConfig,
    presenter: &mut ConsolePresenter,
) {
    let mut ctx = EngineContext::new(config.clone());
    let mut poller = Poller::new(&config.polling);

    for (index, graph) in frames.iter().enumerate() {
        presenter.frame = index;
        for _ in 0..options.ticks_per_frame {
            presenter.clock += options.tick;
            poller.tick(&mut ctx, graph, &mut *presenter, options.tick);
        }
    }
}

/// Presenter that turns notifications into log lines
pub struct ConsolePresenter {
    layout: BadgeLayout,
    screen: Rect,
    echo: bool,
    pub frame: usize,
    pub clock: Duration,
    pub lines: Vec<String>,
}

impl ConsolePresenter {
    pub fn new(layout: BadgeLayout, screen: Rect, echo: bool) -> Self {
        Self {
            layout,
            screen,
            echo,
            frame: 0,
            clock: Duration::ZERO,
            lines: Vec::new(),
        }
    }

    fn emit(&mut self, message: String) {
        let line = format!(
            "[frame {} {:>6}ms] {}",
            self.frame,
            self.clock.as_millis(),
            message
        );
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line);
    }
}

impl OverlayPresenter for ConsolePresenter {
    fn set_visible(&mut self, visible: bool) {
        self.emit(if visible { "show" } else { "hide" }.to_string());
    }

    fn place(&mut self, anchor: &AnchorTarget, rect: Option<Rect>) {
        let message = match rect {
            Some(rect) => {
                let badge = badge_rect(&self.layout, rect, self.screen);
                format!(
                    "anchor {} ({:?}) badge at ({:.0}, {:.0}) {:.0}x{:.0}",
                    anchor.id, anchor.source, badge.x, badge.y, badge.width, badge.height
                )
            }
            None => format!("anchor {} ({:?}) without rect", anchor.id, anchor.source),
        };
        self.emit(message);
    }

    fn render(&mut self, state: &InventoryState) {
        self.emit(format!("text {}", state.badge_text()));
    }
}
