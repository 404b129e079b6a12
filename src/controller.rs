// Scroll-synchronized stacked card reveal.
//
// The host forwards scroll, resize and visibility notifications; the
// controller marks itself dirty and does the actual geometry read on the
// next animation frame. Any number of notifications between two frames
// collapse into a single recompute using the freshest geometry.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::geometry::GeometryProvider;
use crate::progress::{self, ScrollSnapshot};

pub const DEFAULT_INTERSECTION_THRESHOLD: f64 = 0.1;

/// Anything that can be keyed for rendering
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Ordered, non-empty, immutable list of display items
#[derive(Debug, Clone)]
pub struct CardSequence<T> {
    items: Vec<T>,
}

impl<T: Keyed> CardSequence<T> {
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::invalid("a card sequence needs at least one item"));
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Keyed::key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    pub item_count: usize,
    /// Visible fraction of the container needed to count as on screen
    pub intersection_threshold: f64,
}

impl ControllerConfig {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            intersection_threshold: DEFAULT_INTERSECTION_THRESHOLD,
        }
    }

    pub fn for_sequence<T: Keyed>(sequence: &CardSequence<T>) -> Self {
        Self::new(sequence.len())
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.intersection_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.item_count < 1 {
            return Err(Error::invalid("item_count must be at least 1"));
        }
        validate_threshold(self.intersection_threshold)
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(Error::invalid(format!(
            "intersection_threshold must be within [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

/// Derives stacked-card presentation from live scroll geometry.
///
/// Exposes no mutation beyond event intake and [`detach`](Self::detach):
/// the snapshot is always a function of the last geometry read.
#[derive(Debug)]
pub struct ScrollProgressController<G: GeometryProvider> {
    geometry: G,
    config: ControllerConfig,
    section_visible: bool,
    snapshot: ScrollSnapshot,
    frame_pending: bool,
    attached: bool,
    recomputes: u64,
}

impl<G: GeometryProvider> ScrollProgressController<G> {
    /// Attach to a container and compute the initial snapshot
    pub fn attach(geometry: G, config: ControllerConfig) -> Result<Self> {
        config.validate()?;

        let g = geometry.measure();
        let snapshot = progress::derive_snapshot(
            g.container_top,
            g.viewport_height,
            config.item_count,
            false,
        );
        debug!(
            items = config.item_count,
            threshold = config.intersection_threshold,
            "scroll controller attached"
        );

        Ok(Self {
            geometry,
            config,
            section_visible: false,
            snapshot,
            frame_pending: false,
            attached: true,
            recomputes: 1,
        })
    }

    pub fn snapshot(&self) -> &ScrollSnapshot {
        &self.snapshot
    }

    pub fn active_index(&self) -> usize {
        self.snapshot.active_index
    }

    pub fn section_visible(&self) -> bool {
        self.section_visible
    }

    pub fn item_count(&self) -> usize {
        self.config.item_count
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// True while a recompute is queued for the next frame
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Number of geometry reads performed, including the one at attach
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    pub fn on_scroll(&mut self) {
        self.request_frame();
    }

    pub fn on_resize(&mut self) {
        self.request_frame();
    }

    /// Visibility transition reported by the host's intersection tracking
    pub fn on_intersection(&mut self, visible_ratio: f64) {
        if !self.attached {
            return;
        }
        let visible = visible_ratio >= self.config.intersection_threshold && visible_ratio > 0.0;
        if visible != self.section_visible {
            debug!(visible, ratio = visible_ratio, "section visibility changed");
            self.section_visible = visible;
            self.request_frame();
        }
    }

    /// Run the queued recompute, if any. Returns whether the snapshot was refreshed.
    pub fn on_animation_frame(&mut self) -> bool {
        if !self.attached || !self.frame_pending {
            return false;
        }
        self.frame_pending = false;
        self.recompute();
        true
    }

    /// Drop all subscriptions; later notifications and frames are ignored
    pub fn detach(&mut self) {
        if self.attached {
            debug!(recomputes = self.recomputes, "scroll controller detached");
        }
        self.attached = false;
        self.frame_pending = false;
    }

    fn request_frame(&mut self) {
        if self.attached {
            self.frame_pending = true;
        }
    }

    fn recompute(&mut self) {
        let g = self.geometry.measure();
        self.snapshot = progress::derive_snapshot(
            g.container_top,
            g.viewport_height,
            self.config.item_count,
            self.section_visible,
        );
        self.recomputes += 1;
        trace!(
            active = self.snapshot.active_index,
            progress = self.snapshot.progress,
            "scroll snapshot recomputed"
        );
    }
}
