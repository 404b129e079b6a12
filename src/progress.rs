// Scroll position to stacked-card presentation math.
//
// Everything here is a pure function of `(container_top, viewport_height,
// item_count, section_visible)`. The controller only decides *when* to call
// into it.

use serde::Serialize;

/// Offset of the active card from the stack's top, in pixels
pub const ACTIVE_OFFSET: f64 = 20.0;
/// Offset of the first card stacked beneath the active one
pub const STACKED_BASE_OFFSET: f64 = 40.0;
/// Extra offset per index for stacked cards so earlier cards peek out
pub const STACKED_STEP: f64 = 15.0;
/// Where hidden cards wait, below the fold
pub const HIDDEN_OFFSET: f64 = 200.0;
pub const BASE_SCALE: f64 = 0.9;
pub const SCALE_STEP: f64 = 0.05;
pub const ACTIVE_OPACITY: f64 = 1.0;
pub const STACKED_OPACITY: f64 = 0.8;

/// Presentation parameters for one card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemVisual {
    pub vertical_offset: f64,
    pub scale: f64,
    pub opacity: f64,
    /// Hidden cards must not take pointer or keyboard focus
    pub interactive: bool,
}

/// Read-only view handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollSnapshot {
    pub active_index: usize,
    pub section_visible: bool,
    pub progress: f64,
    pub items: Vec<ItemVisual>,
}

/// Scroll distance over which the whole sequence plays out.
///
/// The half-item slack keeps the last card from needing a full extra
/// viewport of scrolling to finish revealing.
pub fn total_scroll_distance(viewport_height: f64, item_count: usize) -> f64 {
    viewport_height * (item_count as f64 - 0.5)
}

/// Fraction of the reveal sequence that has played, in `[0, 1]`.
///
/// Zero until the container reaches the viewport top. Degenerate layouts
/// (no usable scroll distance) count as fully revealed so nothing downstream
/// ever sees NaN.
pub fn scroll_progress(container_top: f64, viewport_height: f64, item_count: usize) -> f64 {
    if container_top.is_nan() || container_top > 0.0 {
        return 0.0;
    }

    let total = total_scroll_distance(viewport_height, item_count);
    if total.is_nan() || total <= 0.0 {
        return 1.0;
    }

    let progress = container_top.abs() / total;
    if progress.is_nan() {
        // inf / inf
        return 1.0;
    }
    progress.clamp(0.0, 1.0)
}

/// Index of the focused card for a given progress, clamped to `[0, item_count - 1]`
pub fn active_index(progress: f64, item_count: usize) -> usize {
    let last = item_count.saturating_sub(1);
    let card_progress = progress * last as f64;
    if !card_progress.is_finite() || card_progress <= 0.0 {
        return 0;
    }
    (card_progress.floor() as usize).min(last)
}

pub fn item_visual(index: usize, active_index: usize, section_visible: bool) -> ItemVisual {
    let is_visible = section_visible && active_index >= index;
    let is_active = active_index == index;

    let vertical_offset = match (is_visible, is_active) {
        (true, true) => ACTIVE_OFFSET,
        (true, false) => STACKED_BASE_OFFSET + index as f64 * STACKED_STEP,
        (false, _) => HIDDEN_OFFSET,
    };
    let opacity = match (is_visible, is_active) {
        (true, true) => ACTIVE_OPACITY,
        (true, false) => STACKED_OPACITY,
        (false, _) => 0.0,
    };

    ItemVisual {
        vertical_offset,
        scale: BASE_SCALE + index as f64 * SCALE_STEP,
        opacity,
        interactive: is_visible,
    }
}

/// Full derivation from raw geometry to the render snapshot
pub fn derive_snapshot(
    container_top: f64,
    viewport_height: f64,
    item_count: usize,
    section_visible: bool,
) -> ScrollSnapshot {
    let progress = scroll_progress(container_top, viewport_height, item_count);
    let active = active_index(progress, item_count);
    let items = (0..item_count)
        .map(|i| item_visual(i, active, section_visible))
        .collect();

    ScrollSnapshot {
        active_index: active,
        section_visible,
        progress,
        items,
    }
}
