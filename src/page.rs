// Virtual page the demo scrolls through: a hero block, the pinned card
// section and a footer. Keeps a [`SharedGeometry`] in sync so the scroll
// controller can read it as if it were measuring a real layout.

use crate::geometry::{Geometry, SharedGeometry};

/// Pixels represented by one terminal row
pub const ROW_PX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub viewport_height: f64,
    pub hero_height: f64,
    pub footer_height: f64,
    pub item_count: usize,
}

impl PageLayout {
    pub fn new(viewport_height: f64, item_count: usize) -> Self {
        Self {
            viewport_height,
            hero_height: viewport_height * 0.6,
            footer_height: viewport_height * 0.5,
            item_count,
        }
    }

    /// Outer section height: the pinned viewport plus the scroll distance
    /// over which the cards reveal.
    pub fn section_height(&self) -> f64 {
        self.viewport_height * (self.item_count as f64 + 0.5)
    }

    pub fn page_height(&self) -> f64 {
        self.hero_height + self.section_height() + self.footer_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.page_height() - self.viewport_height).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct VirtualPage {
    layout: PageLayout,
    scroll_y: f64,
    geometry: SharedGeometry,
}

impl VirtualPage {
    pub fn new(layout: PageLayout) -> Self {
        let page = Self {
            layout,
            scroll_y: 0.0,
            geometry: SharedGeometry::default(),
        };
        page.sync();
        page
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Handle the scroll controller should read from
    pub fn geometry(&self) -> SharedGeometry {
        self.geometry.clone()
    }

    pub fn container_top(&self) -> f64 {
        self.layout.hero_height - self.scroll_y
    }

    /// Returns whether the position actually moved
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.scroll_to(self.scroll_y + delta)
    }

    pub fn scroll_to(&mut self, y: f64) -> bool {
        let clamped = y.clamp(0.0, self.layout.max_scroll());
        if clamped == self.scroll_y {
            return false;
        }
        self.scroll_y = clamped;
        self.sync();
        true
    }

    pub fn scroll_to_end(&mut self) -> bool {
        self.scroll_to(self.layout.max_scroll())
    }

    pub fn resize(&mut self, viewport_height: f64) {
        let item_count = self.layout.item_count;
        self.layout = PageLayout::new(viewport_height.max(0.0), item_count);
        self.scroll_y = self.scroll_y.clamp(0.0, self.layout.max_scroll());
        self.sync();
    }

    /// Top of the sticky inner panel relative to the viewport. It follows the
    /// section until the section top reaches the viewport top, stays pinned,
    /// then leaves with the section bottom.
    pub fn pinned_top(&self) -> f64 {
        let top = self.container_top();
        let bottom_bound = top + self.layout.section_height() - self.layout.viewport_height;
        top.max(bottom_bound.min(0.0))
    }

    /// Fraction of the pinned panel inside the viewport, in `[0, 1]`
    pub fn visible_ratio(&self) -> f64 {
        let vh = self.layout.viewport_height;
        if vh <= 0.0 {
            return 0.0;
        }
        let top = self.pinned_top();
        let overlap = (top + vh).min(vh) - top.max(0.0);
        (overlap / vh).clamp(0.0, 1.0)
    }

    fn sync(&self) {
        self.geometry
            .set(Geometry::new(self.layout.viewport_height, self.container_top()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryProvider;

    fn page() -> VirtualPage {
        VirtualPage::new(PageLayout::new(1000.0, 3))
    }

    #[test]
    fn layout_sizes() {
        let l = PageLayout::new(1000.0, 3);
        assert_eq!(l.section_height(), 3500.0);
        assert_eq!(l.page_height(), 600.0 + 3500.0 + 500.0);
        assert_eq!(l.max_scroll(), 3600.0);
    }

    #[test]
    fn scrolling_moves_the_container_and_clamps() {
        let mut p = page();
        let g = p.geometry();
        assert_eq!(g.container_top(), 600.0);

        assert!(p.scroll_by(1850.0));
        assert_eq!(g.container_top(), -1250.0);

        assert!(p.scroll_by(-5000.0));
        assert_eq!(p.scroll_y(), 0.0);
        assert!(!p.scroll_by(-1.0));

        p.scroll_to_end();
        assert_eq!(p.scroll_y(), 3600.0);
    }

    #[test]
    fn pinned_panel_visibility() {
        let mut p = page();
        // panel starts 600px down: 40% visible
        assert!((p.visible_ratio() - 0.4).abs() < 1e-9);

        p.scroll_to(600.0);
        assert_eq!(p.pinned_top(), 0.0);
        assert_eq!(p.visible_ratio(), 1.0);

        p.scroll_to(2000.0);
        assert_eq!(p.pinned_top(), 0.0);

        p.scroll_to_end();
        // section bottom is 500px above the viewport bottom
        assert_eq!(p.pinned_top(), -500.0);
        assert!((p.visible_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn resize_updates_geometry() {
        let mut p = page();
        p.resize(400.0);
        assert_eq!(p.geometry().viewport_height(), 400.0);
        assert_eq!(p.layout().hero_height, 240.0);
    }
}
