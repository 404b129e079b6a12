// Layout measurement seam between the controller and whatever renders the page.

use std::sync::{Arc, RwLock};

/// Snapshot of the two measurements the scroll controller reads
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// Viewport height in pixels
    pub viewport_height: f64,
    /// Top edge of the tracked container relative to the viewport top.
    /// Goes negative once the container has scrolled past the top.
    pub container_top: f64,
}

impl Geometry {
    pub fn new(viewport_height: f64, container_top: f64) -> Self {
        Self {
            viewport_height,
            container_top,
        }
    }
}

/// Source of live layout measurements, read on every recompute
pub trait GeometryProvider {
    fn viewport_height(&self) -> f64;
    fn container_top(&self) -> f64;

    fn measure(&self) -> Geometry {
        Geometry::new(self.viewport_height(), self.container_top())
    }
}

impl GeometryProvider for Geometry {
    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn container_top(&self) -> f64 {
        self.container_top
    }
}

/// Cloneable handle over a geometry value that the host keeps updating
/// while the controller holds another clone for reading.
#[derive(Debug, Clone, Default)]
pub struct SharedGeometry {
    inner: Arc<RwLock<Geometry>>,
}

impl SharedGeometry {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(geometry)),
        }
    }

    pub fn get(&self) -> Geometry {
        match self.inner.read() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, geometry: Geometry) {
        match self.inner.write() {
            Ok(mut g) => *g = geometry,
            Err(poisoned) => *poisoned.into_inner() = geometry,
        }
    }

    pub fn set_container_top(&self, container_top: f64) {
        let mut g = self.get();
        g.container_top = container_top;
        self.set(g);
    }

    pub fn set_viewport_height(&self, viewport_height: f64) {
        let mut g = self.get();
        g.viewport_height = viewport_height;
        self.set(g);
    }
}

impl GeometryProvider for SharedGeometry {
    fn viewport_height(&self) -> f64 {
        self.get().viewport_height
    }

    fn container_top(&self) -> f64 {
        self.get().container_top
    }

    fn measure(&self) -> Geometry {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_geometry_clones_observe_updates() {
        let host = SharedGeometry::new(Geometry::new(800.0, 120.0));
        let reader = host.clone();

        host.set_container_top(-40.0);
        assert_eq!(reader.container_top(), -40.0);
        assert_eq!(reader.viewport_height(), 800.0);

        host.set_viewport_height(600.0);
        assert_eq!(reader.measure(), Geometry::new(600.0, -40.0));
    }

    #[test]
    fn plain_geometry_is_its_own_provider() {
        let g = Geometry::new(1000.0, -250.0);
        assert_eq!(g.measure(), g);
    }
}
