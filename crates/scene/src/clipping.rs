use std::cell::Cell;
use std::rc::Rc;

use crate::visibility::Plane;

/// A clipping plane shared by identity.
///
/// Cloning the handle shares the same plane; `set` on any clone is observed
/// by all of them. Materials hold clones, the clipping controller owns the
/// original.
#[derive(Debug, Clone)]
pub struct SharedClipPlane(Rc<Cell<Plane>>);

impl SharedClipPlane {
    pub fn new(plane: Plane) -> Self {
        Self(Rc::new(Cell::new(plane)))
    }

    pub fn get(&self) -> Plane {
        self.0.get()
    }

    pub fn set(&self, plane: Plane) {
        self.0.set(plane);
    }

    /// True if both handles refer to the same plane instance.
    pub fn ptr_eq(&self, other: &SharedClipPlane) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this plane (owner included).
    pub fn share_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}
