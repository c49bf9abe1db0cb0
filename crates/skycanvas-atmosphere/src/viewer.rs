//! Viewer pose providers.

use std::cell::RefCell;

use glam::Vec3;

/// Reports where the local viewer's head is, when it is being tracked.
pub trait PoseProvider {
    /// Whether a tracked viewer session currently exists.
    fn is_valid(&self) -> bool;

    /// World-space head position. Only meaningful when [`is_valid`](Self::is_valid).
    fn head_position(&self) -> Vec3;
}

impl<T: PoseProvider + ?Sized> PoseProvider for RefCell<T> {
    fn is_valid(&self) -> bool {
        self.borrow().is_valid()
    }

    fn head_position(&self) -> Vec3 {
        self.borrow().head_position()
    }
}

/// A viewer whose head position is pushed in by the host.
///
/// Starts untracked.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackedViewer {
    head: Option<Vec3>,
}

impl TrackedViewer {
    /// A viewer already tracked at `head`.
    pub fn tracked(head: Vec3) -> Self {
        Self { head: Some(head) }
    }

    /// Record a new head position and mark the viewer tracked.
    pub fn set_head_position(&mut self, head: Vec3) {
        self.head = Some(head);
    }

    /// Drop tracking, e.g. when the session ends.
    pub fn lose_tracking(&mut self) {
        self.head = None;
    }
}

impl PoseProvider for TrackedViewer {
    fn is_valid(&self) -> bool {
        self.head.is_some()
    }

    fn head_position(&self) -> Vec3 {
        self.head.unwrap_or(Vec3::ZERO)
    }
}
