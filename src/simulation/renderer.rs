//! Interface between the scheduler and whatever draws the intersection

use super::snapshot::Snapshot;

/// Consumer of state snapshots. Implementations never see the lock.
pub trait Renderer: Send {
    fn render(&mut self, snapshot: &Snapshot);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: &Snapshot) {
        (**self).render(snapshot);
    }
}
