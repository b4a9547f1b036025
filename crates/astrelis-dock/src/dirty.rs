//! Conflated layout work for a dock panel.

use bitflags::bitflags;

bitflags! {
    /// Layout passes requested since the last flush.
    ///
    /// Any number of requests collapse into at most one pass of each kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PendingWork: u8 {
        const NONE   = 0b00;
        /// Limits changed; re-run fit before the next update.
        const FIT    = 0b01;
        /// Geometry must be recomputed.
        const UPDATE = 0b10;
    }
}

impl PendingWork {
    /// A fit always implies an update.
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.intersects(Self::FIT | Self::UPDATE)
    }

    #[inline]
    pub fn needs_fit(&self) -> bool {
        self.contains(Self::FIT)
    }
}
