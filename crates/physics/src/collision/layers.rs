//! Collision layers for query filtering.
//!
//! Every brush in the world sits on exactly one layer. Queries carry a mask
//! and only see brushes whose layer intersects it.

use serde::{Deserialize, Serialize};

/// Bit set of collision layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionLayers(pub u32);

impl CollisionLayers {
    /// No layers.
    pub const NONE: Self = Self(0);

    /// Static level geometry: floors, walls, ceilings.
    pub const DEFAULT: Self = Self(1 << 0);

    /// Geometry invisible to sweeps (trigger volumes, decorations).
    pub const IGNORE_SWEEP: Self = Self(1 << 1);

    /// Player bodies.
    pub const PLAYER: Self = Self(1 << 2);

    /// Small physics props (crates, bottles).
    pub const PROP_SMALL: Self = Self(1 << 3);

    /// Medium physics props (barrels, chairs).
    pub const PROP_MEDIUM: Self = Self(1 << 4);

    /// Large physics props (cars, containers).
    pub const PROP_LARGE: Self = Self(1 << 5);

    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask used by movement sweeps: everything except sweep-ignored geometry.
    pub const MASK_SWEEP: Self = Self(!Self::IGNORE_SWEEP.0);

    /// Mask used by penetration resolution: level geometry and props.
    pub const MASK_PENETRATION: Self = Self(
        Self::DEFAULT.0 | Self::PROP_SMALL.0 | Self::PROP_MEDIUM.0 | Self::PROP_LARGE.0,
    );

    /// Check if these layers contain every layer in `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any layer is shared with `other`.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Remove layers from this set.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for CollisionLayers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for CollisionLayers {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
