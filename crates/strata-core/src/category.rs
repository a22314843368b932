//! Queue categories and static layers.

use std::fmt;

/// Selects one render queue bin.
///
/// Categories are sorted and dispatched independently; nothing crosses a
/// category boundary unless the caller iterates over [`QueueCategory::ALL`]
/// explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum QueueCategory {
    /// Depth-tested, depth-written geometry.
    Opaque = 0,
    /// Opaque geometry that only adds emissive light.
    OpaqueEmissive = 1,
    /// Light volumes.
    Light = 2,
    /// Blended geometry, dispatched back to front.
    Transparent = 3,
}

impl QueueCategory {
    /// Number of categories (and therefore bins per queue).
    pub const COUNT: usize = 4;

    /// Every category, in bin order.
    pub const ALL: [QueueCategory; Self::COUNT] = [
        Self::Opaque,
        Self::OpaqueEmissive,
        Self::Light,
        Self::Transparent,
    ];

    /// Bin index of this category.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether keys for this category order by depth before pipeline.
    #[inline]
    pub fn is_transparent(self) -> bool {
        matches!(self, Self::Transparent)
    }
}

impl fmt::Display for QueueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Opaque => "opaque",
            Self::OpaqueEmissive => "opaque-emissive",
            Self::Light => "light",
            Self::Transparent => "transparent",
        };
        f.write_str(name)
    }
}

/// Coarse manual ordering override for non-transparent geometry.
///
/// Occupies the top two bits of an opaque sort key, so it outranks both
/// pipeline and depth. There are exactly four layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum StaticLayer {
    /// Drawn before everything else.
    Front = 0,
    /// The layer most geometry uses.
    #[default]
    Default = 1,
    /// Drawn after default geometry (e.g. skyboxes behind the scene).
    Back = 2,
    /// Drawn last.
    Last = 3,
}

impl StaticLayer {
    /// Number of layers. Must stay at 4 to fit the 2-bit key header.
    pub const COUNT: usize = 4;

    /// The layer value as it is packed into a sort key.
    #[inline]
    pub fn bits(self) -> u64 {
        self as u64
    }
}
