//! Render queue configuration.

use strata_arena::ArenaConfig;

use crate::error::QueueError;
use crate::info::DrawId;

/// Configuration for a [`RenderQueue`](crate::RenderQueue).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Arena backing descriptors' payloads and the bins' id arrays.
    pub arena: ArenaConfig,

    /// Entries in a bin's first id array.
    ///
    /// Default: 64. Bins double from here when full. The array must fit
    /// in one arena block, and so must every doubling of it: a bin holds
    /// at most roughly `block_size / 4` entries.
    pub initial_bin_capacity: usize,
}

impl QueueConfig {
    /// Default initial bin capacity.
    pub const DEFAULT_INITIAL_BIN_CAPACITY: usize = 64;

    /// Check the structural invariants, including the arena's.
    pub fn validate(&self) -> Result<(), QueueError> {
        self.arena.validate()?;
        if self.initial_bin_capacity == 0 {
            return Err(QueueError::InvalidConfig {
                reason: "initial_bin_capacity must be at least 1".into(),
            });
        }
        let bytes = self
            .initial_bin_capacity
            .saturating_mul(std::mem::size_of::<DrawId>())
            .saturating_add(std::mem::align_of::<DrawId>());
        if bytes > self.arena.block_size {
            return Err(QueueError::InvalidConfig {
                reason: format!(
                    "initial_bin_capacity {} does not fit in a {} byte block",
                    self.initial_bin_capacity, self.arena.block_size
                ),
            });
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            initial_bin_capacity: Self::DEFAULT_INITIAL_BIN_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_arena::ArenaError;

    #[test]
    fn default_is_valid() {
        let config = QueueConfig::default();
        assert_eq!(config.initial_bin_capacity, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = QueueConfig {
            initial_bin_capacity: 0,
            ..QueueConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QueueError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn capacity_must_fit_one_block() {
        let config = QueueConfig {
            arena: ArenaConfig::new(1024),
            initial_bin_capacity: 255,
        };
        assert!(config.validate().is_ok());

        let config = QueueConfig {
            arena: ArenaConfig::new(1024),
            initial_bin_capacity: 256,
        };
        assert!(matches!(
            config.validate(),
            Err(QueueError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn arena_errors_surface() {
        let config = QueueConfig {
            arena: ArenaConfig::new(100),
            initial_bin_capacity: 4,
        };
        assert!(matches!(
            config.validate(),
            Err(QueueError::Arena(ArenaError::InvalidConfig { .. }))
        ));
    }
}
