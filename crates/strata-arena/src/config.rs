//! Arena configuration parameters.

use crate::block::BLOCK_ALIGN;
use crate::error::ArenaError;

/// Configuration for the arena allocator.
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity of each arena block in bytes.
    ///
    /// Default: 262_144 (256 KiB). Must be a multiple of
    /// [`BLOCK_ALIGN`], at least [`MIN_BLOCK_SIZE`](Self::MIN_BLOCK_SIZE),
    /// and no larger than `u32::MAX`. No single allocation may exceed it.
    pub block_size: usize,
}

impl ArenaConfig {
    /// Default block size: 256 KiB.
    pub const DEFAULT_BLOCK_SIZE: usize = 256 * 1024;

    /// Smallest accepted block size.
    pub const MIN_BLOCK_SIZE: usize = 1024;

    /// Create a config with the given block size.
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.block_size < Self::MIN_BLOCK_SIZE {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "block_size {} is below the minimum of {}",
                    self.block_size,
                    Self::MIN_BLOCK_SIZE
                ),
            });
        }
        if self.block_size % BLOCK_ALIGN != 0 {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "block_size {} is not a multiple of {BLOCK_ALIGN}",
                    self.block_size
                ),
            });
        }
        if self.block_size > u32::MAX as usize {
            return Err(ArenaError::InvalidConfig {
                reason: format!("block_size {} exceeds u32::MAX", self.block_size),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}
