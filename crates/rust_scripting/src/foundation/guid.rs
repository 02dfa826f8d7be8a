//! 128-bit identifiers for entities and assets

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Globally unique identifier, split into two 64-bit halves
///
/// `(0, 0)` is the null GUID and never refers to a live object.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Guid {
    /// High 64 bits
    pub hi: u64,
    /// Low 64 bits
    pub lo: u64,
}

impl Guid {
    /// The null GUID
    pub const NULL: Self = Self { hi: 0, lo: 0 };

    /// Create a GUID from its halves
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// The null GUID
    pub const fn null() -> Self {
        Self::NULL
    }

    /// Generate a random, non-null GUID
    pub fn generate() -> Self {
        loop {
            let guid = Self::new(rand::random(), rand::random());
            if !guid.is_null() {
                return guid;
            }
        }
    }

    /// Whether both halves are zero
    pub const fn is_null(&self) -> bool {
        self.hi == 0 && self.lo == 0
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}
