//! Mock implementations for testing
//!
//! Host-side stand-ins for the firmware's bring-up collaborators, for use in
//! unit and integration tests.

#![cfg(any(test, feature = "std"))]

use crate::adapters::{AdapterId, BusInit, PhysicalAdapter};
use crate::error::BoardError;

/// Error reported by [`MockBusInit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBusError {
    /// Board-level error while binding.
    Board(BoardError),
    /// Injected bus fault.
    Fault(PhysicalAdapter),
}

impl From<BoardError> for MockBusError {
    fn from(err: BoardError) -> Self {
        Self::Board(err)
    }
}

/// Mock bus bring-up.
///
/// Hands out sequential identities starting at `first_id`, in the order the
/// adapters are initialised. Adapters can be skipped (left unbound) or made
/// to fail.
pub struct MockBusInit {
    next_id: u32,
    skipped: heapless::Vec<PhysicalAdapter, { PhysicalAdapter::COUNT }>,
    failing: Option<PhysicalAdapter>,
    initialised: heapless::Vec<PhysicalAdapter, { PhysicalAdapter::COUNT }>,
}

impl MockBusInit {
    /// Create mock handing out ids from `first_id`.
    pub fn new(first_id: u32) -> Self {
        Self {
            next_id: first_id,
            skipped: heapless::Vec::new(),
            failing: None,
            initialised: heapless::Vec::new(),
        }
    }

    /// Leave `adapter` unbound.
    #[must_use]
    pub fn skip(mut self, adapter: PhysicalAdapter) -> Self {
        if !self.skipped.contains(&adapter) {
            // Capacity is the adapter count, so a distinct adapter always fits.
            let _ = self.skipped.push(adapter);
        }
        self
    }

    /// Fail when `adapter` is initialised.
    #[must_use]
    pub fn fail_on(mut self, adapter: PhysicalAdapter) -> Self {
        self.failing = Some(adapter);
        self
    }

    /// Adapters `init_bus` configured successfully, in call order.
    pub fn initialised(&self) -> &[PhysicalAdapter] {
        &self.initialised
    }
}

impl Default for MockBusInit {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BusInit for MockBusInit {
    type Error = MockBusError;

    fn init_bus(&mut self, adapter: PhysicalAdapter) -> Result<Option<AdapterId>, Self::Error> {
        if self.failing == Some(adapter) {
            return Err(MockBusError::Fault(adapter));
        }
        if self.skipped.contains(&adapter) {
            return Ok(None);
        }
        let id = AdapterId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.initialised.push(adapter);
        Ok(Some(id))
    }
}
