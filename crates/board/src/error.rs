//! Errors surfaced to the consumers of the board manifest.
//!
//! The manifest itself never fails; these are the conditions a driver
//! registration table or the bring-up routine reports when it would
//! violate one of the board's declared limits.

use thiserror_no_std::Error;

use crate::adapters::{AdapterRole, PhysicalAdapter};
use crate::capacity::PeripheralClass;

/// Board resource errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// A driver tried to register more instances of a class than the board allows.
    #[error("{class} capacity exceeded: board supports at most {max}")]
    CapacityExceeded {
        /// Peripheral class whose table is full.
        class: PeripheralClass,
        /// Effective capacity of the table.
        max: usize,
    },

    /// Bring-up wrote an identity slot twice.
    #[error("adapter {0} is already bound")]
    AlreadyBound(PhysicalAdapter),

    /// A role was resolved but bring-up never bound its physical adapter.
    #[error("role {role} resolves to unbound adapter {adapter}")]
    Unbound {
        /// Role that was requested.
        role: AdapterRole,
        /// Physical adapter the role aliases.
        adapter: PhysicalAdapter,
    },

    /// The adapter snapshot was already published.
    #[error("board adapters already installed")]
    AlreadyInstalled,

    /// Logical ADC index outside the channel map.
    #[error("ADC index {index} out of range (map has {len} entries)")]
    InvalidAdcIndex {
        /// Requested logical index.
        index: usize,
        /// Number of entries in the map.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_error_names_the_class() {
        let err = BoardError::CapacityExceeded {
            class: PeripheralClass::Spi,
            max: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains("SPI"), "got: {msg}");
        assert!(msg.contains('3'), "got: {msg}");
    }

    #[test]
    fn unbound_error_names_role_and_adapter() {
        let err = BoardError::Unbound {
            role: AdapterRole::Etasv3,
            adapter: PhysicalAdapter::I2cFlexiport,
        };
        let msg = format!("{err}");
        assert!(msg.contains("ETASV3"), "got: {msg}");
        assert!(msg.contains("flexiport"), "got: {msg}");
    }
}
