//! Board identity and miscellaneous settings.
//!
//! Every other module refers to these constants rather than hardcoding the
//! board name or the bootloader policy.

/// Board name.
pub const BOARD_NAME: &str = "revoproto";

/// Hardware revision of the prototype.
pub const BOARD_REVISION: u8 = 1;

/// Board-support crate version (synchronized with Cargo.toml)
pub const BOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bootloader access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootloaderSettings {
    /// Flash can be read back over the bootloader.
    pub readable: bool,
    /// Flash can be written through the bootloader.
    pub writable: bool,
    /// Sector erase attempts before giving up.
    pub max_delete_retries: u8,
}

/// Bootloader settings for this board.
pub const BOOTLOADER: BootloaderSettings = BootloaderSettings {
    readable: true,
    writable: true,
    max_delete_retries: 3,
};

/// Status LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Led {
    /// Blinks while the scheduler runs.
    Heartbeat = 0,
    /// Lit on alarms.
    Alarm = 1,
}

impl Led {
    /// LED index as passed to the LED driver.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Telemetry event queue depth.
pub const TELEM_QUEUE_SIZE: usize = 80;

/// Telemetry task stack size in bytes.
pub const TELEM_STACK_SIZE: usize = 800;

/// USB device support is built in.
pub const USB_ENABLED: bool = true;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_identity() {
        assert_eq!(BOARD_NAME, "revoproto");
        assert!(!BOARD_VERSION.is_empty());
    }

    #[test]
    fn bootloader_policy() {
        assert!(BOOTLOADER.readable && BOOTLOADER.writable);
        assert_eq!(BOOTLOADER.max_delete_retries, 3);
    }

    #[test]
    fn led_indices() {
        assert_eq!(Led::Heartbeat.index(), 0);
        assert_eq!(Led::Alarm.index(), 1);
    }
}
