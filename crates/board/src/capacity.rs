//! Peripheral capacity table.
//!
//! Upper bounds on how many instances of each peripheral class this board
//! supports. Driver registration code sizes its static tables from these
//! numbers and must reject, not drop, any registration beyond them.
//!
//! | Class        | Max |
//! |--------------|-----|
//! | SPI          | 3   |
//! | I2C          | 3   |
//! | USART        | 5   |
//! | COM          | 4   |
//! | RCVR         | 3   |
//! | PPM input    | 1   |
//! | PWM input    | 1   |
//! | Spektrum     | 2   |
//! | S.Bus        | 1   |
//! | DSM          | 2   |
//! | Timer        | 6   |
//! | USB          | 1   |
//! | USB HID      | 1   |

use core::fmt;

use heapless::Vec;

use crate::error::BoardError;

/// SPI bus instances.
pub const SPI_MAX_DEVS: usize = 3;
/// I2C bus instances.
pub const I2C_MAX_DEVS: usize = 3;
/// USART/UART instances.
pub const USART_MAX_DEVS: usize = 5;
/// Communication channels layered on USART/USB.
pub const COM_MAX_DEVS: usize = 4;
/// Receiver instances (any protocol).
pub const RCVR_MAX_DEVS: usize = 3;
/// PPM receiver inputs.
pub const PPM_MAX_DEVS: usize = 1;
/// PWM receiver inputs.
pub const PWM_MAX_DEVS: usize = 1;
/// Spektrum satellite inputs.
pub const SPEKTRUM_MAX_DEVS: usize = 2;
/// S.Bus inputs.
pub const SBUS_MAX_DEVS: usize = 1;
/// DSM inputs.
pub const DSM_MAX_DEVS: usize = 2;
/// Timer controller instances.
pub const TIM_MAX_DEVS: usize = 6;
/// USB device instances.
pub const USB_MAX_DEVS: usize = 1;
/// USB HID interfaces.
pub const USB_HID_MAX_DEVS: usize = 1;

/// Peripheral classes the board declares a capacity for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralClass {
    /// SPI bus
    Spi,
    /// I2C bus
    I2c,
    /// USART/UART
    Usart,
    /// Communication channel (COM layer)
    CommChannel,
    /// Generic receiver slot
    Receiver,
    /// PPM input
    PpmInput,
    /// PWM input
    PwmInput,
    /// Spektrum satellite input
    SpektrumInput,
    /// S.Bus input
    SBusInput,
    /// DSM input
    DsmInput,
    /// Timer controller
    Timer,
    /// USB device
    Usb,
    /// USB HID interface
    UsbHid,
}

impl PeripheralClass {
    /// Every class, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Spi,
        Self::I2c,
        Self::Usart,
        Self::CommChannel,
        Self::Receiver,
        Self::PpmInput,
        Self::PwmInput,
        Self::SpektrumInput,
        Self::SBusInput,
        Self::DsmInput,
        Self::Timer,
        Self::Usb,
        Self::UsbHid,
    ];

    /// Board-specific upper bound on instances of this class.
    pub const fn max_instances(self) -> usize {
        match self {
            Self::Spi => SPI_MAX_DEVS,
            Self::I2c => I2C_MAX_DEVS,
            Self::Usart => USART_MAX_DEVS,
            Self::CommChannel => COM_MAX_DEVS,
            Self::Receiver => RCVR_MAX_DEVS,
            Self::PpmInput => PPM_MAX_DEVS,
            Self::PwmInput => PWM_MAX_DEVS,
            Self::SpektrumInput => SPEKTRUM_MAX_DEVS,
            Self::SBusInput => SBUS_MAX_DEVS,
            Self::DsmInput => DSM_MAX_DEVS,
            Self::Timer => TIM_MAX_DEVS,
            Self::Usb => USB_MAX_DEVS,
            Self::UsbHid => USB_HID_MAX_DEVS,
        }
    }

    /// Short name used in logs and the manifest dump.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spi => "SPI",
            Self::I2c => "I2C",
            Self::Usart => "USART",
            Self::CommChannel => "COM",
            Self::Receiver => "RCVR",
            Self::PpmInput => "PPM",
            Self::PwmInput => "PWM",
            Self::SpektrumInput => "SPEKTRUM",
            Self::SBusInput => "SBUS",
            Self::DsmInput => "DSM",
            Self::Timer => "TIM",
            Self::Usb => "USB",
            Self::UsbHid => "USB_HID",
        }
    }
}

impl fmt::Display for PeripheralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Every class must allow at least one instance.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: i < ALL.len()
const _: () = {
    let mut i = 0;
    while i < PeripheralClass::ALL.len() {
        assert!(
            PeripheralClass::ALL[i].max_instances() > 0,
            "capacity must be positive"
        );
        i += 1;
    }
};

/// Fixed-capacity registration table for one peripheral class.
///
/// Storage is a `heapless::Vec<T, N>`; the effective capacity is
/// `min(N, class.max_instances())`, so a table sized from the class constant
/// (see the per-class aliases below) enforces exactly the board limit.
/// Registration past the limit returns [`BoardError::CapacityExceeded`].
pub struct DeviceTable<T, const N: usize> {
    class: PeripheralClass,
    devices: Vec<T, N>,
}

impl<T, const N: usize> DeviceTable<T, N> {
    /// Create an empty table for `class`.
    pub const fn new(class: PeripheralClass) -> Self {
        Self {
            class,
            devices: Vec::new(),
        }
    }

    /// Class this table registers.
    pub const fn class(&self) -> PeripheralClass {
        self.class
    }

    /// Effective capacity: the smaller of the storage size and the board limit.
    pub const fn capacity(&self) -> usize {
        let max = self.class.max_instances();
        if N < max {
            N
        } else {
            max
        }
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Registrations still available.
    pub fn remaining(&self) -> usize {
        self.capacity().saturating_sub(self.devices.len())
    }

    /// Register one instance and return its index (the id drivers hand out).
    ///
    /// # Errors
    ///
    /// [`BoardError::CapacityExceeded`] when the table is full. The device is
    /// dropped in that case; nothing already registered is touched.
    pub fn register(&mut self, device: T) -> Result<usize, BoardError> {
        let index = self.devices.len();
        let max = self.capacity();
        let err = BoardError::CapacityExceeded {
            class: self.class,
            max,
        };
        if index >= max {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} registration rejected, board max {=usize}", self.class, max);
            return Err(err);
        }
        self.devices.push(device).map_err(|_| err)?;
        Ok(index)
    }

    /// Registered instance at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.devices.get(index)
    }

    /// Iterate over registered instances in registration order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.devices.iter()
    }
}

/// SPI driver table sized to the board limit.
pub type SpiDevices<T> = DeviceTable<T, SPI_MAX_DEVS>;
/// I2C driver table sized to the board limit.
pub type I2cDevices<T> = DeviceTable<T, I2C_MAX_DEVS>;
/// USART driver table sized to the board limit.
pub type UsartDevices<T> = DeviceTable<T, USART_MAX_DEVS>;
/// COM channel table sized to the board limit.
pub type ComDevices<T> = DeviceTable<T, COM_MAX_DEVS>;
/// Receiver table sized to the board limit.
pub type ReceiverDevices<T> = DeviceTable<T, RCVR_MAX_DEVS>;
/// Timer controller table sized to the board limit.
pub type TimerDevices<T> = DeviceTable<T, TIM_MAX_DEVS>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn spi_table_accepts_exactly_three() {
        let mut spi: SpiDevices<u8> = DeviceTable::new(PeripheralClass::Spi);
        for i in 0..3u8 {
            assert_eq!(spi.register(i).unwrap(), usize::from(i));
        }
        assert_eq!(
            spi.register(9),
            Err(BoardError::CapacityExceeded {
                class: PeripheralClass::Spi,
                max: 3
            })
        );
        assert_eq!(spi.len(), 3);
        assert_eq!(spi.get(2), Some(&2));
    }

    #[test]
    fn oversized_storage_still_enforces_board_limit() {
        let mut sbus: DeviceTable<u32, 16> = DeviceTable::new(PeripheralClass::SBusInput);
        assert_eq!(sbus.capacity(), 1);
        sbus.register(1).unwrap();
        assert!(sbus.register(2).is_err());
        assert_eq!(sbus.remaining(), 0);
    }

    #[test]
    fn undersized_storage_caps_capacity() {
        let table: DeviceTable<u32, 2> = DeviceTable::new(PeripheralClass::Usart);
        assert_eq!(table.capacity(), 2);
    }

    #[test]
    fn usart_limit_is_five() {
        assert_eq!(PeripheralClass::Usart.max_instances(), 5);
        assert_eq!(PeripheralClass::Timer.max_instances(), 6);
        assert_eq!(PeripheralClass::CommChannel.max_instances(), 4);
    }
}
