//! GPIO pin identities used by the board tables.
//!
//! These are plain identifiers (port letter + pin number), not live pins.
//! Drivers turn them into HAL pins when they configure the hardware.

use core::fmt;

/// GPIO port on the STM32F4 (`GPIOA`..`GPIOI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioPort {
    /// GPIOA
    A,
    /// GPIOB
    B,
    /// GPIOC
    C,
    /// GPIOD
    D,
    /// GPIOE
    E,
    /// GPIOF
    F,
    /// GPIOG
    G,
    /// GPIOH
    H,
    /// GPIOI
    I,
}

impl GpioPort {
    /// Port letter as used in the reference manual (`'A'`..`'I'`).
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::G => 'G',
            Self::H => 'H',
            Self::I => 'I',
        }
    }
}

/// One physical pin: port plus pin number 0..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPin {
    port: GpioPort,
    pin: u8,
}

impl GpioPin {
    /// Highest pin number on a 16-bit port.
    pub const MAX_PIN: u8 = 15;

    /// Create a pin identity.
    ///
    /// # Panics
    ///
    /// If `pin > 15`. In a `const` item this is a build error instead; use
    /// [`Self::try_new`] for pin numbers not known at build time.
    pub const fn new(port: GpioPort, pin: u8) -> Self {
        assert!(pin <= Self::MAX_PIN, "GPIO pin number out of range");
        Self { port, pin }
    }

    /// Create a pin identity, or `None` if `pin > 15`.
    pub const fn try_new(port: GpioPort, pin: u8) -> Option<Self> {
        if pin <= Self::MAX_PIN {
            Some(Self { port, pin })
        } else {
            None
        }
    }

    /// Port the pin belongs to.
    pub const fn port(self) -> GpioPort {
        self.port
    }

    /// Pin number within the port (0..=15).
    pub const fn pin(self) -> u8 {
        self.pin
    }

    /// Single-bit mask for the port's BSRR/IDR registers (`GPIO_Pin_n`).
    pub const fn mask(self) -> u16 {
        match 1u16.checked_shl(self.pin as u32) {
            Some(mask) => mask,
            None => 0,
        }
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.pin)
    }
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1, `Bit_SET`)
    High,
    /// Low (logic 0, `Bit_RESET`)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}
