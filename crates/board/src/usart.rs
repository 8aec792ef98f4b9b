//! USART instances and the S.Bus inverter.
//!
//! S.Bus is an inverted serial signal. On this board UART4 sits behind a
//! hardware inverter controlled by PC3; the receiver driver drives the pin
//! to [`UsartInverter::enable`] before opening the port for S.Bus.

use core::fmt;

use crate::clock_config::ApbBus;
use crate::gpio::{GpioPin, GpioPort, PinState};

/// USART/UART peripherals on the STM32F405.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsartPort {
    /// USART1
    Usart1,
    /// USART2
    Usart2,
    /// USART3
    Usart3,
    /// UART4
    Uart4,
    /// UART5
    Uart5,
    /// USART6
    Usart6,
}

impl UsartPort {
    /// Every instance.
    pub const ALL: [Self; 6] = [
        Self::Usart1,
        Self::Usart2,
        Self::Usart3,
        Self::Uart4,
        Self::Uart5,
        Self::Usart6,
    ];

    /// Reference-manual name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Usart1 => "USART1",
            Self::Usart2 => "USART2",
            Self::Usart3 => "USART3",
            Self::Uart4 => "UART4",
            Self::Uart5 => "UART5",
            Self::Usart6 => "USART6",
        }
    }

    /// Bus clocking this instance (USART1/6 on APB2, the rest on APB1).
    pub const fn bus(self) -> ApbBus {
        match self {
            Self::Usart1 | Self::Usart6 => ApbBus::Apb2,
            Self::Usart2 | Self::Usart3 | Self::Uart4 | Self::Uart5 => ApbBus::Apb1,
        }
    }

    /// Baud-rate generator input clock in Hz: the bus clock, since the
    /// timer ×2 does not reach the USARTs.
    pub const fn kernel_clock_hz(self) -> u32 {
        self.bus().pclk_hz()
    }
}

impl fmt::Display for UsartPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signal inverter in front of a USART.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsartInverter {
    /// USART whose RX line passes through the inverter.
    pub port: UsartPort,
    /// Control pin.
    pub pin: GpioPin,
    /// Pin level that enables inversion.
    pub enable: PinState,
    /// Pin level that disables inversion.
    pub disable: PinState,
}

impl UsartInverter {
    /// Control-pin level for the requested inverter state.
    pub const fn level(&self, enabled: bool) -> PinState {
        if enabled {
            self.enable
        } else {
            self.disable
        }
    }
}

/// S.Bus inverter: UART4, PC3, active high.
pub const SBUS_INVERTER: UsartInverter = UsartInverter {
    port: UsartPort::Uart4,
    pin: GpioPin::new(GpioPort::C, 3),
    enable: PinState::High,
    disable: PinState::Low,
};
