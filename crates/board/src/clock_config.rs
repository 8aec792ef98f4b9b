//! Clock tree derivation for the STM32F4 on this board.
//!
//! Everything downstream of the system clock is computed from [`SYSCLK_HZ`]
//! and the two APB prescalers, so changing a prescaler here is the only edit
//! needed. Each bus has two clocks:
//!
//! - the bus clock (PCLK), which feeds USART, SPI, I2C and ADC:
//!   [`PCLK1_HZ`] / [`PCLK2_HZ`], [`ApbBus::pclk_hz`];
//! - the timer clock, which feeds the TIMx kernels:
//!   [`PERIPHERAL_APB1_CLOCK_HZ`] / [`PERIPHERAL_APB2_CLOCK_HZ`],
//!   [`ApbBus::timer_clock_hz`].
//!
//! # Derivation
//!
//! ```text
//! pclk  = SYSCLK / prescaler
//! timer = pclk * (prescaler == 1 ? 1 : 2)
//!
//! APB1: prescaler 4 → pclk  42 MHz, timer  84 MHz  (SYSCLK / 2)
//! APB2: prescaler 2 → pclk  84 MHz, timer 168 MHz  (SYSCLK)
//! ```
//!
//! The ×2 is the timer clock multiplier the RCC applies whenever the APB
//! prescaler is not 1 (RM0090 §6.2, "timer clock frequencies"). It does not
//! apply to any other peripheral on the bus.
//!
//! # Sources
//!
//! - STM32F405/407 Reference Manual (RM0090): §6.2 clock tree, Table 1
//!   (bus/peripheral mapping).
//! - `system_stm32f4xx.c` for the board: SYSCLK 168 MHz, PPRE1 = /4, PPRE2 = /2.

/// System clock in Hz.
pub const SYSCLK_HZ: u32 = 168_000_000;

/// APB prescaler settings available in RCC_CFGR.PPRE1/PPRE2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApbPrescaler {
    /// AHB clock not divided.
    Div1,
    /// AHB clock divided by 2.
    Div2,
    /// AHB clock divided by 4.
    Div4,
    /// AHB clock divided by 8.
    Div8,
    /// AHB clock divided by 16.
    Div16,
}

impl ApbPrescaler {
    /// Division factor.
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div2 => 2,
            Self::Div4 => 4,
            Self::Div8 => 8,
            Self::Div16 => 16,
        }
    }

    /// Timer clock multiplier: 1 when undivided, otherwise 2.
    pub const fn timer_multiplier(self) -> u32 {
        match self {
            Self::Div1 => 1,
            _ => 2,
        }
    }
}

/// APB1 prescaler programmed at boot.
pub const APB1_PRESCALER: ApbPrescaler = ApbPrescaler::Div4;

/// APB2 prescaler programmed at boot.
pub const APB2_PRESCALER: ApbPrescaler = ApbPrescaler::Div2;

/// Bus clock (PCLK) derived from a system clock and an APB prescaler.
#[allow(clippy::arithmetic_side_effects)] // Safety: divisor >= 1
pub const fn apb_bus_clock(sysclk: u32, prescaler: ApbPrescaler) -> u32 {
    sysclk / prescaler.divisor()
}

/// Timer clock derived from a system clock and an APB prescaler.
///
/// Divides first so the intermediate never exceeds `sysclk`.
#[allow(clippy::arithmetic_side_effects)] // Safety: divisor >= 1; result <= sysclk
pub const fn apb_peripheral_clock(sysclk: u32, prescaler: ApbPrescaler) -> u32 {
    apb_bus_clock(sysclk, prescaler) * prescaler.timer_multiplier()
}

/// APB1 bus clock (I2C, UART4/5, USART2/3, SPI2/3).
pub const PCLK1_HZ: u32 = apb_bus_clock(SYSCLK_HZ, APB1_PRESCALER);

/// APB2 bus clock (SPI1, ADC, USART1/6).
pub const PCLK2_HZ: u32 = apb_bus_clock(SYSCLK_HZ, APB2_PRESCALER);

/// APB1 timer clock (TIM2..7, TIM12..14).
pub const PERIPHERAL_APB1_CLOCK_HZ: u32 = apb_peripheral_clock(SYSCLK_HZ, APB1_PRESCALER);

/// APB2 timer clock (TIM1, TIM8..11).
pub const PERIPHERAL_APB2_CLOCK_HZ: u32 = apb_peripheral_clock(SYSCLK_HZ, APB2_PRESCALER);

/// The derived clocks for one system clock value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTree {
    /// System clock in Hz.
    pub sysclk_hz: u32,
    /// APB1 bus clock (PCLK1) in Hz.
    pub pclk1_hz: u32,
    /// APB2 bus clock (PCLK2) in Hz.
    pub pclk2_hz: u32,
    /// APB1 timer clock in Hz.
    pub apb1_hz: u32,
    /// APB2 timer clock in Hz.
    pub apb2_hz: u32,
}

impl ClockTree {
    /// Derive the bus and timer clocks from `sysclk_hz` using the board
    /// prescalers.
    pub const fn derive(sysclk_hz: u32) -> Self {
        Self {
            sysclk_hz,
            pclk1_hz: apb_bus_clock(sysclk_hz, APB1_PRESCALER),
            pclk2_hz: apb_bus_clock(sysclk_hz, APB2_PRESCALER),
            apb1_hz: apb_peripheral_clock(sysclk_hz, APB1_PRESCALER),
            apb2_hz: apb_peripheral_clock(sysclk_hz, APB2_PRESCALER),
        }
    }

    /// The board's clock tree at [`SYSCLK_HZ`].
    pub const fn board() -> Self {
        Self::derive(SYSCLK_HZ)
    }
}

/// Peripheral buses on the STM32F4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApbBus {
    /// Low-speed peripheral bus.
    Apb1,
    /// High-speed peripheral bus.
    Apb2,
}

impl ApbBus {
    /// Bus clock (PCLK) on the board.
    pub const fn pclk_hz(self) -> u32 {
        match self {
            Self::Apb1 => PCLK1_HZ,
            Self::Apb2 => PCLK2_HZ,
        }
    }

    /// Timer clock on the board.
    pub const fn timer_clock_hz(self) -> u32 {
        match self {
            Self::Apb1 => PERIPHERAL_APB1_CLOCK_HZ,
            Self::Apb2 => PERIPHERAL_APB2_CLOCK_HZ,
        }
    }
}

/// A peripheral and the bus that clocks it.
pub struct BusAssignment {
    /// Peripheral name as in the reference manual (e.g. `"SPI1"`).
    pub peripheral: &'static str,
    /// Bus the peripheral sits on.
    pub bus: ApbBus,
}

/// Bus membership of the peripherals this board uses or documents.
///
/// Source: RM0090 Table 1 (STM32F4 register boundary addresses).
pub const APB_BUS_ASSIGNMENTS: &[BusAssignment] = &[
    // ── APB1 ──────────────────────────────────────────────────────────────────
    BusAssignment { peripheral: "DAC", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "PWR", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "CAN1", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "CAN2", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "I2C1", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "I2C2", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "I2C3", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "UART4", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "UART5", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "USART2", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "USART3", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "I2S2ext", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "I2S3ext", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "SPI2", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "SPI3", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "IWDG", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "WWDG", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "RTC", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM2", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM3", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM4", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM5", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM6", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM7", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM12", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM13", bus: ApbBus::Apb1 },
    BusAssignment { peripheral: "TIM14", bus: ApbBus::Apb1 },
    // ── APB2 ──────────────────────────────────────────────────────────────────
    BusAssignment { peripheral: "SDIO", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "EXTI", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "SYSCFG", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "SPI1", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "ADC1", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "ADC2", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "ADC3", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "USART1", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "USART6", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "TIM1", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "TIM8", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "TIM9", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "TIM10", bus: ApbBus::Apb2 },
    BusAssignment { peripheral: "TIM11", bus: ApbBus::Apb2 },
];

/// Bus that clocks `peripheral`, if the table lists it.
pub fn bus_for(peripheral: &str) -> Option<ApbBus> {
    APB_BUS_ASSIGNMENTS
        .iter()
        .find(|a| a.peripheral == peripheral)
        .map(|a| a.bus)
}

/// Kernel clock of `peripheral`, if the table lists it: the timer clock for
/// `TIMx`, the bus clock for everything else.
pub fn peripheral_clock_hz(peripheral: &str) -> Option<u32> {
    let bus = bus_for(peripheral)?;
    if peripheral.starts_with("TIM") {
        Some(bus.timer_clock_hz())
    } else {
        Some(bus.pclk_hz())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    /// 168 MHz system clock gives 84 MHz APB1 and 168 MHz APB2 timers.
    #[test]
    fn board_clocks_at_168mhz() {
        assert_eq!(PERIPHERAL_APB1_CLOCK_HZ, 84_000_000);
        assert_eq!(PERIPHERAL_APB2_CLOCK_HZ, 168_000_000);
    }

    /// The bus clocks are the plain prescaler division, without the timer ×2.
    #[test]
    fn bus_clocks_at_168mhz() {
        assert_eq!(PCLK1_HZ, 42_000_000);
        assert_eq!(PCLK2_HZ, 84_000_000);
        assert_eq!(PCLK1_HZ, SYSCLK_HZ / APB1_PRESCALER.divisor());
        assert_eq!(ApbBus::Apb1.pclk_hz() * 2, ApbBus::Apb1.timer_clock_hz());
    }

    /// APB1 is half the system clock and APB2 equals it for this board's
    /// prescaler pair.
    #[test]
    fn board_clock_ratios() {
        assert_eq!(PERIPHERAL_APB1_CLOCK_HZ, SYSCLK_HZ / 2);
        assert_eq!(PERIPHERAL_APB2_CLOCK_HZ, SYSCLK_HZ);
    }

    #[test]
    fn undivided_bus_has_no_multiplier() {
        assert_eq!(apb_peripheral_clock(16_000_000, ApbPrescaler::Div1), 16_000_000);
        assert_eq!(apb_peripheral_clock(168_000_000, ApbPrescaler::Div8), 42_000_000);
    }

    #[test]
    fn clock_tree_board_matches_constants() {
        let tree = ClockTree::board();
        assert_eq!(tree.sysclk_hz, SYSCLK_HZ);
        assert_eq!(tree.pclk1_hz, PCLK1_HZ);
        assert_eq!(tree.pclk2_hz, PCLK2_HZ);
        assert_eq!(tree.apb1_hz, PERIPHERAL_APB1_CLOCK_HZ);
        assert_eq!(tree.apb2_hz, PERIPHERAL_APB2_CLOCK_HZ);
    }

    /// SPI1 (gyro) and SPI2 (accel) sit on different buses.
    #[test]
    fn sensor_spi_buses() {
        assert_eq!(bus_for("SPI1"), Some(ApbBus::Apb2));
        assert_eq!(bus_for("SPI2"), Some(ApbBus::Apb1));
        assert_eq!(peripheral_clock_hz("ADC1"), Some(84_000_000));
        assert_eq!(peripheral_clock_hz("SPI2"), Some(42_000_000));
        assert_eq!(peripheral_clock_hz("TIM1"), Some(168_000_000));
        assert_eq!(peripheral_clock_hz("TIM3"), Some(84_000_000));
        assert_eq!(bus_for("QUADSPI"), None);
    }

    #[test]
    fn no_peripheral_listed_twice() {
        for (i, a) in APB_BUS_ASSIGNMENTS.iter().enumerate() {
            let dupes = APB_BUS_ASSIGNMENTS
                .iter()
                .skip(i + 1)
                .filter(|b| b.peripheral == a.peripheral)
                .count();
            assert_eq!(dupes, 0, "{} listed twice", a.peripheral);
        }
    }
}
