//! Interrupt priority bands.
//!
//! Lower numeric value = higher priority (Cortex-M NVIC). The STM32F4
//! implements 4 priority bits, so the value sits in the top nibble of the
//! 8-bit priority register.
//!
//! | Band    | Value | Used by                               | vs. RTOS       |
//! |---------|-------|---------------------------------------|----------------|
//! | HIGHEST | 4     | USART (byte arrival at line rate)     | above          |
//! | HIGH    | 5     | SPI, ADC, I2C                         | above          |
//! | MID     | 8     | general peripherals                   | above          |
//! | LOW     | 12    | delay / timing services               | below          |
//!
//! The RTOS kernel masks interrupts at [`RTOS_MAX_SYSCALL_PRIORITY`]. Timing
//! interrupts stay below it so they never preempt the scheduler; the bands
//! above it are serviced even inside kernel critical sections and must not
//! call blocking RTOS services.

/// Number of priority bits the STM32F4 NVIC implements.
pub const NVIC_PRIO_BITS: u8 = 4;

/// RTOS kernel interrupt masking level (numeric, same scale as the bands).
pub const RTOS_MAX_SYSCALL_PRIORITY: u8 = 11;

/// Interrupt priority band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IrqPriority {
    /// USART and other line-rate receivers.
    Highest = 4,
    /// SPI, ADC, I2C.
    High = 5,
    /// Peripherals serviced above the RTOS.
    Mid = 8,
    /// Delay and timing services, below the RTOS.
    Low = 12,
}

impl IrqPriority {
    /// Bands from most to least urgent.
    pub const ALL: [Self; 4] = [Self::Highest, Self::High, Self::Mid, Self::Low];

    /// Numeric priority (lower = more urgent).
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Value as written to the NVIC IPR byte (priority in the top bits).
    #[allow(clippy::arithmetic_side_effects)] // Safety: value < 16 so the shift stays in u8
    pub const fn nvic_encoded(self) -> u8 {
        self.value() << (8 - NVIC_PRIO_BITS)
    }

    /// True if an interrupt at `self` can preempt one running at `other`.
    pub const fn preempts(self, other: Self) -> bool {
        self.value() < other.value()
    }

    /// True if this band is serviced while the RTOS kernel has interrupts masked.
    pub const fn is_above_rtos(self) -> bool {
        self.value() < RTOS_MAX_SYSCALL_PRIORITY
    }
}

// Band ordering and RTOS placement.
const _: () = {
    assert!(IrqPriority::Highest.value() < IrqPriority::High.value());
    assert!(IrqPriority::High.value() < IrqPriority::Mid.value());
    assert!(IrqPriority::Mid.value() < IrqPriority::Low.value());
    assert!(IrqPriority::Mid.value() < RTOS_MAX_SYSCALL_PRIORITY);
    assert!(RTOS_MAX_SYSCALL_PRIORITY < IrqPriority::Low.value());
    assert!(IrqPriority::Low.value() < (1 << NVIC_PRIO_BITS));
};

/// Functional interrupt classes and their band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqClass {
    /// USART/UART RX/TX.
    Usart,
    /// SPI transfer complete / DMA.
    Spi,
    /// ADC conversion / DMA.
    Adc,
    /// I2C event and error.
    I2c,
    /// Receiver capture timers, USB and other general peripherals.
    General,
    /// Microsecond delay timer and other timing services.
    Delay,
}

impl IrqClass {
    /// Every class.
    pub const ALL: [Self; 6] = [
        Self::Usart,
        Self::Spi,
        Self::Adc,
        Self::I2c,
        Self::General,
        Self::Delay,
    ];

    /// Band assigned to this class.
    pub const fn priority(self) -> IrqPriority {
        match self {
            Self::Usart => IrqPriority::Highest,
            Self::Spi | Self::Adc | Self::I2c => IrqPriority::High,
            Self::General => IrqPriority::Mid,
            Self::Delay => IrqPriority::Low,
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)] // Tests index into windows of known length
mod tests {
    use super::*;

    #[test]
    fn band_values_match_board_policy() {
        assert_eq!(IrqPriority::Highest.value(), 4);
        assert_eq!(IrqPriority::High.value(), 5);
        assert_eq!(IrqPriority::Mid.value(), 8);
        assert_eq!(IrqPriority::Low.value(), 12);
    }

    #[test]
    fn all_is_sorted_most_urgent_first() {
        for pair in IrqPriority::ALL.windows(2) {
            assert!(pair[0].preempts(pair[1]));
            assert!(!pair[1].preempts(pair[0]));
        }
    }

    #[test]
    fn nvic_encoding_uses_top_nibble() {
        assert_eq!(IrqPriority::Highest.nvic_encoded(), 0x40);
        assert_eq!(IrqPriority::Low.nvic_encoded(), 0xC0);
    }

    #[test]
    fn usart_outranks_spi_and_delay_sits_below_rtos() {
        assert!(IrqClass::Usart.priority().preempts(IrqClass::Spi.priority()));
        assert!(!IrqClass::Delay.priority().is_above_rtos());
        assert!(IrqClass::I2c.priority().is_above_rtos());
    }

    /// The kernel mask falls between Mid and Low: Mid still preempts it.
    #[test]
    fn rtos_mask_sits_between_mid_and_low() {
        assert!(IrqPriority::Mid.is_above_rtos());
        assert!(!IrqPriority::Low.is_above_rtos());
        assert_eq!(RTOS_MAX_SYSCALL_PRIORITY, 11);
    }
}
