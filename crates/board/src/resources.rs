//! Timer channel and DMA channel allocation.
//!
//! ```text
//! Timer | Channel 1 | Channel 2 | Channel 3 | Channel 4
//! ------+-----------+-----------+-----------+----------
//! TIM2  | ------------------ delay ------------------
//! (TIM1, TIM3..TIM8 unallocated)
//!
//! DMA channel  2 - SPI1 RX
//! DMA channel  3 - SPI1 TX
//! DMA channel  4 - SPI2 RX
//! DMA channel  5 - SPI2 TX
//! (1, 6..12 unallocated)
//! ```
//!
//! Both tables are checked at compile time: no timer channel and no DMA
//! channel has two owners.

use core::fmt;

/// Timer channels per general-purpose timer.
pub const TIMER_CHANNELS: u8 = 4;

/// DMA channels documented for the board (numbered 1..=12).
pub const DMA_CHANNEL_COUNT: u8 = 12;

/// Owner of a timer or DMA resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceOwner {
    /// Microsecond delay / timebase service.
    Delay,
    /// SPI1 receive (gyro bus).
    Spi1Rx,
    /// SPI1 transmit (gyro bus).
    Spi1Tx,
    /// SPI2 receive (accel bus).
    Spi2Rx,
    /// SPI2 transmit (accel bus).
    Spi2Tx,
}

impl ResourceOwner {
    /// Short name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Delay => "DELAY",
            Self::Spi1Rx => "SPI1 RX",
            Self::Spi1Tx => "SPI1 TX",
            Self::Spi2Rx => "SPI2 RX",
            Self::Spi2Tx => "SPI2 TX",
        }
    }
}

impl fmt::Display for ResourceOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Channels of one timer claimed by an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerAllocation {
    /// Timer number (`TIMn`).
    pub timer: u8,
    /// Bit n-1 set = channel n claimed.
    pub channels: u8,
    /// Owning service.
    pub owner: ResourceOwner,
}

impl TimerAllocation {
    /// Mask covering every channel of a timer.
    pub const ALL_CHANNELS: u8 = 0b1111;

    /// True if `channel` (1-based) is claimed.
    pub const fn claims(&self, channel: u8) -> bool {
        match 1u8.checked_shl(channel.wrapping_sub(1) as u32) {
            Some(bit) if channel >= 1 && channel <= TIMER_CHANNELS => self.channels & bit != 0,
            _ => false,
        }
    }
}

/// Timer channel allocation.
pub const TIMER_ALLOCATION: &[TimerAllocation] = &[TimerAllocation {
    timer: 2,
    channels: TimerAllocation::ALL_CHANNELS,
    owner: ResourceOwner::Delay,
}];

/// Timer used by the delay service.
pub const DELAY_TIMER: u8 = 2;

/// One DMA channel and its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaAllocation {
    /// DMA channel number (1..=12).
    pub channel: u8,
    /// Owning transfer direction.
    pub owner: ResourceOwner,
}

/// DMA channel allocation.
pub const DMA_ALLOCATION: &[DmaAllocation] = &[
    DmaAllocation { channel: 2, owner: ResourceOwner::Spi1Rx },
    DmaAllocation { channel: 3, owner: ResourceOwner::Spi1Tx },
    DmaAllocation { channel: 4, owner: ResourceOwner::Spi2Rx },
    DmaAllocation { channel: 5, owner: ResourceOwner::Spi2Tx },
];

#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: i, j < table len
const _: () = {
    let mut i = 0;
    while i < DMA_ALLOCATION.len() {
        let ch = DMA_ALLOCATION[i].channel;
        assert!(ch >= 1 && ch <= DMA_CHANNEL_COUNT, "DMA channel out of range");
        let mut j = i + 1;
        while j < DMA_ALLOCATION.len() {
            assert!(DMA_ALLOCATION[j].channel != ch, "DMA channel allocated twice");
            j += 1;
        }
        i += 1;
    }

    let mut i = 0;
    while i < TIMER_ALLOCATION.len() {
        let a = TIMER_ALLOCATION[i];
        assert!(a.channels & !TimerAllocation::ALL_CHANNELS == 0, "timer channel out of range");
        let mut j = i + 1;
        while j < TIMER_ALLOCATION.len() {
            let b = TIMER_ALLOCATION[j];
            assert!(
                a.timer != b.timer || a.channels & b.channels == 0,
                "timer channel allocated twice"
            );
            j += 1;
        }
        i += 1;
    }
};

/// Owner of DMA `channel`, if allocated.
pub fn dma_owner(channel: u8) -> Option<ResourceOwner> {
    DMA_ALLOCATION
        .iter()
        .find(|a| a.channel == channel)
        .map(|a| a.owner)
}

/// Owner of channel `channel` (1-based) on `TIM{timer}`, if allocated.
pub fn timer_owner(timer: u8, channel: u8) -> Option<ResourceOwner> {
    TIMER_ALLOCATION
        .iter()
        .find(|a| a.timer == timer && a.claims(channel))
        .map(|a| a.owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spi_dma_channels() {
        assert_eq!(dma_owner(2), Some(ResourceOwner::Spi1Rx));
        assert_eq!(dma_owner(5), Some(ResourceOwner::Spi2Tx));
        assert_eq!(dma_owner(1), None);
        assert_eq!(dma_owner(12), None);
    }

    #[test]
    fn delay_owns_all_of_tim2() {
        for ch in 1..=TIMER_CHANNELS {
            assert_eq!(timer_owner(DELAY_TIMER, ch), Some(ResourceOwner::Delay));
        }
        assert_eq!(timer_owner(DELAY_TIMER, 0), None);
        assert_eq!(timer_owner(DELAY_TIMER, 5), None);
        assert_eq!(timer_owner(3, 1), None);
    }
}
