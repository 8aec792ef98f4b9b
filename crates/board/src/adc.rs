//! ADC channel map.
//!
//! Logical channel N of the sampling driver is entry N of [`ADC_PIN_MAP`]:
//!
//! | Index | Signal            | Pin  | ADC channel |
//! |-------|-------------------|------|-------------|
//! | 0     | Current sensor    | PC0  | 10          |
//! | 1     | Voltage sensor    | PC1  | 11          |
//! | 2     | VREF              | -    | Vrefint     |
//! | 3     | Temperature       | -    | TempSensor  |
//! | 4     | Board power       | PC2  | 12          |
//!
//! Entries without a port are generated inside the MCU. The driver skips them
//! when configuring GPIO ([`gpio_setup_pass`]) but still converts them in the
//! scan sequence ([`scan_sequence`]).

use crate::error::BoardError;
use crate::gpio::{GpioPin, GpioPort};

/// Physical ADC input selector (`ADC_Channel_x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC123_IN10 (PC0)
    Channel10,
    /// ADC123_IN11 (PC1)
    Channel11,
    /// ADC123_IN12 (PC2)
    Channel12,
    /// Internal temperature sensor (ADC1_IN16)
    TempSensor,
    /// Internal reference voltage (ADC1_IN17)
    Vrefint,
}

impl AdcChannel {
    /// Channel number programmed into the regular sequence registers.
    pub const fn number(self) -> u8 {
        match self {
            Self::Channel10 => 10,
            Self::Channel11 => 11,
            Self::Channel12 => 12,
            Self::TempSensor => 16,
            Self::Vrefint => 17,
        }
    }

    /// True for signals generated inside the MCU.
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::TempSensor | Self::Vrefint)
    }
}

/// One logical ADC channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcChannelEntry {
    /// GPIO port of the analog pin; `None` for internal signals.
    pub port: Option<GpioPort>,
    /// Pin number within `port` (0 when `port` is `None`).
    pub pin: u8,
    /// Physical ADC channel.
    pub channel: AdcChannel,
    /// Sample is eligible for oversampling.
    pub oversample: bool,
}

impl AdcChannelEntry {
    const fn external(port: GpioPort, pin: u8, channel: AdcChannel) -> Self {
        Self {
            port: Some(port),
            pin,
            channel,
            oversample: true,
        }
    }

    const fn internal(channel: AdcChannel) -> Self {
        Self {
            port: None,
            pin: 0,
            channel,
            oversample: true,
        }
    }

    /// True if the pin must be switched to analog mode before sampling.
    pub const fn needs_gpio(&self) -> bool {
        self.port.is_some()
    }

    /// Pin to configure, if any. `None` for internal signals and for a pin
    /// number past [`GpioPin::MAX_PIN`].
    pub const fn gpio_pin(&self) -> Option<GpioPin> {
        match self.port {
            Some(port) => GpioPin::try_new(port, self.pin),
            None => None,
        }
    }
}

/// Logical channel indices into [`ADC_PIN_MAP`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(usize)]
pub enum AdcPin {
    /// Battery current sensor.
    Current = 0,
    /// Battery voltage sensor.
    Voltage = 1,
    /// Internal reference voltage.
    Vref = 2,
    /// Die temperature.
    Temperature = 3,
    /// Board supply rail.
    BoardPower = 4,
}

impl AdcPin {
    /// Index into [`ADC_PIN_MAP`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Map entry for this logical channel.
    #[allow(clippy::indexing_slicing)] // Safety: every discriminant < ADC_PIN_MAP.len(), asserted below
    pub const fn entry(self) -> AdcChannelEntry {
        ADC_PIN_MAP[self.index()]
    }
}

/// Ordered logical-to-physical channel map.
pub const ADC_PIN_MAP: [AdcChannelEntry; 5] = [
    AdcChannelEntry::external(GpioPort::C, 0, AdcChannel::Channel10),
    AdcChannelEntry::external(GpioPort::C, 1, AdcChannel::Channel11),
    AdcChannelEntry::internal(AdcChannel::Vrefint),
    AdcChannelEntry::internal(AdcChannel::TempSensor),
    AdcChannelEntry::external(GpioPort::C, 2, AdcChannel::Channel12),
];

/// Number of converted channels (the map length).
///
/// The board header declared 4 but lists 5 map entries; the map is what the
/// scan sequence converts, so its length wins.
pub const ADC_NUM_CHANNELS: usize = ADC_PIN_MAP.len();

/// Logical index of the die temperature channel.
pub const ADC_TEMPERATURE_PIN: usize = AdcPin::Temperature.index();

/// Oversampling factor applied to eligible channels.
pub const ADC_MAX_OVERSAMPLING: u8 = 2;

/// ADC2 is not used; all channels convert on ADC1.
pub const ADC_USE_ADC2: bool = false;

/// The internal temperature sensor is enabled.
pub const ADC_USE_TEMP_SENSOR: bool = true;

#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: i < ADC_PIN_MAP.len()
const _: () = {
    let mut i = 0;
    while i < ADC_PIN_MAP.len() {
        let entry = &ADC_PIN_MAP[i];
        assert!(
            entry.port.is_none() == entry.channel.is_internal(),
            "ADC entry without a port must be an internal channel"
        );
        assert!(entry.pin <= GpioPin::MAX_PIN, "ADC pin out of range");
        i += 1;
    }
    assert!(AdcPin::BoardPower.index() < ADC_PIN_MAP.len());
    assert!(matches!(ADC_PIN_MAP[ADC_TEMPERATURE_PIN].channel, AdcChannel::TempSensor));
};

/// Map entry at logical `index`.
///
/// # Errors
///
/// [`BoardError::InvalidAdcIndex`] when `index` is past the end of the map.
pub fn entry(index: usize) -> Result<AdcChannelEntry, BoardError> {
    ADC_PIN_MAP.get(index).copied().ok_or(BoardError::InvalidAdcIndex {
        index,
        len: ADC_NUM_CHANNELS,
    })
}

/// Entries that need a GPIO analog-mode setup, with their logical index.
pub fn gpio_setup_pass() -> impl Iterator<Item = (usize, GpioPin)> {
    ADC_PIN_MAP
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| entry.gpio_pin().map(|pin| (index, pin)))
}

/// One slot of the regular conversion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSlot {
    /// Rank in the sequence (`SQRx`), 1-based.
    pub rank: u8,
    /// Logical channel index.
    pub index: usize,
    /// Physical channel converted in this slot.
    pub channel: AdcChannel,
}

/// The regular conversion sequence: every entry, in map order.
pub fn scan_sequence() -> impl Iterator<Item = ScanSlot> {
    (1u8..).zip(ADC_PIN_MAP.into_iter().enumerate()).map(|(rank, (index, entry))| ScanSlot {
        rank,
        index,
        channel: entry.channel,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn gpio_pass_skips_internal_channels() {
        let pins: Vec<_> = gpio_setup_pass().collect();
        assert_eq!(
            pins,
            vec![
                (0, GpioPin::new(GpioPort::C, 0)),
                (1, GpioPin::new(GpioPort::C, 1)),
                (4, GpioPin::new(GpioPort::C, 2)),
            ]
        );
    }

    #[test]
    fn scan_sequence_includes_every_entry_in_order() {
        let slots: Vec<_> = scan_sequence().collect();
        assert_eq!(slots.len(), ADC_NUM_CHANNELS);
        let channels: Vec<_> = slots.iter().map(|s| s.channel.number()).collect();
        assert_eq!(channels, vec![10, 11, 17, 16, 12]);
        let ranks: Vec<_> = slots.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    /// A hand-built entry with a bad pin number has no GPIO to configure.
    #[test]
    fn out_of_range_pin_yields_no_gpio() {
        let bad = AdcChannelEntry {
            port: Some(GpioPort::C),
            pin: 16,
            channel: AdcChannel::Channel12,
            oversample: false,
        };
        assert!(bad.needs_gpio());
        assert_eq!(bad.gpio_pin(), None);

        let good = AdcChannelEntry { pin: 2, ..bad };
        assert_eq!(good.gpio_pin(), Some(GpioPin::new(GpioPort::C, 2)));
    }

    #[test]
    fn temperature_pin_is_the_temp_sensor() {
        assert_eq!(ADC_TEMPERATURE_PIN, 3);
        assert_eq!(AdcPin::Temperature.entry().channel, AdcChannel::TempSensor);
        assert!(!AdcPin::Vref.entry().needs_gpio());
    }

    #[test]
    fn entry_rejects_out_of_range_index() {
        assert_eq!(entry(4).unwrap().channel, AdcChannel::Channel12);
        assert_eq!(
            entry(5),
            Err(BoardError::InvalidAdcIndex { index: 5, len: 5 })
        );
    }

    #[test]
    fn every_channel_oversampled() {
        assert!(ADC_PIN_MAP.iter().all(|e| e.oversample));
        assert_eq!(ADC_MAX_OVERSAMPLING, 2);
        assert!(!ADC_USE_ADC2);
    }
}
