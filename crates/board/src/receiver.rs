//! Radio receiver inputs.
//!
//! Each protocol has its own instance limit (from [`crate::capacity`]) and a
//! fixed number of input channels it can decode. The generic receiver layer
//! exposes at most [`RCVR_MAX_CHANNELS`] of them to the control code.

use core::fmt;

use embassy_time::Duration;

use crate::capacity::PeripheralClass;

/// Channels the generic receiver layer exposes per receiver.
pub const RCVR_MAX_CHANNELS: usize = 12;

/// PPM input channels.
pub const PPM_NUM_INPUTS: usize = 16;
/// PWM input channels.
pub const PWM_NUM_INPUTS: usize = 8;
/// Spektrum input channels.
pub const SPEKTRUM_NUM_INPUTS: usize = 12;
/// S.Bus input channels: 16 proportional plus 2 digital.
pub const SBUS_NUM_INPUTS: usize = 18;
/// DSM input channels.
pub const DSM_NUM_INPUTS: usize = 12;

/// Ground-station receiver timeout in milliseconds.
pub const GCS_RECEIVER_TIMEOUT_MS: u32 = 100;

/// Ground-station receiver timeout. After this long without an update the
/// GCS receiver reports its channels as invalid.
pub const GCS_RECEIVER_TIMEOUT: Duration = Duration::from_millis(GCS_RECEIVER_TIMEOUT_MS as u64);

/// Receiver input protocols supported on this board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiverProtocol {
    /// Pulse-position modulation on one pin.
    Ppm,
    /// One PWM pulse per channel.
    Pwm,
    /// Spektrum satellite serial.
    Spektrum,
    /// Futaba S.Bus (inverted serial).
    SBus,
    /// DSM serial.
    Dsm,
    /// Ground-station control over telemetry.
    Gcs,
}

impl ReceiverProtocol {
    /// Every protocol.
    pub const ALL: [Self; 6] = [
        Self::Ppm,
        Self::Pwm,
        Self::Spektrum,
        Self::SBus,
        Self::Dsm,
        Self::Gcs,
    ];

    /// Capacity class limiting instances of this protocol. GCS input only
    /// occupies a generic receiver slot.
    pub const fn class(self) -> PeripheralClass {
        match self {
            Self::Ppm => PeripheralClass::PpmInput,
            Self::Pwm => PeripheralClass::PwmInput,
            Self::Spektrum => PeripheralClass::SpektrumInput,
            Self::SBus => PeripheralClass::SBusInput,
            Self::Dsm => PeripheralClass::DsmInput,
            Self::Gcs => PeripheralClass::Receiver,
        }
    }

    /// Maximum instances of this protocol.
    pub const fn max_devices(self) -> usize {
        self.class().max_instances()
    }

    /// Channels the protocol decoder produces.
    pub const fn num_inputs(self) -> usize {
        match self {
            Self::Ppm => PPM_NUM_INPUTS,
            Self::Pwm => PWM_NUM_INPUTS,
            Self::Spektrum => SPEKTRUM_NUM_INPUTS,
            Self::SBus => SBUS_NUM_INPUTS,
            Self::Dsm => DSM_NUM_INPUTS,
            Self::Gcs => RCVR_MAX_CHANNELS,
        }
    }

    /// Channels visible through the generic receiver layer.
    pub const fn usable_channels(self) -> usize {
        let n = self.num_inputs();
        if n < RCVR_MAX_CHANNELS {
            n
        } else {
            RCVR_MAX_CHANNELS
        }
    }

    /// Link timeout, for protocols that have one configured on this board.
    pub const fn timeout(self) -> Option<Duration> {
        match self {
            Self::Gcs => Some(GCS_RECEIVER_TIMEOUT),
            _ => None,
        }
    }

    /// Short name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ppm => "PPM",
            Self::Pwm => "PWM",
            Self::Spektrum => "Spektrum",
            Self::SBus => "S.Bus",
            Self::Dsm => "DSM",
            Self::Gcs => "GCS",
        }
    }
}

impl fmt::Display for ReceiverProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// No single protocol may need more instances than the generic layer offers.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: i < ALL.len()
const _: () = {
    let mut i = 0;
    while i < ReceiverProtocol::ALL.len() {
        assert!(ReceiverProtocol::ALL[i].max_devices() <= PeripheralClass::Receiver.max_instances());
        i += 1;
    }
};
