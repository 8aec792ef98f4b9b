//! Watchdog client flags and the shared check-in register.
//!
//! Each monitored task owns one bit. On every successful loop iteration the
//! task ORs its bit into the [`WatchdogRegister`]; the watchdog task clears
//! and inspects the register once per period. If the expected set is not
//! complete within [`WATCHDOG_TIMEOUT`], the hardware watchdog is left to
//! expire and resets the board. Reporting which bits were missing lets the
//! reset cause name the stalled subsystems instead of just "lockup".
//!
//! # Synchronisation
//!
//! The register is a single [`AtomicU16`]. A check-in is one atomic
//! `fetch_or` (Release); the supervisor's clear-and-inspect is one atomic
//! `swap(0)` (AcqRel). No lock is taken, and no check-in can be lost between
//! the read and the clear because both happen in the same RMW. Cortex-M4
//! implements both with LDREX/STREX.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};
use core::sync::atomic::{AtomicU16, Ordering};

use embassy_time::Duration;

/// Watchdog timeout in milliseconds.
pub const WATCHDOG_TIMEOUT_MS: u32 = 250;

/// Watchdog timeout.
pub const WATCHDOG_TIMEOUT: Duration = Duration::from_millis(WATCHDOG_TIMEOUT_MS as u64);

/// RTC backup register (`RTC_BKP_DRn`) that preserves the flags across a
/// watchdog reset.
pub const WATCHDOG_BACKUP_REGISTER: u8 = 4;

/// Set of watchdog clients, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct WatchdogFlags(u16);

impl WatchdogFlags {
    /// Actuator output task.
    pub const ACTUATOR: Self = Self(0x0001);
    /// Stabilization loop.
    pub const STABILIZATION: Self = Self(0x0002);
    /// Attitude estimation.
    pub const ATTITUDE: Self = Self(0x0004);
    /// Manual control input.
    pub const MANUAL: Self = Self(0x0008);
    /// Sensor acquisition.
    pub const SENSORS: Self = Self(0x0010);
    /// Autotune module.
    pub const AUTOTUNE: Self = Self(0x0020);

    /// No clients.
    pub const EMPTY: Self = Self(0);

    /// Every client, with its name.
    pub const CLIENTS: [(&'static str, Self); 6] = [
        ("ACTUATOR", Self::ACTUATOR),
        ("STABILIZATION", Self::STABILIZATION),
        ("ATTITUDE", Self::ATTITUDE),
        ("MANUAL", Self::MANUAL),
        ("SENSORS", Self::SENSORS),
        ("AUTOTUNE", Self::AUTOTUNE),
    ];

    /// Union of every client flag.
    pub const ALL: Self = Self::all_clients();

    #[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: i < CLIENTS.len()
    const fn all_clients() -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < Self::CLIENTS.len() {
            bits |= Self::CLIENTS[i].1 .0;
            i += 1;
        }
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Flags from raw bits, dropping bits that name no client.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// True if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags in `self` or `other`.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Flags in both `self` and `other`.
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Flags in `self` but not in `other`.
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Named clients whose flag is set.
    pub fn iter_names(self) -> impl Iterator<Item = &'static str> {
        Self::CLIENTS
            .into_iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| name)
    }
}

// Client bits are single, distinct bits.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: i, j < CLIENTS.len()
const _: () = {
    let clients = WatchdogFlags::CLIENTS;
    let mut i = 0;
    while i < clients.len() {
        assert!(clients[i].1.bits().is_power_of_two(), "watchdog flag is not a single bit");
        let mut j = i + 1;
        while j < clients.len() {
            assert!(clients[i].1.bits() & clients[j].1.bits() == 0, "watchdog flags overlap");
            j += 1;
        }
        i += 1;
    }
};

impl BitOr for WatchdogFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for WatchdogFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl BitAnd for WatchdogFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl fmt::Display for WatchdogFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        let mut first = true;
        for name in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Shared check-in register.
///
/// Many tasks call [`check_in`](Self::check_in); exactly one supervisor
/// calls [`take_missing`](Self::take_missing) once per watchdog period.
#[derive(Debug, Default)]
pub struct WatchdogRegister {
    bits: AtomicU16,
}

impl WatchdogRegister {
    /// Register with no flags set, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            bits: AtomicU16::new(0),
        }
    }

    /// Record that the tasks in `flags` completed an iteration.
    pub fn check_in(&self, flags: WatchdogFlags) {
        self.bits.fetch_or(flags.bits(), Ordering::Release);
    }

    /// Flags reported since the last clear, without clearing.
    pub fn peek(&self) -> WatchdogFlags {
        WatchdogFlags(self.bits.load(Ordering::Acquire))
    }

    /// Clear the register and return what it held.
    pub fn take(&self) -> WatchdogFlags {
        WatchdogFlags(self.bits.swap(0, Ordering::AcqRel))
    }

    /// Clear the register and return the expected flags that did not check in.
    ///
    /// An empty result means every expected client is alive.
    pub fn take_missing(&self, expected: WatchdogFlags) -> WatchdogFlags {
        let missing = expected.difference(self.take());
        #[cfg(feature = "defmt")]
        if !missing.is_empty() {
            defmt::warn!("watchdog clients missing: {=u16:#x}", missing.bits());
        }
        missing
    }
}
