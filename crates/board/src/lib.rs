//! Board support manifest for the revoproto flight controller
//!
//! This crate describes the board once, as typed constants, so that driver
//! registration, interrupt setup and analog sampling all read the same facts
//! instead of restating them.
//!
//! # Architecture
//!
//! ```text
//! Application / flight modules
//!         ↓
//! Drivers (SPI, I2C, USART, ADC, receivers, servos)
//!         ↓
//! Board manifest (this crate - capacities, identities, clocks, priorities)
//!         ↓
//! Hardware Layer (HAL + PAC)
//! ```
//!
//! # Contents
//!
//! ## Resolved at bring-up
//! - [`adapters`] - bus identities, the role alias table and the write-once
//!   snapshot drivers resolve their adapter from
//!
//! ## Fixed at build time
//! - [`capacity`] - per-class instance limits and the [`DeviceTable`] that
//!   enforces them
//! - [`clock_config`] - SYSCLK and the derived APB bus and timer clocks
//! - [`irq`] - interrupt priority bands
//! - [`watchdog`] - client flags, timeout and the shared check-in register
//! - [`adc`] - logical-to-physical ADC channel map
//! - [`usart`], [`receiver`], [`servo`], [`resources`], [`config`] - the rest
//!   of the board header
//!
//! # Features
//!
//! - `std`: Link `std` for host builds (mocks, `std::error::Error` impls)
//! - `defmt`: Enable defmt logging
//!
//! # Example
//!
//! ```rust
//! use board::adapters::{AdapterBinder, AdapterId, AdapterRole, PhysicalAdapter};
//!
//! let mut binder = AdapterBinder::new();
//! binder.bind(PhysicalAdapter::I2cFlexiport, AdapterId::new(7)).unwrap();
//! let adapters = binder.finish();
//! assert_eq!(
//!     adapters.resolve(AdapterRole::Etasv3).unwrap(),
//!     adapters.resolve(AdapterRole::Flexi).unwrap(),
//! );
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this board manifest crate:
#![allow(clippy::doc_markdown)] // register and chip names in doc comments
#![allow(clippy::must_use_candidate)] // const accessors, callers decide
#![allow(clippy::match_same_arms)] // tables read row by row
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_lossless)] // u64::from is not const; ms constants widened for Duration

pub mod adapters;
pub mod adc;
pub mod capacity;
pub mod clock_config;
pub mod config;
pub mod error;
pub mod gpio;
pub mod irq;
pub mod receiver;
pub mod resources;
pub mod servo;
pub mod usart;
pub mod watchdog;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use adapters::{AdapterId, AdapterRole, AdapterStore, BoardAdapters, BusInit, PhysicalAdapter};
pub use capacity::{DeviceTable, PeripheralClass};
pub use clock_config::{
    PCLK1_HZ, PCLK2_HZ, PERIPHERAL_APB1_CLOCK_HZ, PERIPHERAL_APB2_CLOCK_HZ, SYSCLK_HZ,
};
pub use error::BoardError;
pub use irq::{IrqClass, IrqPriority};
pub use watchdog::{WatchdogFlags, WatchdogRegister, WATCHDOG_TIMEOUT};
