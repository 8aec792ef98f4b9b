//! Bus adapter identities and the role alias table.
//!
//! # Model
//!
//! ```text
//!  bring-up ──bind──► AdapterBinder ──finish──► BoardAdapters ──install──► &'static
//!                       (write-once slots)        (immutable snapshot)
//!
//!  driver ──role──► AdapterRole::physical() ──► PhysicalAdapter ──► AdapterId
//! ```
//!
//! Each physical bus instance the board brings up gets one identity slot
//! ([`PhysicalAdapter`]). Sensor drivers never name slots directly; they ask
//! for their functional [`AdapterRole`] and the alias table maps it onto a
//! slot. Several roles may share one slot:
//!
//! | Role              | Target             | Note                           |
//! |-------------------|--------------------|--------------------------------|
//! | L3GD20            | SPI gyro           |                                |
//! | BMA180            | SPI accel          |                                |
//! | MPU6000           | SPI gyro           | same bus as the L3GD20         |
//! | MS5611 (internal) | I2C pressure       |                                |
//! | HMC5x83 (internal)| I2C mag            |                                |
//! | FLEXI             | I2C flexi-port     |                                |
//! | ETASV3            | role FLEXI         | airspeed sensor on flexi-port  |
//! | EXTERNAL          | I2C flexi-port     | external I2C is the flexi-port |
//!
//! The alias table is a `const fn`, and a `const` assertion below walks every
//! chain, so a cyclic alias fails the build instead of hanging a driver.

use core::fmt;

use static_cell::StaticCell;

use crate::error::BoardError;

/// Opaque handle for one configured bus instance.
///
/// Values are assigned by the bring-up routine (typically the index its bus
/// driver returned); this crate never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct AdapterId(u32);

impl AdapterId {
    /// Wrap a raw handle from a bus driver.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Physical bus instances that own an identity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhysicalAdapter {
    /// SPI bus carrying the gyro (SPI1).
    SpiGyro,
    /// SPI bus carrying the accelerometer (SPI2).
    SpiAccel,
    /// Internal I2C bus carrying the magnetometer.
    I2cMag,
    /// Internal I2C bus carrying the pressure sensor.
    I2cPressure,
    /// I2C on the flexi-port connector.
    I2cFlexiport,
}

impl PhysicalAdapter {
    /// Number of identity slots.
    pub const COUNT: usize = 5;

    /// Every slot, in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::SpiGyro,
        Self::SpiAccel,
        Self::I2cMag,
        Self::I2cPressure,
        Self::I2cFlexiport,
    ];

    /// Slot index in [`Self::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::SpiGyro => 0,
            Self::SpiAccel => 1,
            Self::I2cMag => 2,
            Self::I2cPressure => 3,
            Self::I2cFlexiport => 4,
        }
    }

    /// Slot name as used in board documentation.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpiGyro => "spi_gyro",
            Self::SpiAccel => "spi_accel",
            Self::I2cMag => "i2c_mag",
            Self::I2cPressure => "i2c_pressure",
            Self::I2cFlexiport => "i2c_flexiport",
        }
    }
}

impl fmt::Display for PhysicalAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Functional roles drivers ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdapterRole {
    /// L3GD20 gyro SPI adapter.
    L3gd20,
    /// BMA180 accelerometer SPI adapter.
    Bma180,
    /// MPU6000 SPI adapter (shares the gyro bus).
    Mpu6000,
    /// MS5611 barometer on the internal I2C bus.
    Ms5611Internal,
    /// HMC5x83 magnetometer on the internal I2C bus.
    Hmc5x83Internal,
    /// Flexi-port I2C adapter.
    Flexi,
    /// EagleTree airspeed sensor (v3), wired to the flexi-port.
    Etasv3,
    /// External I2C adapter.
    External,
}

/// Where a role points: straight at a slot, or at another role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoleTarget {
    /// Role is bound directly to a physical slot.
    Adapter(PhysicalAdapter),
    /// Role is an alias of another role.
    Alias(AdapterRole),
}

impl AdapterRole {
    /// Every role.
    pub const ALL: [Self; 8] = [
        Self::L3gd20,
        Self::Bma180,
        Self::Mpu6000,
        Self::Ms5611Internal,
        Self::Hmc5x83Internal,
        Self::Flexi,
        Self::Etasv3,
        Self::External,
    ];

    /// The alias table. One entry per role, so a role can never bind to
    /// more than one identity.
    pub const fn target(self) -> RoleTarget {
        match self {
            Self::L3gd20 => RoleTarget::Adapter(PhysicalAdapter::SpiGyro),
            Self::Bma180 => RoleTarget::Adapter(PhysicalAdapter::SpiAccel),
            Self::Mpu6000 => RoleTarget::Adapter(PhysicalAdapter::SpiGyro),
            Self::Ms5611Internal => RoleTarget::Adapter(PhysicalAdapter::I2cPressure),
            Self::Hmc5x83Internal => RoleTarget::Adapter(PhysicalAdapter::I2cMag),
            Self::Flexi => RoleTarget::Adapter(PhysicalAdapter::I2cFlexiport),
            Self::Etasv3 => RoleTarget::Alias(Self::Flexi),
            Self::External => RoleTarget::Adapter(PhysicalAdapter::I2cFlexiport),
        }
    }

    /// Number of alias hops before the chain reaches a slot, or `None` if
    /// the chain is longer than the role table (i.e. it loops).
    #[allow(clippy::arithmetic_side_effects)] // Safety: hops <= ALL.len()
    pub const fn alias_depth(self) -> Option<usize> {
        let mut role = self;
        let mut hops = 0;
        while hops <= Self::ALL.len() {
            match role.target() {
                RoleTarget::Adapter(_) => return Some(hops),
                RoleTarget::Alias(next) => role = next,
            }
            hops += 1;
        }
        None
    }

    /// Physical slot this role resolves to.
    ///
    /// Terminates for every role: the `const` check below rejects cycles at
    /// build time.
    pub const fn physical(self) -> PhysicalAdapter {
        let mut role = self;
        loop {
            match role.target() {
                RoleTarget::Adapter(adapter) => return adapter,
                RoleTarget::Alias(next) => role = next,
            }
        }
    }

    /// Role name as used by the sensor drivers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::L3gd20 => "L3GD20",
            Self::Bma180 => "BMA180",
            Self::Mpu6000 => "MPU6000",
            Self::Ms5611Internal => "MS5611_INTERNAL",
            Self::Hmc5x83Internal => "HMC5X83_INTERNAL",
            Self::Flexi => "FLEXI",
            Self::Etasv3 => "ETASV3",
            Self::External => "EXTERNAL",
        }
    }
}

impl fmt::Display for AdapterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Every alias chain must reach a physical slot.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)] // Safety: i < ALL.len()
const _: () = {
    let mut i = 0;
    while i < AdapterRole::ALL.len() {
        assert!(
            AdapterRole::ALL[i].alias_depth().is_some(),
            "adapter role alias chain does not terminate"
        );
        i += 1;
    }
};

/// Write-once identity slots, owned by the bring-up routine.
#[derive(Debug, Default)]
pub struct AdapterBinder {
    slots: [Option<AdapterId>; PhysicalAdapter::COUNT],
}

impl AdapterBinder {
    /// All slots unbound.
    pub const fn new() -> Self {
        Self {
            slots: [None; PhysicalAdapter::COUNT],
        }
    }

    /// Record the identity bring-up obtained for `adapter`.
    ///
    /// # Errors
    ///
    /// [`BoardError::AlreadyBound`] if the slot was written before; the first
    /// value is kept.
    pub fn bind(&mut self, adapter: PhysicalAdapter, id: AdapterId) -> Result<(), BoardError> {
        let slot = self.slot_mut(adapter);
        if slot.is_some() {
            return Err(BoardError::AlreadyBound(adapter));
        }
        *slot = Some(id);
        #[cfg(feature = "defmt")]
        defmt::debug!("adapter {} bound to id {=u32}", adapter, id.get());
        Ok(())
    }

    #[allow(clippy::indexing_slicing)] // Safety: index() < COUNT == slots.len()
    fn slot_mut(&mut self, adapter: PhysicalAdapter) -> &mut Option<AdapterId> {
        &mut self.slots[adapter.index()]
    }

    /// True once `adapter` has been bound.
    pub fn is_bound(&self, adapter: PhysicalAdapter) -> bool {
        matches!(self.slots.get(adapter.index()), Some(Some(_)))
    }

    /// Freeze the slots into the read-only snapshot consumers use.
    ///
    /// Slots bring-up chose not to bind (e.g. flexi-port configured as a
    /// serial port) stay empty and report [`BoardError::Unbound`] on lookup.
    pub fn finish(self) -> BoardAdapters {
        BoardAdapters { slots: self.slots }
    }
}

/// Immutable snapshot of every adapter identity, produced once by bring-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardAdapters {
    slots: [Option<AdapterId>; PhysicalAdapter::COUNT],
}

impl BoardAdapters {
    /// Identity stored in a physical slot, if bound.
    pub fn physical(&self, adapter: PhysicalAdapter) -> Option<AdapterId> {
        self.slots.get(adapter.index()).copied().flatten()
    }

    /// Resolve a functional role to the identity of its bus.
    ///
    /// # Errors
    ///
    /// [`BoardError::Unbound`] if bring-up did not bind the slot the role
    /// aliases.
    pub fn resolve(&self, role: AdapterRole) -> Result<AdapterId, BoardError> {
        let adapter = role.physical();
        self.physical(adapter)
            .ok_or(BoardError::Unbound { role, adapter })
    }

    /// Gyro SPI adapter (L3GD20).
    pub fn l3gd20(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::L3gd20)
    }

    /// Accelerometer SPI adapter (BMA180).
    pub fn bma180(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::Bma180)
    }

    /// MPU6000 SPI adapter; same identity as [`Self::l3gd20`].
    pub fn mpu6000(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::Mpu6000)
    }

    /// Internal barometer I2C adapter (MS5611).
    pub fn ms5611_internal(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::Ms5611Internal)
    }

    /// Internal magnetometer I2C adapter (HMC5x83).
    pub fn hmc5x83_internal(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::Hmc5x83Internal)
    }

    /// Flexi-port I2C adapter.
    pub fn flexi(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::Flexi)
    }

    /// EagleTree airspeed adapter; alias of [`Self::flexi`].
    pub fn etasv3(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::Etasv3)
    }

    /// External I2C adapter; the flexi-port.
    pub fn external(&self) -> Result<AdapterId, BoardError> {
        self.resolve(AdapterRole::External)
    }
}

/// Board bring-up collaborator: configures one physical bus and reports the
/// identity its driver handed out.
///
/// Implemented by the firmware's bus setup code; [`crate::mocks`] has a host
/// implementation.
pub trait BusInit {
    /// Error type of the bus driver.
    type Error: From<BoardError>;

    /// Configure the bus behind `adapter`.
    ///
    /// Returns `Ok(None)` when the board configuration leaves the bus unused
    /// (e.g. flexi-port set up as a serial port).
    fn init_bus(&mut self, adapter: PhysicalAdapter) -> Result<Option<AdapterId>, Self::Error>;
}

/// Bring up every physical adapter in declaration order and freeze the result.
///
/// # Errors
///
/// The first error from `bus`; nothing after the failing adapter is
/// configured.
pub fn bring_up<B: BusInit>(bus: &mut B) -> Result<BoardAdapters, B::Error> {
    let mut binder = AdapterBinder::new();
    for adapter in PhysicalAdapter::ALL {
        if let Some(id) = bus.init_bus(adapter)? {
            binder.bind(adapter, id)?;
        }
    }
    Ok(binder.finish())
}

/// Single-assignment home for the published snapshot.
///
/// ```rust
/// use board::adapters::{AdapterBinder, AdapterId, AdapterStore, PhysicalAdapter};
///
/// static ADAPTERS: AdapterStore = AdapterStore::new();
///
/// let mut binder = AdapterBinder::new();
/// binder.bind(PhysicalAdapter::SpiGyro, AdapterId::new(0)).unwrap();
/// let adapters = ADAPTERS.install(binder.finish()).unwrap();
/// assert_eq!(adapters.mpu6000().unwrap(), AdapterId::new(0));
/// assert!(ADAPTERS.install(AdapterBinder::new().finish()).is_err());
/// ```
pub struct AdapterStore {
    cell: StaticCell<BoardAdapters>,
}

impl AdapterStore {
    /// Empty store, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            cell: StaticCell::new(),
        }
    }

    /// Publish the snapshot. Succeeds exactly once per store.
    ///
    /// # Errors
    ///
    /// [`BoardError::AlreadyInstalled`] on every call after the first.
    pub fn install(
        &'static self,
        adapters: BoardAdapters,
    ) -> Result<&'static BoardAdapters, BoardError> {
        match self.cell.try_init(adapters) {
            Some(installed) => {
                #[cfg(feature = "defmt")]
                defmt::info!("board adapters installed");
                Ok(&*installed)
            }
            None => Err(BoardError::AlreadyInstalled),
        }
    }
}

impl Default for AdapterStore {
    fn default() -> Self {
        Self::new()
    }
}
