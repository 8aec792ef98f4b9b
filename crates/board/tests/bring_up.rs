//! Host build of the board crate: mocks and `std::error::Error` impls.

#![cfg(feature = "std")]
#![allow(clippy::unwrap_used)]

use board::adapters::{bring_up, AdapterId, AdapterRole, PhysicalAdapter};
use board::mocks::{MockBusError, MockBusInit};
use board::BoardError;

fn assert_std_error<E: std::error::Error>() {}

#[test]
fn board_error_is_a_std_error() {
    assert_std_error::<BoardError>();

    let err: Box<dyn std::error::Error> = Box::new(BoardError::AlreadyInstalled);
    assert!(!err.to_string().is_empty());
}

#[test]
fn mock_bring_up_resolves_every_role() {
    let mut bus = MockBusInit::new(100);
    let adapters = bring_up(&mut bus).unwrap();

    assert_eq!(bus.initialised().len(), PhysicalAdapter::COUNT);
    for role in AdapterRole::ALL {
        let expected = adapters.physical(role.physical()).unwrap();
        assert_eq!(adapters.resolve(role).unwrap(), expected);
    }
    assert_eq!(adapters.flexi().unwrap(), AdapterId::new(104));
}

#[test]
fn mock_fault_surfaces_to_caller() {
    let mut bus = MockBusInit::new(0).fail_on(PhysicalAdapter::SpiAccel);
    assert_eq!(
        bring_up(&mut bus).err(),
        Some(MockBusError::Fault(PhysicalAdapter::SpiAccel))
    );
}
