//! Role alias resolution through the published adapter snapshot.

#![allow(clippy::unwrap_used)]

use board::adapters::{AdapterBinder, AdapterId, AdapterRole, BoardAdapters, PhysicalAdapter};
use board::BoardError;

fn bind_all(ids: [u32; PhysicalAdapter::COUNT]) -> BoardAdapters {
    let mut binder = AdapterBinder::new();
    for (adapter, id) in PhysicalAdapter::ALL.into_iter().zip(ids) {
        binder.bind(adapter, AdapterId::new(id)).unwrap();
    }
    binder.finish()
}

#[test]
fn aliased_roles_share_one_identity() {
    let adapters = bind_all([1, 2, 3, 4, 5]);
    assert_eq!(adapters.mpu6000(), adapters.l3gd20());
    assert_eq!(adapters.etasv3(), adapters.flexi());
    assert_eq!(adapters.external(), adapters.flexi());
    assert_eq!(adapters.bma180().unwrap(), AdapterId::new(2));
    assert_eq!(adapters.hmc5x83_internal().unwrap(), AdapterId::new(3));
    assert_eq!(adapters.ms5611_internal().unwrap(), AdapterId::new(4));
}

#[test]
fn etasv3_resolves_through_flexi() {
    assert_eq!(AdapterRole::Etasv3.alias_depth(), Some(1));
    assert_eq!(AdapterRole::Etasv3.physical(), PhysicalAdapter::I2cFlexiport);
    assert_eq!(AdapterRole::Flexi.alias_depth(), Some(0));
}

#[test]
fn second_bind_keeps_first_value() {
    let mut binder = AdapterBinder::new();
    binder.bind(PhysicalAdapter::SpiAccel, AdapterId::new(1)).unwrap();
    assert_eq!(
        binder.bind(PhysicalAdapter::SpiAccel, AdapterId::new(2)),
        Err(BoardError::AlreadyBound(PhysicalAdapter::SpiAccel))
    );
    assert_eq!(binder.finish().bma180().unwrap(), AdapterId::new(1));
}

#[test]
fn unbound_slot_reports_role_and_adapter() {
    let adapters = AdapterBinder::new().finish();
    for role in AdapterRole::ALL {
        assert_eq!(
            adapters.resolve(role),
            Err(BoardError::Unbound {
                role,
                adapter: role.physical()
            })
        );
    }
}

proptest::proptest! {
    /// Whatever identities bring-up assigns, every role resolves to the value
    /// in the slot it aliases.
    #[test]
    fn roles_follow_their_slot(ids in proptest::array::uniform5(proptest::num::u32::ANY)) {
        let adapters = bind_all(ids);
        for role in AdapterRole::ALL {
            let slot = role.physical();
            proptest::prop_assert_eq!(
                adapters.resolve(role).unwrap(),
                adapters.physical(slot).unwrap()
            );
        }
        proptest::prop_assert_eq!(adapters.etasv3().unwrap(), adapters.external().unwrap());
    }
}
