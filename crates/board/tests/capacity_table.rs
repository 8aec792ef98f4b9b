//! Capacity enforcement for every peripheral class.
//! A table accepts exactly the board limit and rejects the next registration.

#![allow(clippy::indexing_slicing)]

use board::capacity::{DeviceTable, PeripheralClass};
use board::BoardError;

/// Storage large enough that only the board limit can stop registration.
type WideTable = DeviceTable<u32, 16>;

#[test]
fn every_class_accepts_exactly_its_max() {
    for class in PeripheralClass::ALL {
        let mut table = WideTable::new(class);
        for i in 0..class.max_instances() {
            assert_eq!(table.register(0), Ok(i), "{class} registration {i}");
        }
        assert_eq!(
            table.register(0),
            Err(BoardError::CapacityExceeded {
                class,
                max: class.max_instances()
            }),
            "{class} accepted one past its limit"
        );
        assert_eq!(table.len(), class.max_instances());
    }
}

#[test]
fn board_limits() {
    let expected = [
        (PeripheralClass::Spi, 3),
        (PeripheralClass::I2c, 3),
        (PeripheralClass::Usart, 5),
        (PeripheralClass::CommChannel, 4),
        (PeripheralClass::Receiver, 3),
        (PeripheralClass::PpmInput, 1),
        (PeripheralClass::PwmInput, 1),
        (PeripheralClass::SpektrumInput, 2),
        (PeripheralClass::SBusInput, 1),
        (PeripheralClass::DsmInput, 2),
        (PeripheralClass::Timer, 6),
        (PeripheralClass::Usb, 1),
        (PeripheralClass::UsbHid, 1),
    ];
    for (class, max) in expected {
        assert_eq!(class.max_instances(), max, "{class}");
    }
}

#[test]
fn rejected_registration_leaves_table_intact() {
    let mut table = WideTable::new(PeripheralClass::DsmInput);
    assert!(table.register(7).is_ok());
    assert!(table.register(8).is_ok());
    assert!(table.register(9).is_err());
    let kept: Vec<u32> = table.iter().copied().collect();
    assert_eq!(kept, vec![7, 8]);
}

proptest::proptest! {
    /// No sequence of registrations ever stores more than the board limit.
    #[test]
    fn never_exceeds_limit(class_idx in 0usize..13, attempts in 0usize..32) {
        let class = PeripheralClass::ALL[class_idx];
        let mut table = WideTable::new(class);
        let accepted = (0..attempts)
            .filter(|_| table.register(0).is_ok())
            .count();
        proptest::prop_assert_eq!(accepted, attempts.min(class.max_instances()));
        proptest::prop_assert!(table.len() <= class.max_instances());
    }
}
