//! ADC channel map ordering and GPIO/scan pass split.

use board::adc::{self, AdcPin, ADC_NUM_CHANNELS, ADC_PIN_MAP};
use board::gpio::GpioPort;

#[test]
fn map_order_is_current_voltage_vref_temp_power() {
    let pins = [
        AdcPin::Current,
        AdcPin::Voltage,
        AdcPin::Vref,
        AdcPin::Temperature,
        AdcPin::BoardPower,
    ];
    assert_eq!(pins.len(), ADC_NUM_CHANNELS);
    assert_eq!(ADC_NUM_CHANNELS, ADC_PIN_MAP.len());
    assert_eq!(ADC_NUM_CHANNELS, 5);
    for (i, pin) in pins.into_iter().enumerate() {
        assert_eq!(pin.index(), i);
    }
}

#[test]
fn portless_entries_are_exactly_internal_channels() {
    for entry in ADC_PIN_MAP {
        assert_eq!(entry.port.is_none(), entry.channel.is_internal(), "{entry:?}");
    }
}

#[test]
fn gpio_pass_and_scan_pass_partition() {
    let gpio: Vec<usize> = adc::gpio_setup_pass().map(|(i, _)| i).collect();
    let scan: Vec<usize> = adc::scan_sequence().map(|s| s.index).collect();
    assert_eq!(gpio, vec![0, 1, 4]);
    assert_eq!(scan, vec![0, 1, 2, 3, 4]);
    assert!(adc::gpio_setup_pass().all(|(_, pin)| pin.port() == GpioPort::C));
}

#[test]
fn out_of_range_lookup_is_an_error() {
    assert!(adc::entry(ADC_NUM_CHANNELS).is_err());
    assert!(adc::entry(usize::MAX).is_err());
}
