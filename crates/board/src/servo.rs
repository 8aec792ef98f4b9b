//! Servo output timing.

use embassy_time::Duration;

/// PWM update rate for servo outputs.
pub const SERVO_UPDATE_HZ: u32 = 50;

/// Servo frame period (1 / [`SERVO_UPDATE_HZ`]).
pub const SERVO_PERIOD: Duration = Duration::from_hz(SERVO_UPDATE_HZ as u64);

/// Pulse width applied at boot, in microseconds. Zero means no pulse, so
/// motors stay off until settings are loaded.
pub const SERVOS_INITIAL_POSITION: u16 = 0;

/// Independent output banks (outputs in one bank share a timer and rate).
pub const SERVO_BANKS: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_is_20ms() {
        assert_eq!(SERVO_PERIOD.as_millis(), 20);
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn boots_without_pulse() {
        assert_eq!(SERVOS_INITIAL_POSITION, 0);
        assert!(SERVO_BANKS <= crate::capacity::TIM_MAX_DEVS);
    }
}
