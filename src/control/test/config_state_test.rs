use std::convert::TryFrom;

use crate::control::config_state::{
    validate_timeout, ConfigError, ConfigState, Configuration, Mode, TIMEOUT_MAX,
};

#[test]
fn test_defaults() {
    let state = ConfigState::new();
    assert_eq!(state.mode(), Mode::Normal);
    assert_eq!(state.timeout_seconds(), 0);
    assert_eq!(state.configuration(), Configuration::default());
}

#[test]
fn test_mode_round_trip() {
    let state = ConfigState::new();
    for (value, mode) in [(0, Mode::Normal), (1, Mode::TouchKeyOnly), (2, Mode::Off)] {
        assert_eq!(state.set_mode(value), Ok(mode));
        assert_eq!(state.mode(), mode);
        assert_eq!(mode.to_string(), value.to_string());
    }
}

#[test]
fn test_invalid_mode_keeps_previous() {
    let state = ConfigState::new();
    state.set_mode(1).unwrap();
    for value in [-1, 3, 255, 256, i64::MAX, i64::MIN] {
        assert_eq!(state.set_mode(value), Err(ConfigError::InvalidMode(value)));
        assert_eq!(state.mode(), Mode::TouchKeyOnly);
    }
}

#[test]
fn test_timeout_bounds_are_inclusive() {
    let state = ConfigState::new();
    assert_eq!(state.set_timeout(0), Ok(0));
    assert_eq!(state.set_timeout(30), Ok(30));
    assert_eq!(state.timeout_seconds(), TIMEOUT_MAX);
    assert_eq!(state.set_timeout(17), Ok(17));
}

#[test]
fn test_invalid_timeout_keeps_previous() {
    let state = ConfigState::new();
    state.set_timeout(5).unwrap();
    for value in [-1, 31, 286, i64::MIN] {
        assert_eq!(
            state.set_timeout(value),
            Err(ConfigError::InvalidTimeout(value))
        );
        assert_eq!(state.timeout_seconds(), 5);
    }
}

#[test]
fn test_validate_timeout() {
    assert_eq!(validate_timeout(12), Ok(12));
    assert!(validate_timeout(31).is_err());
    assert!(validate_timeout(-30).is_err());
}

#[test]
fn test_mode_conversions() {
    assert_eq!(u8::from(Mode::Off), 2);
    assert_eq!(Mode::try_from(1), Ok(Mode::TouchKeyOnly));
    assert_eq!(Mode::default(), Mode::Normal);
}
