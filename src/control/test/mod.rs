use std::sync::Arc;

use crate::{
    control::arbiter::{Arbiter, TOUCHKEY_BAND_Y},
    external::led::mock::MockBacklightSink,
};

mod config_state_test;
mod settings_controller_test;

/// An arbiter in the given configuration with a freshly bound mock sink.
/// Commands caused by the configuration itself are not recorded.
pub fn configured_arbiter(mode: i64, timeout: i64) -> (Arbiter, MockBacklightSink) {
    let arbiter = Arbiter::new(TOUCHKEY_BAND_Y);
    arbiter.set_mode(mode).unwrap();
    arbiter.set_timeout(timeout).unwrap();
    let sink = MockBacklightSink::new();
    arbiter.bind_sink(Arc::new(sink.clone()));
    (arbiter, sink)
}

/// Gives spawned tasks a chance to run
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
