use async_trait::async_trait;

/// Requested state of the touch-key backlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedState {
    On,
    Off,
}

/// Something which can switch the touch-key backlight on and off.
///
/// Commands are fire-and-forget: implementations must return quickly, must
/// execute commands in the order they were issued and report their own
/// failures through logging.
#[async_trait]
pub trait BacklightSink: Send + Sync + 'static {
    fn set_backlight(&self, state: LedState);

    /// Waits until every command issued so far has reached the hardware.
    /// Commands issued afterwards are dropped.
    async fn drain(&self) {}
}
