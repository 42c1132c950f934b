//! The seam between controller transitions and the operating system

/// Everything the controllers need from the OS.
///
/// Calls are fire-and-forget from the controllers' point of view: an `Err`
/// is reported to the user but never rolls a transition back.
pub trait OsGateway: Send + 'static {
    /// Current pointer position in screen coordinates
    fn pointer_position(&mut self) -> Result<(i32, i32), String>;

    /// Press and release the left button where the pointer is
    fn click(&mut self, x: i32, y: i32) -> Result<(), String>;

    /// Ask the OS to power off after `delay_seconds`
    fn schedule_shutdown(&mut self, delay_seconds: u64) -> Result<(), String>;

    /// Abort a pending OS shutdown
    fn abort_shutdown(&mut self) -> Result<(), String>;
}

impl<G: OsGateway + ?Sized> OsGateway for Box<G> {
    fn pointer_position(&mut self) -> Result<(i32, i32), String> {
        (**self).pointer_position()
    }

    fn click(&mut self, x: i32, y: i32) -> Result<(), String> {
        (**self).click(x, y)
    }

    fn schedule_shutdown(&mut self, delay_seconds: u64) -> Result<(), String> {
        (**self).schedule_shutdown(delay_seconds)
    }

    fn abort_shutdown(&mut self) -> Result<(), String> {
        (**self).abort_shutdown()
    }
}
