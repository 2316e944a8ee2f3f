// Host notification interface
//
// One interface with the three update callbacks instead of loose function
// pointers, so each updater instance carries its own observer.

use crate::version::Version;

/// Callbacks fired synchronously on the calling context during a check or an
/// apply. All methods default to no-ops; hosts implement what they need.
pub trait UpdateObserver {
    /// A newer release was found and its asset URL resolved.
    fn on_update_available(&mut self, _tag: &str, _version: Version, _url: &str) {}

    /// Fired after each flash-accepted chunk during streaming.
    fn on_progress(&mut self, _bytes_written: u64, _total_bytes: u64) {}

    /// Terminal notification for an apply attempt. On success the device
    /// restarts right after this returns.
    fn on_complete(&mut self, _success: bool, _message: &str) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl UpdateObserver for NoopObserver {}
