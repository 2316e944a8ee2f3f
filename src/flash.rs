// Flash writer and reset seams
//
// The platform's OTA primitive (esp_ota_begin/write/end or equivalent) sits
// behind FirmwareWriter. It is the sole authority on flash space and on
// failure atomicity: the new image slot must not become bootable until end()
// succeeds, so an aborted session leaves the previous firmware authoritative.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// The target slot cannot hold the declared image size.
    InsufficientSpace,
    WriteFailed,
    FinalizeFailed,
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::InsufficientSpace => write!(f, "insufficient flash space"),
            FlashError::WriteFailed => write!(f, "flash write failed"),
            FlashError::FinalizeFailed => write!(f, "flash finalize failed"),
        }
    }
}

impl std::error::Error for FlashError {}

/// Staged write access to the device's executable flash region.
pub trait FirmwareWriter {
    /// Opens an update transaction sized for the declared image length.
    /// Rejects with [`FlashError::InsufficientSpace`] before any byte lands.
    fn begin(&mut self, expected_size: u64) -> Result<(), FlashError>;

    /// Appends a chunk; returns how many bytes the writer accepted.
    fn write(&mut self, chunk: &[u8]) -> Result<usize, FlashError>;

    /// Commits the transaction and marks the new image bootable.
    fn end(&mut self) -> Result<(), FlashError>;

    /// True once every expected byte has been accepted.
    fn is_finished(&self) -> bool;
}

/// Device restart capability. On real hardware `restart` does not return;
/// test doubles record the call and do.
pub trait SystemReset {
    fn restart(&mut self);
}
