// Staged firmware apply
//
// Apply flow:
// 1. Connect to the asset URL, read the declared length
// 2. Pre-flight the flash writer for that length
// 3. Stream bounded chunks into the writer, reporting progress
// 4. Verify the byte count, commit, restart
//
// A failure at any stage fires the completion callback, returns the phase to
// Idle and leaves the previous firmware bootable; the writer's transaction
// model guarantees the new slot is not bootable until end() succeeds.

use std::fmt;
use std::io::Read;

use crate::flash::{FirmwareWriter, FlashError, SystemReset};
use crate::observer::UpdateObserver;
use crate::transport::HttpClient;

/// Streaming chunk size; one flash write per chunk.
pub const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Connecting,
    Streaming,
    Verifying,
    Finalizing,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An update session is already active on this applier.
    Busy,
    /// Connect failure, non-2xx download status, or missing content length.
    Network,
    /// Flash writer rejected the declared size before any byte was written.
    InsufficientSpace,
    /// Flash writer failed or refused part of a chunk mid-stream.
    WriteFailure,
    /// Stream ended before every declared byte was written.
    Truncated,
    /// Commit of a fully written image failed.
    FinalizeFailure,
}

#[derive(Debug)]
pub struct UpdateError {
    kind: ErrorKind,
    message: String,
}

impl UpdateError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UpdateError {}

// State for one apply run; dropped once the phase reaches Success or Failed.
#[derive(Debug, Clone)]
struct UpdateSession {
    source_url: String,
    declared_total: u64,
    bytes_written: u64,
}

/// The update state machine. One session at a time; entry only from Idle.
pub struct FirmwareApplier {
    phase: Phase,
    session: Option<UpdateSession>,
}

impl Default for FirmwareApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl FirmwareApplier {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            session: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Progress of the active session as `(bytes_written, declared_total)`,
    /// or `None` when no session is running.
    pub fn progress(&self) -> Option<(u64, u64)> {
        self.session
            .as_ref()
            .map(|s| (s.bytes_written, s.declared_total))
    }

    /// Downloads `url` and stages it into the flash writer.
    ///
    /// On success the completion callback fires with `success = true` and the
    /// device restarts; on real hardware this call does not return. On any
    /// failure the completion callback fires with `success = false`, the
    /// phase returns to Idle and the device keeps running the old firmware.
    pub fn perform_update<C, W, R>(
        &mut self,
        url: &str,
        client: &mut C,
        writer: &mut W,
        reset: &mut R,
        observer: &mut dyn UpdateObserver,
    ) -> Result<(), UpdateError>
    where
        C: HttpClient,
        W: FirmwareWriter,
        R: SystemReset,
    {
        if self.phase != Phase::Idle {
            // Reject without touching the active session or its callbacks
            return Err(UpdateError::new(
                ErrorKind::Busy,
                "an update session is already in progress",
            ));
        }

        self.phase = Phase::Connecting;
        self.session = Some(UpdateSession {
            source_url: url.to_string(),
            declared_total: 0,
            bytes_written: 0,
        });
        log::info!("starting firmware update from {url}");

        let mut response = match client.get(url) {
            Ok(r) => r,
            Err(e) => {
                return Err(self.fail(
                    observer,
                    ErrorKind::Network,
                    format!("download request failed: {e:#}"),
                ))
            }
        };
        if !response.is_success() {
            return Err(self.fail(
                observer,
                ErrorKind::Network,
                format!("download returned HTTP {}", response.status),
            ));
        }

        let total = match response.content_length {
            Some(len) if len > 0 => len,
            _ => {
                return Err(self.fail(
                    observer,
                    ErrorKind::Network,
                    "download response did not declare a content length",
                ))
            }
        };
        if let Some(session) = self.session.as_mut() {
            session.declared_total = total;
        }

        // Pre-flight: the writer decides whether the image fits, before any
        // byte is streamed
        match writer.begin(total) {
            Ok(()) => {}
            Err(FlashError::InsufficientSpace) => {
                return Err(self.fail(
                    observer,
                    ErrorKind::InsufficientSpace,
                    format!("flash has no room for a {total} byte image"),
                ))
            }
            Err(e) => {
                return Err(self.fail(
                    observer,
                    ErrorKind::WriteFailure,
                    format!("flash transaction begin failed: {e}"),
                ))
            }
        }

        self.phase = Phase::Streaming;
        let mut written: u64 = 0;
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let read = match response.body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    return Err(self.fail(
                        observer,
                        ErrorKind::Truncated,
                        format!("connection lost after {written} of {total} bytes: {e}"),
                    ))
                }
            };
            let accepted = match writer.write(&buf[..read]) {
                Ok(n) => n,
                Err(e) => {
                    return Err(self.fail(
                        observer,
                        ErrorKind::WriteFailure,
                        format!("flash write failed after {written} of {total} bytes: {e}"),
                    ))
                }
            };
            written += accepted as u64;
            if let Some(session) = self.session.as_mut() {
                session.bytes_written = written;
            }
            if accepted < read {
                return Err(self.fail(
                    observer,
                    ErrorKind::WriteFailure,
                    format!("flash stopped accepting data at {written} of {total} bytes"),
                ));
            }
            observer.on_progress(written, total);
        }

        self.phase = Phase::Verifying;
        if written != total || !writer.is_finished() {
            return Err(self.fail(
                observer,
                ErrorKind::Truncated,
                format!("image incomplete: {written} of {total} bytes written"),
            ));
        }

        self.phase = Phase::Finalizing;
        if let Err(e) = writer.end() {
            return Err(self.fail(
                observer,
                ErrorKind::FinalizeFailure,
                format!("failed to commit firmware image: {e}"),
            ));
        }

        self.phase = Phase::Success;
        self.session = None;
        log::info!("firmware update complete ({total} bytes), restarting");
        observer.on_complete(true, "update applied, restarting");
        reset.restart();
        Ok(())
    }

    // Terminal failure: notify, log, re-arm for the next attempt. The device
    // is not restarted and the previous image stays bootable.
    fn fail(
        &mut self,
        observer: &mut dyn UpdateObserver,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> UpdateError {
        let message = message.into();
        self.phase = Phase::Failed;
        if let Some(session) = self.session.as_ref() {
            log::error!("update from {} failed: {message}", session.source_url);
        } else {
            log::error!("update failed: {message}");
        }
        observer.on_complete(false, &message);
        self.phase = Phase::Idle;
        self.session = None;
        UpdateError::new(kind, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::transport::HttpResponse;

    struct UnreachableHttp;

    impl HttpClient for UnreachableHttp {
        type Body = std::io::Empty;

        fn get(&mut self, _url: &str) -> anyhow::Result<HttpResponse<Self::Body>> {
            panic!("transport must not be touched while busy");
        }
    }

    struct UnreachableFlash;

    impl FirmwareWriter for UnreachableFlash {
        fn begin(&mut self, _expected_size: u64) -> Result<(), FlashError> {
            panic!("flash must not be touched while busy");
        }
        fn write(&mut self, _chunk: &[u8]) -> Result<usize, FlashError> {
            panic!("flash must not be touched while busy");
        }
        fn end(&mut self) -> Result<(), FlashError> {
            panic!("flash must not be touched while busy");
        }
        fn is_finished(&self) -> bool {
            false
        }
    }

    struct NoReset;

    impl SystemReset for NoReset {
        fn restart(&mut self) {}
    }

    #[test]
    fn test_busy_while_streaming_rejects_without_side_effects() {
        let mut applier = FirmwareApplier::new();
        applier.phase = Phase::Streaming;
        applier.session = Some(UpdateSession {
            source_url: "https://example.com/firmware.bin".to_string(),
            declared_total: 1000,
            bytes_written: 500,
        });

        let err = applier
            .perform_update(
                "https://example.com/other.bin",
                &mut UnreachableHttp,
                &mut UnreachableFlash,
                &mut NoReset,
                &mut NoopObserver,
            )
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Busy);
        assert_eq!(applier.phase(), Phase::Streaming);
        let session = applier.session.as_ref().unwrap();
        assert_eq!(session.bytes_written, 500);
        assert_eq!(session.source_url, "https://example.com/firmware.bin");
    }
}
