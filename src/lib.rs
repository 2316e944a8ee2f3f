//! Firmware self-update agent for networked embedded devices.
//!
//! Polls a GitHub release registry, decides whether a newer build exists for
//! the running board variant, streams the matching binary into the device's
//! flash writer and restarts into the new image.
//!
//! The crate is hardware-independent: the HTTP transport, the flash-write
//! primitive and the reset primitive are traits ([`HttpClient`],
//! [`FirmwareWriter`], [`SystemReset`]) implemented by the embedding
//! firmware, so every decision path here is testable on the host.

pub mod applier;
pub mod board;
pub mod config;
pub mod decision;
pub mod flash;
pub mod observer;
pub mod release;
pub mod schedule;
pub mod transport;
pub mod updater;
pub mod version;

pub use applier::{ErrorKind, FirmwareApplier, Phase, UpdateError, CHUNK_SIZE};
pub use board::{asset_name_for, resolve_asset_url, AssetNotFound, GENERIC_ASSET_NAME, UNKNOWN_VARIANT};
pub use config::UpdaterConfig;
pub use decision::{evaluate, Decision};
pub use flash::{FirmwareWriter, FlashError, SystemReset};
pub use observer::{NoopObserver, UpdateObserver};
pub use release::{fetch_latest, QueryError, ReleaseDescriptor};
pub use schedule::{SchedulerState, DEFAULT_CHECK_INTERVAL_MS};
pub use transport::{HttpClient, HttpResponse};
pub use updater::{CheckOutcome, Updater};
pub use version::{ParseError, Version};
