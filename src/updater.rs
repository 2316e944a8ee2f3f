// Top-level update agent
//
// Owns the device capabilities and runs the whole pipeline: query the
// registry, compare versions, resolve the board asset, notify the host, and
// (on command or automatically) hand off to the applier. Single execution
// context, no internal threads; the host drives it from its own loop.

use crate::applier::{FirmwareApplier, Phase, UpdateError};
use crate::board;
use crate::config::UpdaterConfig;
use crate::decision::{self, Decision};
use crate::flash::{FirmwareWriter, SystemReset};
use crate::observer::{NoopObserver, UpdateObserver};
use crate::release::{self, QueryError};
use crate::schedule::SchedulerState;
use crate::transport::HttpClient;
use crate::version::Version;

/// Result of one check cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    UpToDate,
    UpdateAvailable {
        version: Version,
        tag: String,
        url: String,
    },
    /// A newer release exists but carries no asset for this board. Reported,
    /// not treated as an update failure: no update was ever started.
    AssetMissing { tag: String },
}

pub struct Updater<C, W, R> {
    repo: String,
    running: Version,
    board_variant: String,
    scheduler: SchedulerState,
    applier: FirmwareApplier,
    client: C,
    writer: W,
    reset: R,
    observer: Option<Box<dyn UpdateObserver>>,
}

impl<C, W, R> Updater<C, W, R>
where
    C: HttpClient,
    W: FirmwareWriter,
    R: SystemReset,
{
    /// `repo` is "owner/name"; `running_version_code` is the compiled-in
    /// version of the image currently executing (e.g. `102` for v1.2).
    pub fn new(
        repo: impl Into<String>,
        running_version_code: u32,
        client: C,
        writer: W,
        reset: R,
    ) -> Self {
        Self {
            repo: repo.into(),
            running: Version::from_code(running_version_code),
            board_variant: board::UNKNOWN_VARIANT.to_string(),
            scheduler: SchedulerState::new(),
            applier: FirmwareApplier::new(),
            client,
            writer,
            reset,
            observer: None,
        }
    }

    pub fn from_config(
        config: &UpdaterConfig,
        running_version_code: u32,
        client: C,
        writer: W,
        reset: R,
    ) -> Self {
        let mut updater = Self::new(&*config.repo, running_version_code, client, writer, reset);
        updater.set_board_variant(&*config.board_variant);
        updater.set_update_interval(config.check_interval_ms);
        updater.enable_auto_update(config.auto_update);
        updater
    }

    pub fn set_board_variant(&mut self, variant: impl Into<String>) {
        self.board_variant = variant.into();
    }

    pub fn set_update_interval(&mut self, interval_ms: u32) {
        self.scheduler.set_interval(interval_ms);
    }

    pub fn enable_auto_update(&mut self, enabled: bool) {
        self.scheduler.set_auto_update(enabled);
    }

    pub fn set_observer(&mut self, observer: Box<dyn UpdateObserver>) {
        self.observer = Some(observer);
    }

    pub fn running_version(&self) -> Version {
        self.running
    }

    pub fn update_phase(&self) -> Phase {
        self.applier.phase()
    }

    /// Progress of an in-flight apply, for host status surfaces.
    pub fn update_progress(&self) -> Option<(u64, u64)> {
        self.applier.progress()
    }

    /// Whether enough time has passed since the last recorded check.
    pub fn should_check_for_updates(&self, now_ms: u32) -> bool {
        self.scheduler.is_due(now_ms)
    }

    pub fn update_last_check_time(&mut self, now_ms: u32) {
        self.scheduler.record_check(now_ms);
    }

    /// Runs one check cycle: fetch the latest release, compare versions and
    /// resolve this board's asset.
    ///
    /// Fires `on_update_available` when a newer release with a matching asset
    /// exists; with auto-update enabled the apply runs immediately and its
    /// outcome reaches the host through the completion callback.
    pub fn check_for_updates(&mut self) -> Result<CheckOutcome, QueryError> {
        let release = release::fetch_latest(&mut self.client, &self.repo)?;

        match decision::evaluate(self.running, &release) {
            Decision::UpToDate => {
                log::info!(
                    "firmware {} is current (latest release {})",
                    self.running,
                    release.tag
                );
                Ok(CheckOutcome::UpToDate)
            }
            Decision::Available { version, tag } => {
                let url = match board::resolve_asset_url(&release, &self.board_variant) {
                    Ok(url) => url.to_string(),
                    Err(e) => {
                        log::warn!("release {tag} has no build for {}: {e}", self.board_variant);
                        return Ok(CheckOutcome::AssetMissing { tag });
                    }
                };
                log::info!("update available: {} -> {version} at {url}", self.running);
                if let Some(observer) = self.observer.as_deref_mut() {
                    observer.on_update_available(&tag, version, &url);
                }
                if self.scheduler.auto_update() {
                    // The completion callback has already told the host; the
                    // check outcome still reports what was found
                    if let Err(e) = self.do_perform(&url) {
                        log::warn!("automatic update failed: {e}");
                    }
                }
                Ok(CheckOutcome::UpdateAvailable { version, tag, url })
            }
        }
    }

    /// Applies the firmware at `url`. On success the device restarts and on
    /// real hardware this does not return; see [`FirmwareApplier`].
    pub fn perform_update(&mut self, url: &str) -> Result<(), UpdateError> {
        self.do_perform(url)
    }

    fn do_perform(&mut self, url: &str) -> Result<(), UpdateError> {
        let mut noop = NoopObserver;
        let Self {
            applier,
            client,
            writer,
            reset,
            observer,
            ..
        } = self;
        let observer: &mut dyn UpdateObserver = match observer.as_deref_mut() {
            Some(o) => o,
            None => &mut noop,
        };
        applier.perform_update(url, client, writer, reset, observer)
    }
}
