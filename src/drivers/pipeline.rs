use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use log::{debug, error, info, warn};
use crate::drivers::error::{ErrorKind, VizError};
use crate::drivers::rate::PacketRate;
use crate::drivers::record::decode_record;
use crate::drivers::source::LineSource;
use crate::drivers::SensorHistories;
/// How many accepted lines are echoed to the log at startup.
const ECHO_FIRST_LINES: u64 = 3;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopping,
}
/// Outcome of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Nothing arrived (timeout or blank line).
    Idle,
    /// A line was read but rejected; histories are untouched.
    Skipped(ErrorKind),
    /// One sample was appended to every history.
    Updated,
    /// The driver is stopping; nothing was read.
    Stopped,
}
#[derive(Clone, Copy, Debug)]
pub struct DriverSettings {
    pub history_len: usize,
    /// Warn once after this long without data; zero disables the warning.
    pub idle_warning: Duration,
    pub rate_window: Duration,
}
impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            history_len: 100,
            idle_warning: Duration::from_secs(5),
            rate_window: Duration::from_secs(1),
        }
    }
}
/// Tracks how long the source has been silent.
struct IdleWatch {
    threshold: Duration,
    silent_since: Option<Instant>,
    warned: bool,
}
impl IdleWatch {
    fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            silent_since: None,
            warned: false,
        }
    }
    /// Returns how long the device has been silent when a warning is due.
    fn on_empty(&mut self, now: Instant) -> Option<Duration> {
        if self.threshold.is_zero() || self.warned {
            return None;
        }
        let since = *self.silent_since.get_or_insert(now);
        let silent = now.saturating_duration_since(since);
        if silent >= self.threshold {
            self.warned = true;
            return Some(silent);
        }
        None
    }
    fn on_data(&mut self) {
        self.silent_since = None;
        self.warned = false;
    }
}
/// Single-threaded read → decode → append loop. Owns the line source and
/// releases it exactly once on shutdown.
pub struct Driver<S: LineSource> {
    source: Option<S>,
    histories: SensorHistories,
    state: DriverState,
    rate: PacketRate,
    idle: IdleWatch,
    accepted: u64,
    skipped: u64,
}
impl<S: LineSource> Driver<S> {
    pub fn new(source: S, settings: DriverSettings) -> Self {
        info!(
            "Reading from {} (history of {} samples)",
            source.describe(),
            settings.history_len
        );
        Self {
            source: Some(source),
            histories: SensorHistories::with_capacity(settings.history_len),
            state: DriverState::Running,
            rate: PacketRate::new(settings.rate_window),
            idle: IdleWatch::new(settings.idle_warning),
            accepted: 0,
            skipped: 0,
        }
    }
    pub fn histories(&self) -> &SensorHistories {
        &self.histories
    }
    #[cfg(test)]
    pub fn state(&self) -> DriverState {
        self.state
    }
    #[cfg(test)]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
    #[cfg(test)]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
    #[cfg(test)]
    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }
    /// One raw iteration; failures are returned to the caller untouched.
    pub fn pump_once(&mut self) -> Result<Step, VizError> {
        if self.state == DriverState::Stopping {
            return Ok(Step::Stopped);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(Step::Stopped);
        };
        let next = source.next_line();
        // undecodable bytes still mean the device is talking
        if matches!(next, Err(VizError::Utf8(_))) {
            self.idle.on_data();
        }
        let Some(line) = next? else {
            if let Some(silent) = self.idle.on_empty(Instant::now()) {
                warn!("No data from device for {:.1}s", silent.as_secs_f64());
            }
            return Ok(Step::Idle);
        };
        self.idle.on_data();
        let record = decode_record(&line).map_err(|err| {
            debug!("Rejected line: {line}");
            err
        })?;
        self.histories.push(&record);
        self.accepted += 1;
        if self.accepted <= ECHO_FIRST_LINES {
            info!("Packet {}: {line}", self.accepted);
        }
        if let Some(report) = self.rate.record() {
            info!(
                "Current rate: {:.1} Hz | Average rate: {:.1} Hz | Total packets: {}",
                report.current_hz, report.average_hz, report.total
            );
        }
        Ok(Step::Updated)
    }
    /// One iteration at the loop boundary: a bad line or a device hiccup is
    /// reported and skipped, never fatal.
    pub fn step(&mut self) -> Step {
        match self.pump_once() {
            Ok(step) => step,
            Err(err) => Step::Skipped(self.report(&err)),
        }
    }
    /// Log a failed iteration by kind and count it as skipped.
    pub fn report(&mut self, err: &VizError) -> ErrorKind {
        self.skipped += 1;
        let kind = err.kind();
        match kind {
            ErrorKind::Decode => warn!("Invalid line skipped: {err}"),
            ErrorKind::Field => warn!("Incomplete record skipped: {err}"),
            ErrorKind::Device => warn!("Read error: {err}"),
            ErrorKind::Render => warn!("Frame not drawn: {err}"),
            ErrorKind::Config => error!("{err}"),
        }
        kind
    }
    pub fn request_stop(&mut self) {
        if self.state == DriverState::Running {
            info!("Stopping visualization...");
            self.state = DriverState::Stopping;
        }
    }
    /// Release the source. Returns `true` only on the call that actually
    /// released it.
    pub fn shutdown(&mut self) -> bool {
        self.request_stop();
        match self.source.take() {
            Some(source) => {
                let name = source.describe();
                drop(source);
                info!("Closed {name} ({} packets, {} skipped)", self.accepted, self.skipped);
                true
            }
            None => false,
        }
    }
    /// Drive the loop until `stop` is raised, calling `on_update` after every
    /// appended record. The source is released before returning.
    pub fn run<F>(&mut self, stop: &AtomicBool, mut on_update: F)
    where
        F: FnMut(&SensorHistories) -> Result<(), VizError>,
    {
        while self.state == DriverState::Running {
            if stop.load(Ordering::SeqCst) {
                self.request_stop();
                break;
            }
            if self.step() == Step::Updated {
                if let Err(err) = on_update(&self.histories) {
                    self.report(&err);
                }
            }
        }
        self.shutdown();
    }
}
impl<S: LineSource> Drop for Driver<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
