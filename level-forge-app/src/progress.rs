//! Throttled progress reports for the collapse passes.

use humantime::format_duration;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use wfc_core::{ProgressCallback, ProgressInfo, WfcError};

/// Logs collapse progress at most once per interval.
#[derive(Debug)]
pub struct ConsoleProgressReporter {
    interval: Duration,
    last_report: Option<Instant>,
}

impl ConsoleProgressReporter {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_report: None,
        }
    }

    /// Returns the report line when one is due at `now`.
    pub fn report_at(&mut self, info: &ProgressInfo, now: Instant) -> Option<String> {
        if let Some(last) = self.last_report {
            if now.duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_report = Some(now);
        Some(format_progress(info))
    }
}

/// One-line summary of a progress snapshot, with an ETA once cells are collapsing.
pub fn format_progress(info: &ProgressInfo) -> String {
    let percentage = if info.total_cells > 0 {
        (info.collapsed_cells as f64 / info.total_cells as f64) * 100.0
    } else {
        100.0
    };
    let elapsed = Duration::from_millis(
        u64::try_from(info.elapsed_time.as_millis()).unwrap_or(u64::MAX),
    );
    let mut line = format!(
        "Progress: Iter {}, Collapsed {}/{} ({:.1}%), Elapsed: {}",
        info.iterations,
        info.collapsed_cells,
        info.total_cells,
        percentage,
        format_duration(elapsed)
    );
    if info.collapsed_cells > 0 && info.collapsed_cells < info.total_cells {
        let remaining = info.total_cells - info.collapsed_cells;
        let per_cell = elapsed / u32::try_from(info.collapsed_cells).unwrap_or(u32::MAX);
        let eta = per_cell.saturating_mul(u32::try_from(remaining).unwrap_or(u32::MAX));
        line.push_str(&format!(", ETA: {}", format_duration(eta)));
    }
    line
}

/// Wraps a reporter into a callback for [`level_gen::LevelGenerator::set_progress_callback`].
pub fn progress_callback(interval: Duration) -> ProgressCallback {
    let reporter = Mutex::new(ConsoleProgressReporter::new(interval));
    Box::new(move |info: ProgressInfo| {
        let line = reporter
            .lock()
            .map_err(|_| WfcError::InternalError("Progress mutex poisoned".to_owned()))?
            .report_at(&info, Instant::now());
        if let Some(line) = line {
            log::info!("{}", line);
        }
        Ok(())
    })
}
