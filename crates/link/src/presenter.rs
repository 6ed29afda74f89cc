//! Presentation surface seam.
//!
//! The dashboard UI is an external collaborator. It receives status signals
//! and row-append events through [`Presenter`]; the detail pane is filled on
//! demand through [`SessionHandle::select`](crate::SessionHandle::select).

use fleetglass_core::{Classification, StatusSeverity, StatusUpdate};
use fleetglass_feeds::ViewCounts;
use fleetglass_stream::{RowContent, ViewRow};
use tracing::{error, info, warn};

/// Consumer of session output
pub trait Presenter: Send + 'static {
    /// Status signal changed
    fn status(&mut self, update: &StatusUpdate);

    /// `row` was inserted at the head of `view`; `counts` are the live totals
    fn row_appended(&mut self, view: Classification, row: &ViewRow, counts: ViewCounts);
}

/// Presenter that writes everything to the tracing log
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_status: Option<StatusUpdate>,
}

impl LogPresenter {
    /// Most recent status update
    pub fn last_status(&self) -> Option<&StatusUpdate> {
        self.last_status.as_ref()
    }
}

impl Presenter for LogPresenter {
    fn status(&mut self, update: &StatusUpdate) {
        // Identical consecutive updates are logged once
        if self.last_status.as_ref() == Some(update) {
            return;
        }
        match update.severity {
            StatusSeverity::Connected | StatusSeverity::Info => {
                info!(severity = ?update.severity, "{}", update.message)
            }
            StatusSeverity::Disconnected | StatusSeverity::Warning => {
                warn!(severity = ?update.severity, "{}", update.message)
            }
            StatusSeverity::Error => error!(severity = ?update.severity, "{}", update.message),
        }
        self.last_status = Some(update.clone());
    }

    fn row_appended(&mut self, view: Classification, row: &ViewRow, counts: ViewCounts) {
        match &row.content {
            RowContent::Record(record) => info!(
                view = %view,
                vehicle_id = record.vehicle_id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
                speed = ?record.speed,
                battery = ?record.battery,
                temperature = ?record.temperature,
                anomaly_type = ?record.anomaly_type,
                normal_rows = counts.normal,
                anomaly_rows = counts.anomaly,
                "row appended"
            ),
            RowContent::Diagnostic { preview, .. } => warn!(
                view = %view,
                preview = %preview,
                normal_rows = counts.normal,
                anomaly_rows = counts.anomaly,
                "diagnostic row appended"
            ),
        }
    }
}
