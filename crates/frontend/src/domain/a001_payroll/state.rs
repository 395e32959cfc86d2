use contracts::domain::a001_payroll::api::{
    SAMPLE_BUNDLE_FILE_NAME, SAMPLE_BUNDLE_PATH, SAMPLE_FILE_NAME, SAMPLE_PATH,
    XLSX_CONTENT_TYPE, ZIP_CONTENT_TYPE,
};
use contracts::domain::a001_payroll::{PayrollRecord, PayrollStats};

use super::messages;

/// Busy flag of one dashboard action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionStatus {
    #[default]
    Idle,
    Pending,
}

impl ActionStatus {
    pub fn is_pending(self) -> bool {
        self == ActionStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Outcome line shown under the upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Single,
    Bundle,
}

impl SampleKind {
    pub fn path(self) -> &'static str {
        match self {
            SampleKind::Single => SAMPLE_PATH,
            SampleKind::Bundle => SAMPLE_BUNDLE_PATH,
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            SampleKind::Single => SAMPLE_FILE_NAME,
            SampleKind::Bundle => SAMPLE_BUNDLE_FILE_NAME,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            SampleKind::Single => XLSX_CONTENT_TYPE,
            SampleKind::Bundle => ZIP_CONTENT_TYPE,
        }
    }
}

/// Ephemeral view state of the dashboard; `F` is the selected-file handle.
#[derive(Debug, Clone)]
pub struct DashboardState<F> {
    pub payrolls: Vec<PayrollRecord>,
    pub stats: PayrollStats,
    pub selected_files: Vec<F>,
    /// True until the first load attempt finishes
    pub initial_loading: bool,
    pub upload: ActionStatus,
    pub sample: ActionStatus,
    pub bundle: ActionStatus,
    pub notice: Option<Notice>,
    pub load_error: Option<String>,
}

impl<F> Default for DashboardState<F> {
    fn default() -> Self {
        Self {
            payrolls: Vec::new(),
            stats: PayrollStats::default(),
            selected_files: Vec::new(),
            initial_loading: true,
            upload: ActionStatus::Idle,
            sample: ActionStatus::Idle,
            bundle: ActionStatus::Idle,
            notice: None,
            load_error: None,
        }
    }
}

impl<F> DashboardState<F> {
    pub fn sample_status(&self, kind: SampleKind) -> ActionStatus {
        match kind {
            SampleKind::Single => self.sample,
            SampleKind::Bundle => self.bundle,
        }
    }

    pub fn sample_status_mut(&mut self, kind: SampleKind) -> &mut ActionStatus {
        match kind {
            SampleKind::Single => &mut self.sample,
            SampleKind::Bundle => &mut self.bundle,
        }
    }

    /// Upload button is enabled only with a selection and nothing in flight
    pub fn can_upload(&self) -> bool {
        !self.upload.is_pending() && !self.selected_files.is_empty()
    }

    /// Text shown under the table while there is nothing to list
    pub fn empty_placeholder(&self) -> Option<&'static str> {
        self.payrolls.is_empty().then_some(messages::EMPTY_TABLE)
    }
}
