use serde::{Deserialize, Serialize};

/// One employee's salary line for one month, as stored by the ingestion service.
///
/// Amounts are VND. `net_salary` is expected to equal `total_income - deductions`;
/// the value is produced server-side and trusted as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub id: i64,
    pub employee_id: String,
    pub full_name: String,
    pub cccd: String,
    pub position: Option<String>,
    /// Year-month token, `YYYY-MM`
    pub salary_month: String,
    pub total_income: f64,
    pub deductions: f64,
    pub net_salary: f64,
    /// Name of the uploaded spreadsheet the row came from
    pub source_file: String,
    pub created_at: String,
}

impl PayrollRecord {
    /// Net salary derived from income and deductions.
    pub fn expected_net_salary(&self) -> f64 {
        self.total_income - self.deductions
    }

    pub fn is_net_consistent(&self) -> bool {
        (self.net_salary - self.expected_net_salary()).abs() < 0.5
    }

    /// Position for display, `-` when the sheet had none.
    pub fn position_label(&self) -> &str {
        match self.position.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => "-",
        }
    }
}

/// Aggregate figures shown as the dashboard summary cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollStats {
    pub total_records: i64,
    pub total_employees: i64,
    pub total_salary: f64,
}

/// Response of `GET /api/admin/payrolls`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollListResponse {
    pub payrolls: Vec<PayrollRecord>,
    pub stats: PayrollStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileImportSummary {
    pub file_name: String,
    pub records: usize,
}

/// Response of `POST /api/admin/upload`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub total_records: usize,
    pub files_processed: usize,
    #[serde(default)]
    pub files: Vec<FileImportSummary>,
}

/// Body of every failed JSON call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
