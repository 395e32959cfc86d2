//! User-facing texts of the payroll dashboard

use contracts::domain::a001_payroll::PayrollRecord;
use contracts::shared::money::format_vnd;

pub const NO_FILES_SELECTED: &str = "Vui lòng chọn ít nhất một file Excel";
pub const UPLOAD_FAILED: &str = "Có lỗi xảy ra khi upload file";
pub const SAMPLE_DOWNLOAD_REJECTED: &str = "Lỗi khi tải file mẫu";
pub const SAMPLE_DOWNLOAD_FAILED: &str = "Có lỗi xảy ra khi tải file mẫu";
pub const LOAD_FAILED: &str = "Không tải được dữ liệu lương. Hãy thử làm mới.";
pub const EMPTY_TABLE: &str = "Chưa có dữ liệu lương nào. Hãy upload file Excel để bắt đầu.";

pub fn upload_success(records: usize, files: usize) -> String {
    format!("Thành công! Đã import {} bản ghi từ {} file(s)", records, files)
}

/// Server-supplied error text, shown verbatim
pub fn upload_rejected(error: &str) -> String {
    format!("Lỗi: {}", error)
}

/// Tooltip for a row whose Thực Lĩnh differs from income minus deductions
pub fn net_mismatch_hint(record: &PayrollRecord) -> Option<String> {
    if record.is_net_consistent() {
        return None;
    }
    Some(format!(
        "Thực lĩnh khác Thu nhập - Khấu trừ ({})",
        format_vnd(record.expected_net_salary())
    ))
}
