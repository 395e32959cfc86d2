//! Endpoint paths and fixed file names shared by the client and the server.

pub const LOGIN_PATH: &str = "/api/admin/login";
pub const PAYROLLS_PATH: &str = "/api/admin/payrolls";
pub const UPLOAD_PATH: &str = "/api/admin/upload";
pub const SAMPLE_PATH: &str = "/api/admin/download-sample";
pub const SAMPLE_BUNDLE_PATH: &str = "/api/admin/download-multiple-samples";

/// Save name of the single sample workbook
pub const SAMPLE_FILE_NAME: &str = "bang-luong-mau.xlsx";
/// Save name of the multi-file sample archive
pub const SAMPLE_BUNDLE_FILE_NAME: &str = "bang-luong-mau-files.zip";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Prefix of the multipart part names carrying uploaded files
pub const UPLOAD_FIELD_PREFIX: &str = "file";

/// Multipart part name for the file at `index`: `file0`, `file1`, ...
pub fn upload_field_name(index: usize) -> String {
    format!("{}{}", UPLOAD_FIELD_PREFIX, index)
}
