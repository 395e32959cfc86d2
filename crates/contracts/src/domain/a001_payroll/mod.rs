pub mod aggregate;
pub mod api;
pub mod sheet;

pub use aggregate::{
    ErrorResponse, FileImportSummary, PayrollListResponse, PayrollRecord, PayrollStats,
    UploadResponse,
};
