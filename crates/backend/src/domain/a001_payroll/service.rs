use super::excel_import::{self, ImportError, ParsedFile};
use super::repository;
use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_payroll::{FileImportSummary, PayrollListResponse, UploadResponse};
use sea_orm::{ConnectionTrait, TransactionTrait};
use thiserror::Error;

/// One multipart file part
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    /// Bad input, reported to the client as 400
    #[error(transparent)]
    Invalid(#[from] ImportError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// All stored records, newest first, with the summary figures.
pub async fn list_with_stats<C>(conn: &C) -> Result<PayrollListResponse>
where
    C: ConnectionTrait,
{
    let payrolls = repository::list_all(conn).await?;
    let stats = repository::get_stats(conn).await?;
    Ok(PayrollListResponse { payrolls, stats })
}

/// Parses every file, then stores all rows in one transaction.
/// One bad file rejects the whole upload.
pub async fn import_files<C>(conn: &C, files: Vec<UploadedFile>) -> Result<UploadResponse, UploadError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if files.is_empty() {
        return Err(ImportError::NoFiles.into());
    }

    let parsed = tokio::task::spawn_blocking(move || parse_all(&files))
        .await
        .map_err(anyhow::Error::from)??;

    let created_at = Utc::now().to_rfc3339();
    let txn = conn.begin().await.map_err(anyhow::Error::from)?;

    let mut summaries = Vec::with_capacity(parsed.len());
    for file in &parsed {
        let records = repository::insert_rows(&txn, &file.file_name, &file.rows, &created_at).await?;
        tracing::info!("Imported {} payroll rows from '{}'", records, file.file_name);
        summaries.push(FileImportSummary {
            file_name: file.file_name.clone(),
            records,
        });
    }

    txn.commit().await.map_err(anyhow::Error::from)?;

    Ok(UploadResponse {
        total_records: summaries.iter().map(|s| s.records).sum(),
        files_processed: summaries.len(),
        files: summaries,
    })
}

fn parse_all(files: &[UploadedFile]) -> Result<Vec<ParsedFile>, ImportError> {
    files
        .iter()
        .map(|f| excel_import::parse_workbook(&f.file_name, &f.bytes))
        .collect()
}
