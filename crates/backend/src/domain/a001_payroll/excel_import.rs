//! Reads payroll rows out of uploaded `.xlsx` / `.xls` workbooks.
//!
//! Only the first sheet is read. The header row is the first row holding the
//! employee-code header; rows above it (titles, notes) are ignored, and data rows
//! with an empty employee code are skipped.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};
use contracts::domain::a001_payroll::sheet::PayrollColumn;
use thiserror::Error;

/// Errors are shown verbatim to the uploader, hence the Vietnamese texts.
#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    #[error("Không có file nào được tải lên")]
    NoFiles,
    #[error("File {file}: định dạng không được hỗ trợ (chỉ chấp nhận .xlsx, .xls)")]
    UnsupportedFormat { file: String },
    #[error("File {file}: không đọc được nội dung Excel ({reason})")]
    Unreadable { file: String, reason: String },
    #[error("File {file}: không tìm thấy dòng tiêu đề có cột \"Mã NV\"")]
    HeaderNotFound { file: String },
    #[error("File {file}: thiếu cột \"{column}\"")]
    MissingColumn { file: String, column: &'static str },
    #[error("File {file}, dòng {row}: thiếu giá trị cột \"{column}\"")]
    MissingValue {
        file: String,
        row: usize,
        column: &'static str,
    },
    #[error("File {file}, dòng {row}: \"{value}\" ở cột \"{column}\" không phải số tiền hợp lệ")]
    InvalidAmount {
        file: String,
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("File {file}: không có dòng dữ liệu nào")]
    NoRows { file: String },
}

/// Cell content after conversion from the workbook representation
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display text; whole numbers lose the `.0`
    fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.fract() == 0.0 => format!("{:.0}", n),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(d) => excel_serial_to_date(d.as_f64())
                .map(CellValue::Date)
                .unwrap_or(CellValue::Number(d.as_f64())),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(_) | Data::Empty => CellValue::Empty,
        }
    }
}

/// One salary line read from a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRow {
    pub employee_id: String,
    pub full_name: String,
    pub cccd: String,
    pub position: Option<String>,
    pub salary_month: String,
    pub total_income: f64,
    pub deductions: f64,
    pub net_salary: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub file_name: String,
    pub rows: Vec<PayrollRow>,
}

/// Parses one uploaded workbook. Fails on the first problem found.
pub fn parse_workbook(file_name: &str, bytes: &[u8]) -> Result<ParsedFile, ImportError> {
    if !is_supported_file_name(file_name) {
        return Err(ImportError::UnsupportedFormat {
            file: file_name.to_string(),
        });
    }

    let unreadable = |reason: String| ImportError::Unreadable {
        file: file_name.to_string(),
        reason,
    };

    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("workbook has no sheets".to_string()))?
        .map_err(|e| unreadable(e.to_string()))?;

    let cells: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    let rows = parse_rows(file_name, &cells)?;
    Ok(ParsedFile {
        file_name: file_name.to_string(),
        rows,
    })
}

pub fn is_supported_file_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

/// Maps sheet rows to payroll rows; `cells` starts at the first sheet row.
pub fn parse_rows(file_name: &str, cells: &[Vec<CellValue>]) -> Result<Vec<PayrollRow>, ImportError> {
    let file = || file_name.to_string();

    let header_index = cells
        .iter()
        .position(|row| {
            row.iter().any(|cell| {
                matches!(cell, CellValue::Text(t) if PayrollColumn::from_header(t) == Some(PayrollColumn::EmployeeId))
            })
        })
        .ok_or_else(|| ImportError::HeaderNotFound { file: file() })?;

    let mut columns: HashMap<PayrollColumn, usize> = HashMap::new();
    for (index, cell) in cells[header_index].iter().enumerate() {
        if let CellValue::Text(text) = cell {
            if let Some(column) = PayrollColumn::from_header(text) {
                columns.entry(column).or_insert(index);
            }
        }
    }

    if let Some(missing) = PayrollColumn::ALL
        .into_iter()
        .find(|c| c.is_required() && !columns.contains_key(c))
    {
        return Err(ImportError::MissingColumn {
            file: file(),
            column: missing.header(),
        });
    }

    let mut rows = Vec::new();
    for (offset, row) in cells[header_index + 1..].iter().enumerate() {
        // 1-based sheet row number for messages
        let row_number = header_index + offset + 2;
        let cell = |column: PayrollColumn| -> &CellValue {
            columns
                .get(&column)
                .and_then(|&i| row.get(i))
                .unwrap_or(&CellValue::Empty)
        };

        let employee_id = cell(PayrollColumn::EmployeeId).as_text();
        if employee_id.is_empty() {
            continue;
        }

        let required_text = |column: PayrollColumn| -> Result<String, ImportError> {
            let value = cell(column).as_text();
            if value.is_empty() {
                Err(ImportError::MissingValue {
                    file: file(),
                    row: row_number,
                    column: column.header(),
                })
            } else {
                Ok(value)
            }
        };

        let amount = |column: PayrollColumn| -> Result<Option<f64>, ImportError> {
            let value = cell(column);
            if value.is_empty() {
                return Ok(None);
            }
            parse_amount(value)
                .map(Some)
                .ok_or_else(|| ImportError::InvalidAmount {
                    file: file(),
                    row: row_number,
                    column: column.header(),
                    value: value.as_text(),
                })
        };

        let full_name = required_text(PayrollColumn::FullName)?;
        let month_cell = cell(PayrollColumn::SalaryMonth);
        if month_cell.is_empty() {
            return Err(ImportError::MissingValue {
                file: file(),
                row: row_number,
                column: PayrollColumn::SalaryMonth.header(),
            });
        }
        let salary_month = normalize_month(month_cell);

        let total_income = amount(PayrollColumn::TotalIncome)?.unwrap_or(0.0);
        let deductions = amount(PayrollColumn::Deductions)?.unwrap_or(0.0);
        let net_salary = amount(PayrollColumn::NetSalary)?.unwrap_or(total_income - deductions);

        let position = Some(cell(PayrollColumn::Position).as_text()).filter(|p| !p.is_empty());

        rows.push(PayrollRow {
            employee_id,
            full_name,
            cccd: cell(PayrollColumn::Cccd).as_text(),
            position,
            salary_month,
            total_income,
            deductions,
            net_salary,
        });
    }

    if rows.is_empty() {
        return Err(ImportError::NoRows { file: file() });
    }

    Ok(rows)
}

/// Amount in whole VND. Text may carry `.`/`,` thousands grouping, spaces and
/// a `₫`, `đ` or `VND` suffix. A final separator followed by one or two digits
/// is a decimal mark. Separators that do not split digits into triads make the
/// text invalid.
pub fn parse_amount(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) => Some(n.round()),
        CellValue::Text(text) => parse_amount_text(text),
        CellValue::Empty | CellValue::Date(_) => None,
    }
}

fn parse_amount_text(text: &str) -> Option<f64> {
    let lower = text.trim().to_lowercase();
    let stripped = lower
        .trim_end_matches("vnd")
        .trim_end_matches('₫')
        .trim_end_matches('đ');
    let compact: String = stripped
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}'))
        .collect();
    let (negative, body) = match compact.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, compact.as_str()),
    };
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let (integer, fraction) = match body.rfind(|c: char| c == '.' || c == ',') {
        Some(i) if (1..=2).contains(&(body.len() - i - 1)) => {
            (&body[..i], Some((&body[i..=i], &body[i + 1..])))
        }
        _ => (body, None),
    };

    let (digits, group_separator) = ungroup(integer)?;
    let fraction_digits = match fraction {
        // One character cannot be both the grouping and the decimal mark
        Some((mark, _)) if group_separator == Some(mark) => return None,
        Some((_, digits)) => digits,
        None => "0",
    };

    let value = format!("{}.{}", digits, fraction_digits).parse::<f64>().ok()?.round();
    Some(if negative { -value } else { value })
}

/// Strips thousands separators, returning the bare digits and the separator used.
fn ungroup(integer: &str) -> Option<(String, Option<&str>)> {
    let Some(index) = integer.find(|c: char| !c.is_ascii_digit()) else {
        return (!integer.is_empty()).then(|| (integer.to_string(), None));
    };
    let separator = &integer[index..=index];
    let groups: Vec<&str> = integer.split(separator).collect();
    let well_formed = groups.iter().enumerate().all(|(i, group)| {
        let size_ok = if i == 0 {
            (1..=3).contains(&group.len())
        } else {
            group.len() == 3
        };
        size_ok && group.chars().all(|c| c.is_ascii_digit())
    });
    well_formed.then(|| (groups.concat(), Some(separator)))
}

/// Brings month cells to `YYYY-MM` when the format is recognised,
/// otherwise keeps the trimmed text.
pub fn normalize_month(cell: &CellValue) -> String {
    match cell {
        CellValue::Date(d) => d.format("%Y-%m").to_string(),
        other => {
            let text = other.as_text();
            let cleaned = text
                .to_lowercase()
                .trim_start_matches("tháng")
                .trim()
                .to_string();
            let parts: Vec<&str> = cleaned
                .split(|c| c == '/' || c == '-' || c == '.')
                .map(str::trim)
                .collect();

            let as_month = |y: &str, m: &str| -> Option<String> {
                let year: i32 = y.parse().ok()?;
                let month: u32 = m.parse().ok()?;
                if y.len() == 4 && (1..=12).contains(&month) {
                    Some(format!("{:04}-{:02}", year, month))
                } else {
                    None
                }
            };

            match parts.as_slice() {
                [a, b] => as_month(a, b).or_else(|| as_month(b, a)).unwrap_or(text),
                _ => text,
            }
        }
    }
}

/// Excel serial day number (1900 date system) to a calendar date
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::days(serial.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn header() -> Vec<CellValue> {
        PayrollColumn::ALL
            .into_iter()
            .map(|c| text(c.header()))
            .collect()
    }

    #[test]
    fn test_parse_rows_with_title_above_header() {
        let cells = vec![
            vec![text("BẢNG LƯƠNG THÁNG 01/2024")],
            vec![],
            header(),
            vec![
                text("NV001"),
                text("Nguyễn Văn An"),
                text("049201000123"),
                text("Tổ trưởng"),
                text("01/2024"),
                num(12_500_000.0),
                num(1_312_500.0),
                num(11_187_500.0),
            ],
            vec![CellValue::Empty, text("ghi chú cuối bảng")],
        ];

        let rows = parse_rows("t1.xlsx", &cells).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.employee_id, "NV001");
        assert_eq!(row.position.as_deref(), Some("Tổ trưởng"));
        assert_eq!(row.salary_month, "2024-01");
        assert_eq!(row.net_salary, 11_187_500.0);
    }

    #[test]
    fn test_net_salary_defaults_to_income_minus_deductions() {
        let cells = vec![
            vec![
                text("Mã NV"),
                text("Họ Tên"),
                text("CCCD"),
                text("Tháng Lương"),
                text("Thu Nhập"),
                text("Khấu Trừ"),
            ],
            vec![
                num(1001.0),
                text("Trần Thị Bình"),
                num(49302000456.0),
                CellValue::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
                text("8.200.000 ₫"),
                text("861,000"),
            ],
        ];

        let rows = parse_rows("t2.xlsx", &cells).unwrap();
        assert_eq!(rows[0].employee_id, "1001");
        assert_eq!(rows[0].cccd, "49302000456");
        assert_eq!(rows[0].position, None);
        assert_eq!(rows[0].salary_month, "2024-02");
        assert_eq!(rows[0].total_income, 8_200_000.0);
        assert_eq!(rows[0].net_salary, 7_339_000.0);
    }

    #[test]
    fn test_missing_required_column_names_the_file() {
        let cells = vec![vec![text("Mã NV"), text("Họ Tên"), text("Thu Nhập")]];
        let err = parse_rows("thieu-cot.xlsx", &cells).unwrap_err();
        assert_eq!(
            err,
            ImportError::MissingColumn {
                file: "thieu-cot.xlsx".into(),
                column: "CCCD"
            }
        );
        assert!(err.to_string().contains("thieu-cot.xlsx"));
    }

    #[test]
    fn test_header_not_found() {
        let cells = vec![vec![text("STT"), text("Tên")]];
        assert!(matches!(
            parse_rows("x.xlsx", &cells),
            Err(ImportError::HeaderNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_amount_reports_row() {
        let mut bad = vec![
            text("NV009"),
            text("Lê Văn C"),
            text("1"),
            text(""),
            text("2024-03"),
            text("mười triệu"),
            num(0.0),
        ];
        bad.push(CellValue::Empty);
        let cells = vec![header(), bad];

        let err = parse_rows("x.xlsx", &cells).unwrap_err();
        assert_eq!(
            err,
            ImportError::InvalidAmount {
                file: "x.xlsx".into(),
                row: 2,
                column: "Thu Nhập",
                value: "mười triệu".into()
            }
        );
    }

    #[test]
    fn test_sheet_without_data_rows() {
        let cells = vec![header(), vec![CellValue::Empty; 8]];
        assert_eq!(
            parse_rows("trong.xlsx", &cells),
            Err(ImportError::NoRows {
                file: "trong.xlsx".into()
            })
        );
    }

    #[test]
    fn test_unsupported_extension() {
        assert_eq!(
            parse_workbook("luong.csv", b"a;b"),
            Err(ImportError::UnsupportedFormat {
                file: "luong.csv".into()
            })
        );
        assert!(is_supported_file_name("LUONG.XLSX"));
        assert!(is_supported_file_name("old.xls"));
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        assert!(matches!(
            parse_workbook("hong.xlsx", b"not a workbook"),
            Err(ImportError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&text("1.500.000")), Some(1_500_000.0));
        assert_eq!(parse_amount(&text("1,500,000 VND")), Some(1_500_000.0));
        assert_eq!(parse_amount(&text("-250.000đ")), Some(-250_000.0));
        assert_eq!(parse_amount(&num(42.0)), Some(42.0));
        assert_eq!(parse_amount(&text("₫")), None);
        assert_eq!(parse_amount(&text("abc")), None);
    }

    #[test]
    fn test_parse_amount_decimal_part_is_rounded() {
        assert_eq!(parse_amount(&text("1,500,000.00")), Some(1_500_000.0));
        assert_eq!(parse_amount(&text("1.500.000,50")), Some(1_500_001.0));
        assert_eq!(parse_amount(&text("8200000.5")), Some(8_200_001.0));
        assert_eq!(parse_amount(&text("7.339.000,4 ₫")), Some(7_339_000.0));
        assert_eq!(parse_amount(&num(1_312_500.25)), Some(1_312_500.0));
    }

    #[test]
    fn test_parse_amount_rejects_misplaced_separators() {
        assert_eq!(parse_amount(&text("15,00,000")), None);
        assert_eq!(parse_amount(&text("1.500.000.00")), None);
        assert_eq!(parse_amount(&text("1.500,000")), None);
        assert_eq!(parse_amount(&text("1500.")), None);
        assert_eq!(parse_amount(&text("-")), None);
    }

    #[test]
    fn test_text_amount_with_decimals_is_stored_unscaled() {
        let cells = vec![
            header(),
            vec![
                text("NV003"),
                text("Lê Văn Cường"),
                text("049203000789"),
                text(""),
                text("2024-03"),
                text("1,500,000.00"),
                text("0"),
                text("1,500,000.00"),
            ],
        ];

        let rows = parse_rows("t3.xlsx", &cells).unwrap();
        assert_eq!(rows[0].total_income, 1_500_000.0);
        assert_eq!(rows[0].net_salary, 1_500_000.0);
    }

    #[test]
    fn test_malformed_grouping_reports_row() {
        let cells = vec![
            header(),
            vec![
                text("NV004"),
                text("Phạm Thị Dung"),
                text("049204000111"),
                text(""),
                text("2024-03"),
                text("15,00,000"),
            ],
        ];

        assert!(matches!(
            parse_rows("t4.xlsx", &cells),
            Err(ImportError::InvalidAmount { row: 2, column: "Thu Nhập", .. })
        ));
    }

    #[test]
    fn test_normalize_month() {
        assert_eq!(normalize_month(&text("1/2024")), "2024-01");
        assert_eq!(normalize_month(&text("2024-12")), "2024-12");
        assert_eq!(normalize_month(&text("Tháng 03/2024")), "2024-03");
        assert_eq!(normalize_month(&text("Quý 1")), "Quý 1");
        assert_eq!(normalize_month(&text("13/2024")), "13/2024");
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(
            excel_serial_to_date(45292.0),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(excel_serial_to_date(0.0), None);
    }
}
