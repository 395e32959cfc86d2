//! Generated sample workbooks offered for download.
//!
//! Sheets are written as minimal SpreadsheetML packages (inline strings, no
//! styles part), which both Excel and the importer read.

use std::io::{Cursor, Write};

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use contracts::domain::a001_payroll::sheet::PayrollColumn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::excel_import::PayrollRow;

/// Months in the bundle archive, ending with the current one
pub const BUNDLE_MONTHS: u32 = 3;

const SHEET_NAME: &str = "Bang luong";

/// (employee id, name, CCCD, position, income, deductions)
const EMPLOYEES: [(&str, &str, &str, &str, f64, f64); 5] = [
    ("NV001", "Nguyễn Văn An", "049201000123", "Tổ trưởng", 12_500_000.0, 1_312_500.0),
    ("NV002", "Trần Thị Bình", "049302000456", "Công nhân may", 8_200_000.0, 861_000.0),
    ("NV003", "Lê Văn Cường", "049203000789", "Công nhân cắt", 8_000_000.0, 840_000.0),
    ("NV004", "Phạm Thị Dung", "049304001012", "Nhân viên KCS", 9_100_000.0, 955_500.0),
    ("NV005", "Hoàng Văn Em", "049205001345", "Thợ bảo trì", 10_400_000.0, 1_092_000.0),
];

/// Sample lines for one month; `bonus` is added to every income.
pub fn sample_rows(year: i32, month: u32, bonus: f64) -> Vec<PayrollRow> {
    EMPLOYEES
        .iter()
        .map(|&(id, name, cccd, position, income, deductions)| {
            let total_income = income + bonus;
            PayrollRow {
                employee_id: id.to_string(),
                full_name: name.to_string(),
                cccd: cccd.to_string(),
                position: Some(position.to_string()),
                salary_month: format!("{:04}-{:02}", year, month),
                total_income,
                deductions,
                net_salary: total_income - deductions,
            }
        })
        .collect()
}

/// Single-sheet workbook for the current month
pub fn build_sample_workbook(today: NaiveDate) -> Result<Vec<u8>> {
    build_workbook(&sample_rows(today.year(), today.month(), 0.0))
}

/// Zip of one workbook per month, oldest first
pub fn build_sample_bundle(today: NaiveDate) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, (year, month)) in recent_months(today, BUNDLE_MONTHS).into_iter().enumerate() {
        let workbook = build_workbook(&sample_rows(year, month, index as f64 * 150_000.0))?;
        writer.start_file(bundle_entry_name(year, month), options)?;
        writer.write_all(&workbook)?;
    }

    Ok(writer.finish()?.into_inner())
}

pub fn bundle_entry_name(year: i32, month: u32) -> String {
    format!("bang-luong-thang-{:02}-{:04}.xlsx", month, year)
}

/// `count` (year, month) pairs ending at `today`'s month
fn recent_months(today: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

/// Writes the header row and `rows` into a one-sheet `.xlsx`.
pub fn build_workbook(rows: &[PayrollRow]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", workbook_xml(SHEET_NAME)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];

    for (name, content) in parts {
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

fn workbook_xml(sheet_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape_xml(sheet_name)
    )
}

enum SheetCell<'a> {
    Text(&'a str),
    Number(f64),
}

fn sheet_xml(rows: &[PayrollRow]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    let header: Vec<SheetCell> = PayrollColumn::ALL
        .into_iter()
        .map(|c| SheetCell::Text(c.header()))
        .collect();
    push_row(&mut xml, 1, &header);

    for (index, row) in rows.iter().enumerate() {
        let cells: Vec<SheetCell> = PayrollColumn::ALL
            .into_iter()
            .map(|column| match column {
                PayrollColumn::EmployeeId => SheetCell::Text(&row.employee_id),
                PayrollColumn::FullName => SheetCell::Text(&row.full_name),
                PayrollColumn::Cccd => SheetCell::Text(&row.cccd),
                PayrollColumn::Position => SheetCell::Text(row.position.as_deref().unwrap_or("")),
                PayrollColumn::SalaryMonth => SheetCell::Text(&row.salary_month),
                PayrollColumn::TotalIncome => SheetCell::Number(row.total_income),
                PayrollColumn::Deductions => SheetCell::Number(row.deductions),
                PayrollColumn::NetSalary => SheetCell::Number(row.net_salary),
            })
            .collect();
        push_row(&mut xml, index + 2, &cells);
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row(xml: &mut String, row_number: usize, cells: &[SheetCell]) {
    xml.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (index, cell) in cells.iter().enumerate() {
        let reference = format!("{}{}", column_letter(index), row_number);
        match cell {
            SheetCell::Text(text) => xml.push_str(&format!(
                r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                reference,
                escape_xml(text)
            )),
            SheetCell::Number(n) => {
                xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, n))
            }
        }
    }
    xml.push_str("</row>");
}

/// 0 -> A, 25 -> Z, 26 -> AA
fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
