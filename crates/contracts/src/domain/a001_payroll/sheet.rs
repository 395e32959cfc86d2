//! Column layout of a payroll spreadsheet.
//!
//! The sample generator writes [`PayrollColumn::ALL`] headers in this order and the
//! importer resolves columns through [`PayrollColumn::from_header`], so an unchanged
//! sample always imports.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayrollColumn {
    EmployeeId,
    FullName,
    Cccd,
    Position,
    SalaryMonth,
    TotalIncome,
    Deductions,
    NetSalary,
}

impl PayrollColumn {
    pub const ALL: [PayrollColumn; 8] = [
        PayrollColumn::EmployeeId,
        PayrollColumn::FullName,
        PayrollColumn::Cccd,
        PayrollColumn::Position,
        PayrollColumn::SalaryMonth,
        PayrollColumn::TotalIncome,
        PayrollColumn::Deductions,
        PayrollColumn::NetSalary,
    ];

    /// Header text as written in generated sheets and shown in the dashboard table.
    pub fn header(self) -> &'static str {
        match self {
            PayrollColumn::EmployeeId => "Mã NV",
            PayrollColumn::FullName => "Họ Tên",
            PayrollColumn::Cccd => "CCCD",
            PayrollColumn::Position => "Chức Vụ",
            PayrollColumn::SalaryMonth => "Tháng Lương",
            PayrollColumn::TotalIncome => "Thu Nhập",
            PayrollColumn::Deductions => "Khấu Trừ",
            PayrollColumn::NetSalary => "Thực Lĩnh",
        }
    }

    /// Lower-case header spellings accepted on import, canonical one first.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            PayrollColumn::EmployeeId => &["mã nv", "mã nhân viên", "ma nv", "employee_id"],
            PayrollColumn::FullName => &["họ tên", "họ và tên", "ho ten", "full_name"],
            PayrollColumn::Cccd => &["cccd", "số cccd", "cccd/cmnd", "cmnd"],
            PayrollColumn::Position => &["chức vụ", "chuc vu", "position"],
            PayrollColumn::SalaryMonth => &["tháng lương", "tháng", "thang luong", "salary_month"],
            PayrollColumn::TotalIncome => &["thu nhập", "tổng thu nhập", "thu nhap", "total_income"],
            PayrollColumn::Deductions => &["khấu trừ", "tổng khấu trừ", "khau tru", "deductions"],
            PayrollColumn::NetSalary => &["thực lĩnh", "thực nhận", "thuc linh", "net_salary"],
        }
    }

    /// Position and net salary may be absent; the rest must be present in every sheet.
    pub fn is_required(self) -> bool {
        !matches!(self, PayrollColumn::Position | PayrollColumn::NetSalary)
    }

    /// Resolves a header cell, ignoring case and surrounding or repeated whitespace.
    pub fn from_header(text: &str) -> Option<Self> {
        let normalized = normalize_header(text);
        if normalized.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|column| column.aliases().contains(&normalized.as_str()))
    }
}

fn normalize_header(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
