pub mod a001_payroll;
