pub mod excel_import;
pub mod repository;
pub mod sample;
pub mod service;
