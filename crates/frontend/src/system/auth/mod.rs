pub mod api;
pub mod guard;
pub mod storage;
