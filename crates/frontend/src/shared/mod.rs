pub mod api_utils;
pub mod download;
pub mod navigation;
