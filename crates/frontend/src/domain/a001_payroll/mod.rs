pub mod api;
pub mod controller;
pub mod messages;
pub mod state;
pub mod ui;
