pub mod api;
pub mod controller;
pub mod detail;
pub mod filters;
pub mod latest;
pub mod session;
