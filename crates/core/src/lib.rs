pub mod domain;
pub mod error;
pub mod pagination;
pub mod params;
pub mod reconcile;
pub mod types;

/// Results requested per search page. The backend accepts other sizes, the
/// interface never asks for them.
pub const PER_PAGE: u32 = 20;
