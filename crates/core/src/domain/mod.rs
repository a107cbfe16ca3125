pub mod filters;
pub mod format;
pub mod opinion;
pub mod search;
