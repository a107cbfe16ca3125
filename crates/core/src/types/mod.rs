pub mod opinion_id;
pub mod query_state;
pub mod year_range;
