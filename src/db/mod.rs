pub mod connection;
pub mod queries;

pub use connection::{make_pool, make_pool_with_size};
pub use queries::{fetch_canonical_records, get_record_count};
