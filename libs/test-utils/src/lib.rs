pub mod postgres;
pub mod test_helpers;

pub use postgres::TestPostgresContainer;
pub use test_helpers::*;
