pub mod aggregator;
pub mod value;

pub use aggregator::{merge, serialize, write_document, NanEncoding};
pub use value::{parse_float, ResultSet, ResultValue};
