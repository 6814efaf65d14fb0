//! Record model shared by filters, security locks and backends

mod record;
mod value;

pub use record::Record;
pub use value::Value;
