pub mod query;
pub mod request;
pub mod size;

pub use query::*;
pub use request::*;
pub use size::*;
