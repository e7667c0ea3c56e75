//! Host records, middleware status, and local preconditions.
//!
//! These types mirror the fields the accounting host keeps on its company,
//! invoice and partner records. The integration reads them to build
//! middleware requests and writes back what the middleware reports.

mod builder;
mod error;
pub mod iso;
mod status;
mod store;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use status::*;
pub use store::*;
pub use types::*;
pub use validation::*;
