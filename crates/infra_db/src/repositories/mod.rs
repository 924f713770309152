//! Repository implementations
//!
//! Repositories own the SQL and map to plain row structs. Conversion to
//! domain types happens in the adapters.

pub mod reviews;
pub mod stats;
pub mod veterans;

pub use reviews::ReviewRepository;
pub use stats::StatsCacheRepository;
pub use veterans::VeteranRepository;
