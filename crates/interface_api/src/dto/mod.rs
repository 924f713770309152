//! Request and response DTOs

pub mod appeals;
pub mod reviews;
pub mod stats;
