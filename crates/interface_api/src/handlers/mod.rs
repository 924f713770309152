//! Request handlers

pub mod appeals;
pub mod reviews;
pub mod stats;
pub mod health;
