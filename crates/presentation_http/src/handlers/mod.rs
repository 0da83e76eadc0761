//! HTTP request handlers

pub mod batch;
pub mod health;
pub mod process;
pub mod status;
