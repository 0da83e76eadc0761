//! Testing utilities for infrastructure integration tests
//!
//! Starts real backends in containers via testcontainers. Tests using them
//! are marked `#[ignore]` since they require Docker.

mod containers;

pub use containers::{ContainerError, RedisContainer, RedisContainerConfig};
