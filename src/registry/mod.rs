//! # Service Registry
//!
//! Client side of a Eureka-compatible service registry: register this
//! instance, keep it alive, deregister on shutdown and cache the registry.

pub mod client;
pub mod instance;

pub use client::{Heartbeat, RegistryClient};
pub use instance::{InstanceInfo, PortInfo};
