//! Services layer (ports + adapters).
//!
//! - `ports`: collaborator contracts and data types used by the kernel.
//! - `adapters`: tokio/OS implementations and the runtime that executes effects.

pub mod adapters;
pub mod ports;
