//! Application core: domain orchestration, zero direct I/O.
//!
//! The poll loop, its events, and the port traits every adapter
//! implements.  All interaction with the bus, the network stack and the
//! filesystem happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real hardware.

pub mod events;
pub mod ports;
pub mod service;
