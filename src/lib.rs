//! ethutild library.
//!
//! Drives a NAS front-panel LED controller over SMBus to show Ethernet
//! utilisation.  Everything that touches the host goes through the port
//! traits in [`app::ports`]; the binary wires in the Linux adapters.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod protocol;
pub mod sensors;
pub mod state;
