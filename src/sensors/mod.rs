//! Host-side measurements feeding the LED state machine.

pub mod bandwidth;
