//! Device drivers.

pub mod led_controller;
