//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                          |
//! |---------------|---------------|--------------------------------------|
//! | `i2c_bus`     | BusTransport  | any `embedded_hal::i2c::I2c` bus     |
//! | `i2c_locator` | BusLocator    | `/sys/class/i2c-dev`                 |
//! | `sysfs_net`   | CounterSource | `/sys/class/net`, `/proc/net/dev`    |
//! | `config_file` | ConfigPort    | INI file                             |
//! | `log_sink`    | EventSink     | `log` facade                         |
//! | `time`        | DelayNs       | `std::thread::sleep`                 |

pub mod config_file;
pub mod i2c_bus;
pub mod i2c_locator;
pub mod log_sink;
pub mod sysfs_net;
pub mod time;
