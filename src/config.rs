//! Configuration module
//!
//! Configuration records, their device defaults, the per-field write policy
//! and TOML persistence of records.

pub mod base;
pub mod file;
pub mod params;
pub mod policy;
pub mod victor;

pub use base::{BaseMotorControllerConfiguration, BasePidSetConfiguration, SlotConfiguration};
pub use file::{load_configuration, save_configuration, ConfigFileError};
pub use policy::{should_write, write_gate, Field, WriteGate};
pub use victor::{VictorSpxConfiguration, VictorSpxPidSetConfiguration};
