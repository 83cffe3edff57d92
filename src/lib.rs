//! Persistent configuration of Victor SPX motor controllers over CAN
//!
//! [`VictorSpx`] writes a [`VictorSpxConfiguration`] to the device and reads
//! it back through any [`ParameterChannel`].

pub mod can;
pub mod channel;
pub mod config;
pub mod controller;
pub mod param;
pub mod settings;
pub mod status;
pub mod types;
pub mod victor_spx;

pub use channel::ParameterChannel;
pub use crate::config::{VictorSpxConfiguration, VictorSpxPidSetConfiguration};
pub use controller::BaseMotorController;
pub use param::ParamEnum;
pub use settings::Settings;
pub use status::{ErrorAccumulator, StatusCode};
pub use victor_spx::VictorSpx;
