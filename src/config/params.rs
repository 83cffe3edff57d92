//! Device default values of every persistent parameter
//!
//! A field whose value equals its constant here is considered "default" and
//! is skipped by optimized configuration writes.

use crate::types::{
    LimitSwitchNormal, RemoteFeedbackDevice, RemoteLimitSwitchSource, VelocityMeasPeriod,
};

/// Open-loop ramp [s from neutral to full]
pub const DEFAULT_OPEN_LOOP_RAMP: f64 = 0.0;

/// Closed-loop ramp [s from neutral to full]
pub const DEFAULT_CLOSED_LOOP_RAMP: f64 = 0.0;

/// Peak output [-1, 1]
pub const DEFAULT_PEAK_OUTPUT_FORWARD: f64 = 1.0;
pub const DEFAULT_PEAK_OUTPUT_REVERSE: f64 = -1.0;

/// Nominal output [-1, 1]
pub const DEFAULT_NOMINAL_OUTPUT_FORWARD: f64 = 0.0;
pub const DEFAULT_NOMINAL_OUTPUT_REVERSE: f64 = 0.0;

/// Neutral deadband (4%)
pub const DEFAULT_NEUTRAL_DEADBAND: f64 = 0.04;

/// Voltage compensation saturation [V], 0 = off
pub const DEFAULT_VOLTAGE_COMP_SATURATION: f64 = 0.0;

/// Bus voltage filter window [samples]
pub const DEFAULT_VOLTAGE_MEASUREMENT_FILTER: i32 = 32;

pub const DEFAULT_VELOCITY_MEASUREMENT_PERIOD: VelocityMeasPeriod = VelocityMeasPeriod::Period100Ms;

/// Velocity rolling average window [samples]
pub const DEFAULT_VELOCITY_MEASUREMENT_WINDOW: i32 = 64;

/// Soft limits [sensor units]
pub const DEFAULT_FORWARD_SOFT_LIMIT_THRESHOLD: i32 = 0;
pub const DEFAULT_REVERSE_SOFT_LIMIT_THRESHOLD: i32 = 0;
pub const DEFAULT_FORWARD_SOFT_LIMIT_ENABLE: bool = false;
pub const DEFAULT_REVERSE_SOFT_LIMIT_ENABLE: bool = false;

pub const DEFAULT_AUX_PID_POLARITY: bool = false;

/// Motion magic [sensor units per 100 ms, per 100 ms per s]
pub const DEFAULT_MOTION_CRUISE_VELOCITY: i32 = 0;
pub const DEFAULT_MOTION_ACCELERATION: i32 = 0;

pub const DEFAULT_CUSTOM_PARAM: i32 = 0;

/// Closed-loop slot gains
pub mod slot {
    pub const DEFAULT_KP: f64 = 0.0;
    pub const DEFAULT_KI: f64 = 0.0;
    pub const DEFAULT_KD: f64 = 0.0;
    pub const DEFAULT_KF: f64 = 0.0;

    /// Integral zone [sensor units], 0 = off
    pub const DEFAULT_INTEGRAL_ZONE: i32 = 0;

    pub const DEFAULT_ALLOWABLE_CLOSEDLOOP_ERROR: i32 = 0;

    /// Max integral accumulator, 0 = no limit
    pub const DEFAULT_MAX_INTEGRAL_ACCUMULATOR: f64 = 0.0;

    pub const DEFAULT_CLOSED_LOOP_PEAK_OUTPUT: f64 = 1.0;

    /// Closed-loop period [ms]
    pub const DEFAULT_CLOSED_LOOP_PERIOD: i32 = 1;
}

/// PID set feedback selection
pub mod pid {
    use super::RemoteFeedbackDevice;

    pub const DEFAULT_SELECTED_FEEDBACK_COEFFICIENT: f64 = 1.0;

    pub const DEFAULT_SELECTED_FEEDBACK_SENSOR: RemoteFeedbackDevice =
        RemoteFeedbackDevice::RemoteSensor0;

    /// Selection the firmware boots with. It differs from the record default,
    /// so the sensor selection is always written.
    pub const FIRMWARE_FEEDBACK_SENSOR: RemoteFeedbackDevice =
        RemoteFeedbackDevice::FactoryDefaultOff;
}

/// Remote limit switches
pub mod limit_switch {
    use super::{LimitSwitchNormal, RemoteLimitSwitchSource};

    pub const DEFAULT_SOURCE: RemoteLimitSwitchSource = RemoteLimitSwitchSource::Deactivated;
    pub const DEFAULT_NORMAL: LimitSwitchNormal = LimitSwitchNormal::NormallyOpen;
    pub const DEFAULT_DEVICE_ID: i32 = 0;
}

/// Sensor sum/difference terms
pub mod sensor_term {
    use super::RemoteFeedbackDevice;

    pub const DEFAULT_TERM: RemoteFeedbackDevice = RemoteFeedbackDevice::RemoteSensor0;
}
