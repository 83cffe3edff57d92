//! Settings shared by every motor controller model

use serde::{Deserialize, Serialize};

use super::params::{self, pid, slot};
use crate::types::VelocityMeasPeriod;

/// Gains and limits of one closed-loop slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfiguration {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub kf: f64,
    pub integral_zone: i32,
    pub allowable_closedloop_error: i32,
    pub max_integral_accumulator: f64,
    pub closed_loop_peak_output: f64,
    pub closed_loop_period: i32,
}

impl SlotConfiguration {
    pub const DEFAULT: Self = Self {
        kp: slot::DEFAULT_KP,
        ki: slot::DEFAULT_KI,
        kd: slot::DEFAULT_KD,
        kf: slot::DEFAULT_KF,
        integral_zone: slot::DEFAULT_INTEGRAL_ZONE,
        allowable_closedloop_error: slot::DEFAULT_ALLOWABLE_CLOSEDLOOP_ERROR,
        max_integral_accumulator: slot::DEFAULT_MAX_INTEGRAL_ACCUMULATOR,
        closed_loop_peak_output: slot::DEFAULT_CLOSED_LOOP_PEAK_OUTPUT,
        closed_loop_period: slot::DEFAULT_CLOSED_LOOP_PERIOD,
    };

    pub fn kp_different(&self) -> bool {
        self.kp != Self::DEFAULT.kp
    }

    pub fn ki_different(&self) -> bool {
        self.ki != Self::DEFAULT.ki
    }

    pub fn kd_different(&self) -> bool {
        self.kd != Self::DEFAULT.kd
    }

    pub fn kf_different(&self) -> bool {
        self.kf != Self::DEFAULT.kf
    }

    pub fn integral_zone_different(&self) -> bool {
        self.integral_zone != Self::DEFAULT.integral_zone
    }

    pub fn allowable_closedloop_error_different(&self) -> bool {
        self.allowable_closedloop_error != Self::DEFAULT.allowable_closedloop_error
    }

    pub fn max_integral_accumulator_different(&self) -> bool {
        self.max_integral_accumulator != Self::DEFAULT.max_integral_accumulator
    }

    pub fn closed_loop_peak_output_different(&self) -> bool {
        self.closed_loop_peak_output != Self::DEFAULT.closed_loop_peak_output
    }

    pub fn closed_loop_period_different(&self) -> bool {
        self.closed_loop_period != Self::DEFAULT.closed_loop_period
    }
}

impl Default for SlotConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// PID set fields every model has
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasePidSetConfiguration {
    /// Scalar applied to the selected feedback sensor (0, 1]
    pub selected_feedback_coefficient: f64,
}

impl BasePidSetConfiguration {
    pub const DEFAULT: Self = Self {
        selected_feedback_coefficient: pid::DEFAULT_SELECTED_FEEDBACK_COEFFICIENT,
    };

    pub fn selected_feedback_coefficient_different(&self) -> bool {
        self.selected_feedback_coefficient != Self::DEFAULT.selected_feedback_coefficient
    }
}

impl Default for BasePidSetConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Persistent settings handled by the shared configuration routines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseMotorControllerConfiguration {
    pub open_loop_ramp: f64,
    pub closed_loop_ramp: f64,
    pub peak_output_forward: f64,
    pub peak_output_reverse: f64,
    pub nominal_output_forward: f64,
    pub nominal_output_reverse: f64,
    pub neutral_deadband: f64,
    pub voltage_comp_saturation: f64,
    pub voltage_measurement_filter: i32,
    pub velocity_measurement_period: VelocityMeasPeriod,
    pub velocity_measurement_window: i32,
    pub forward_soft_limit_threshold: i32,
    pub reverse_soft_limit_threshold: i32,
    pub forward_soft_limit_enable: bool,
    pub reverse_soft_limit_enable: bool,
    pub slot0: SlotConfiguration,
    pub slot1: SlotConfiguration,
    pub slot2: SlotConfiguration,
    pub slot3: SlotConfiguration,
    pub aux_pid_polarity: bool,
    pub motion_cruise_velocity: i32,
    pub motion_acceleration: i32,
    pub custom_param0: i32,
    pub custom_param1: i32,
    /// Skip writes of fields that hold their default value
    pub enable_optimizations: bool,
}

impl BaseMotorControllerConfiguration {
    pub const DEFAULT: Self = Self {
        open_loop_ramp: params::DEFAULT_OPEN_LOOP_RAMP,
        closed_loop_ramp: params::DEFAULT_CLOSED_LOOP_RAMP,
        peak_output_forward: params::DEFAULT_PEAK_OUTPUT_FORWARD,
        peak_output_reverse: params::DEFAULT_PEAK_OUTPUT_REVERSE,
        nominal_output_forward: params::DEFAULT_NOMINAL_OUTPUT_FORWARD,
        nominal_output_reverse: params::DEFAULT_NOMINAL_OUTPUT_REVERSE,
        neutral_deadband: params::DEFAULT_NEUTRAL_DEADBAND,
        voltage_comp_saturation: params::DEFAULT_VOLTAGE_COMP_SATURATION,
        voltage_measurement_filter: params::DEFAULT_VOLTAGE_MEASUREMENT_FILTER,
        velocity_measurement_period: params::DEFAULT_VELOCITY_MEASUREMENT_PERIOD,
        velocity_measurement_window: params::DEFAULT_VELOCITY_MEASUREMENT_WINDOW,
        forward_soft_limit_threshold: params::DEFAULT_FORWARD_SOFT_LIMIT_THRESHOLD,
        reverse_soft_limit_threshold: params::DEFAULT_REVERSE_SOFT_LIMIT_THRESHOLD,
        forward_soft_limit_enable: params::DEFAULT_FORWARD_SOFT_LIMIT_ENABLE,
        reverse_soft_limit_enable: params::DEFAULT_REVERSE_SOFT_LIMIT_ENABLE,
        slot0: SlotConfiguration::DEFAULT,
        slot1: SlotConfiguration::DEFAULT,
        slot2: SlotConfiguration::DEFAULT,
        slot3: SlotConfiguration::DEFAULT,
        aux_pid_polarity: params::DEFAULT_AUX_PID_POLARITY,
        motion_cruise_velocity: params::DEFAULT_MOTION_CRUISE_VELOCITY,
        motion_acceleration: params::DEFAULT_MOTION_ACCELERATION,
        custom_param0: params::DEFAULT_CUSTOM_PARAM,
        custom_param1: params::DEFAULT_CUSTOM_PARAM,
        enable_optimizations: true,
    };

    /// Slots in device order
    pub fn slots(&self) -> [&SlotConfiguration; 4] {
        [&self.slot0, &self.slot1, &self.slot2, &self.slot3]
    }

    pub fn slots_mut(&mut self) -> [&mut SlotConfiguration; 4] {
        [
            &mut self.slot0,
            &mut self.slot1,
            &mut self.slot2,
            &mut self.slot3,
        ]
    }

    pub fn open_loop_ramp_different(&self) -> bool {
        self.open_loop_ramp != Self::DEFAULT.open_loop_ramp
    }

    pub fn closed_loop_ramp_different(&self) -> bool {
        self.closed_loop_ramp != Self::DEFAULT.closed_loop_ramp
    }

    pub fn peak_output_forward_different(&self) -> bool {
        self.peak_output_forward != Self::DEFAULT.peak_output_forward
    }

    pub fn peak_output_reverse_different(&self) -> bool {
        self.peak_output_reverse != Self::DEFAULT.peak_output_reverse
    }

    pub fn nominal_output_forward_different(&self) -> bool {
        self.nominal_output_forward != Self::DEFAULT.nominal_output_forward
    }

    pub fn nominal_output_reverse_different(&self) -> bool {
        self.nominal_output_reverse != Self::DEFAULT.nominal_output_reverse
    }

    pub fn neutral_deadband_different(&self) -> bool {
        self.neutral_deadband != Self::DEFAULT.neutral_deadband
    }

    pub fn voltage_comp_saturation_different(&self) -> bool {
        self.voltage_comp_saturation != Self::DEFAULT.voltage_comp_saturation
    }

    pub fn voltage_measurement_filter_different(&self) -> bool {
        self.voltage_measurement_filter != Self::DEFAULT.voltage_measurement_filter
    }

    pub fn velocity_measurement_period_different(&self) -> bool {
        self.velocity_measurement_period != Self::DEFAULT.velocity_measurement_period
    }

    pub fn velocity_measurement_window_different(&self) -> bool {
        self.velocity_measurement_window != Self::DEFAULT.velocity_measurement_window
    }

    pub fn forward_soft_limit_threshold_different(&self) -> bool {
        self.forward_soft_limit_threshold != Self::DEFAULT.forward_soft_limit_threshold
    }

    pub fn reverse_soft_limit_threshold_different(&self) -> bool {
        self.reverse_soft_limit_threshold != Self::DEFAULT.reverse_soft_limit_threshold
    }

    pub fn forward_soft_limit_enable_different(&self) -> bool {
        self.forward_soft_limit_enable != Self::DEFAULT.forward_soft_limit_enable
    }

    pub fn reverse_soft_limit_enable_different(&self) -> bool {
        self.reverse_soft_limit_enable != Self::DEFAULT.reverse_soft_limit_enable
    }

    pub fn aux_pid_polarity_different(&self) -> bool {
        self.aux_pid_polarity != Self::DEFAULT.aux_pid_polarity
    }

    pub fn motion_cruise_velocity_different(&self) -> bool {
        self.motion_cruise_velocity != Self::DEFAULT.motion_cruise_velocity
    }

    pub fn motion_acceleration_different(&self) -> bool {
        self.motion_acceleration != Self::DEFAULT.motion_acceleration
    }

    pub fn custom_param0_different(&self) -> bool {
        self.custom_param0 != Self::DEFAULT.custom_param0
    }

    pub fn custom_param1_different(&self) -> bool {
        self.custom_param1 != Self::DEFAULT.custom_param1
    }
}

impl Default for BaseMotorControllerConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_param_table() {
        let config = BaseMotorControllerConfiguration::default();
        assert_eq!(config.neutral_deadband, 0.04);
        assert_eq!(config.peak_output_reverse, -1.0);
        assert_eq!(config.slot2.closed_loop_peak_output, 1.0);
        assert!(config.enable_optimizations);
    }

    #[test]
    fn test_slot_differences() {
        let mut slot = SlotConfiguration::default();
        assert!(!slot.kp_different());
        assert!(!slot.closed_loop_period_different());

        slot.integral_zone = 200;
        assert!(slot.integral_zone_different());
        assert!(!slot.allowable_closedloop_error_different());
    }

    #[test]
    fn test_base_differences() {
        let mut config = BaseMotorControllerConfiguration::default();
        assert!(!config.neutral_deadband_different());
        assert!(!config.custom_param1_different());

        config.velocity_measurement_period = VelocityMeasPeriod::Period5Ms;
        config.aux_pid_polarity = true;
        assert!(config.velocity_measurement_period_different());
        assert!(config.aux_pid_polarity_different());
        assert!(!config.velocity_measurement_window_different());

        // Slot contents are compared per slot, not here
        config.slot1.kp = 2.0;
        assert!(config.slot1.kp_different());
        assert!(!config.slot0.kp_different());
    }

    #[test]
    fn test_coefficient_difference() {
        let mut pid = BasePidSetConfiguration::default();
        assert!(!pid.selected_feedback_coefficient_different());
        pid.selected_feedback_coefficient = 0.5;
        assert!(pid.selected_feedback_coefficient_different());
    }
}
