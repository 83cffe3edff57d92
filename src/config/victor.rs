//! Victor SPX configuration records and their default comparisons
//!
//! Every `*_different` predicate compares against the static `DEFAULT`
//! record, never against what was last written to the device.

use serde::{Deserialize, Serialize};

use super::base::{BaseMotorControllerConfiguration, BasePidSetConfiguration};
use super::params::{limit_switch, pid, sensor_term};
use crate::types::{LimitSwitchNormal, RemoteFeedbackDevice, RemoteLimitSwitchSource, SensorTerm};

/// Feedback selection of one PID set (primary or auxiliary)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictorSpxPidSetConfiguration {
    #[serde(flatten)]
    pub base: BasePidSetConfiguration,
    pub selected_feedback_sensor: RemoteFeedbackDevice,
}

impl VictorSpxPidSetConfiguration {
    pub const DEFAULT: Self = Self {
        base: BasePidSetConfiguration::DEFAULT,
        selected_feedback_sensor: pid::DEFAULT_SELECTED_FEEDBACK_SENSOR,
    };

    pub fn selected_feedback_coefficient_different(&self) -> bool {
        self.base.selected_feedback_coefficient_different()
    }

    pub fn selected_feedback_sensor_different(&self) -> bool {
        self.selected_feedback_sensor != Self::DEFAULT.selected_feedback_sensor
    }
}

impl Default for VictorSpxPidSetConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Every persistent setting of a Victor SPX
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictorSpxConfiguration {
    #[serde(flatten)]
    pub base: BaseMotorControllerConfiguration,
    pub primary_pid: VictorSpxPidSetConfiguration,
    pub auxiliary_pid: VictorSpxPidSetConfiguration,
    pub forward_limit_switch_source: RemoteLimitSwitchSource,
    pub reverse_limit_switch_source: RemoteLimitSwitchSource,
    pub forward_limit_switch_device_id: i32,
    pub reverse_limit_switch_device_id: i32,
    pub forward_limit_switch_normal: LimitSwitchNormal,
    pub reverse_limit_switch_normal: LimitSwitchNormal,
    pub sum0_term: RemoteFeedbackDevice,
    pub sum1_term: RemoteFeedbackDevice,
    pub diff0_term: RemoteFeedbackDevice,
    pub diff1_term: RemoteFeedbackDevice,
}

impl VictorSpxConfiguration {
    pub const DEFAULT: Self = Self {
        base: BaseMotorControllerConfiguration::DEFAULT,
        primary_pid: VictorSpxPidSetConfiguration::DEFAULT,
        auxiliary_pid: VictorSpxPidSetConfiguration::DEFAULT,
        forward_limit_switch_source: limit_switch::DEFAULT_SOURCE,
        reverse_limit_switch_source: limit_switch::DEFAULT_SOURCE,
        forward_limit_switch_device_id: limit_switch::DEFAULT_DEVICE_ID,
        reverse_limit_switch_device_id: limit_switch::DEFAULT_DEVICE_ID,
        forward_limit_switch_normal: limit_switch::DEFAULT_NORMAL,
        reverse_limit_switch_normal: limit_switch::DEFAULT_NORMAL,
        sum0_term: sensor_term::DEFAULT_TERM,
        sum1_term: sensor_term::DEFAULT_TERM,
        diff0_term: sensor_term::DEFAULT_TERM,
        diff1_term: sensor_term::DEFAULT_TERM,
    };

    pub fn enable_optimizations(&self) -> bool {
        self.base.enable_optimizations
    }

    /// Source, polarity and remote id are one combined write, so they are
    /// compared together.
    pub fn forward_limit_switch_different(&self) -> bool {
        self.forward_limit_switch_source != Self::DEFAULT.forward_limit_switch_source
            || self.forward_limit_switch_normal != Self::DEFAULT.forward_limit_switch_normal
            || self.forward_limit_switch_device_id != Self::DEFAULT.forward_limit_switch_device_id
    }

    pub fn reverse_limit_switch_different(&self) -> bool {
        self.reverse_limit_switch_source != Self::DEFAULT.reverse_limit_switch_source
            || self.reverse_limit_switch_normal != Self::DEFAULT.reverse_limit_switch_normal
            || self.reverse_limit_switch_device_id != Self::DEFAULT.reverse_limit_switch_device_id
    }

    pub fn sum0_term_different(&self) -> bool {
        self.sum0_term != Self::DEFAULT.sum0_term
    }

    pub fn sum1_term_different(&self) -> bool {
        self.sum1_term != Self::DEFAULT.sum1_term
    }

    pub fn diff0_term_different(&self) -> bool {
        self.diff0_term != Self::DEFAULT.diff0_term
    }

    pub fn diff1_term_different(&self) -> bool {
        self.diff1_term != Self::DEFAULT.diff1_term
    }

    pub fn sensor_term(&self, term: SensorTerm) -> RemoteFeedbackDevice {
        match term {
            SensorTerm::Sum0 => self.sum0_term,
            SensorTerm::Sum1 => self.sum1_term,
            SensorTerm::Diff0 => self.diff0_term,
            SensorTerm::Diff1 => self.diff1_term,
        }
    }

    pub fn sensor_term_mut(&mut self, term: SensorTerm) -> &mut RemoteFeedbackDevice {
        match term {
            SensorTerm::Sum0 => &mut self.sum0_term,
            SensorTerm::Sum1 => &mut self.sum1_term,
            SensorTerm::Diff0 => &mut self.diff0_term,
            SensorTerm::Diff1 => &mut self.diff1_term,
        }
    }

    pub fn sensor_term_different(&self, term: SensorTerm) -> bool {
        match term {
            SensorTerm::Sum0 => self.sum0_term_different(),
            SensorTerm::Sum1 => self.sum1_term_different(),
            SensorTerm::Diff0 => self.diff0_term_different(),
            SensorTerm::Diff1 => self.diff1_term_different(),
        }
    }
}

impl Default for VictorSpxConfiguration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_has_no_differences() {
        let config = VictorSpxConfiguration::default();
        assert!(!config.forward_limit_switch_different());
        assert!(!config.reverse_limit_switch_different());
        for term in SensorTerm::ALL {
            assert!(!config.sensor_term_different(term));
        }
        assert!(!config.primary_pid.selected_feedback_coefficient_different());
        assert!(!config.auxiliary_pid.selected_feedback_sensor_different());
    }

    #[test]
    fn test_limit_switch_triples_are_independent() {
        let mut config = VictorSpxConfiguration::default();
        config.forward_limit_switch_normal = LimitSwitchNormal::NormallyClosed;
        assert!(config.forward_limit_switch_different());
        assert!(!config.reverse_limit_switch_different());

        let mut config = VictorSpxConfiguration::default();
        config.reverse_limit_switch_device_id = 7;
        assert!(!config.forward_limit_switch_different());
        assert!(config.reverse_limit_switch_different());
    }

    #[test]
    fn test_each_sensor_term_checked_alone() {
        let mut config = VictorSpxConfiguration::default();
        *config.sensor_term_mut(SensorTerm::Diff1) = RemoteFeedbackDevice::RemoteSensor1;
        assert!(config.diff1_term_different());
        assert!(!config.sum0_term_different());
        assert!(!config.sum1_term_different());
        assert!(!config.diff0_term_different());
        assert_eq!(config.sensor_term(SensorTerm::Diff1), RemoteFeedbackDevice::RemoteSensor1);
    }

    #[test]
    fn test_equal_value_is_not_different() {
        let mut config = VictorSpxConfiguration::default();
        config.sum0_term = RemoteFeedbackDevice::RemoteSensor0;
        assert!(!config.sum0_term_different());
    }
}
