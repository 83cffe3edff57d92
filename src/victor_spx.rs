//! Victor SPX configuration synchronizer
//!
//! Writes a [`VictorSpxConfiguration`] to the device's persistent parameters
//! and reads it back. With optimizations enabled only fields that differ
//! from their device default are written; which fields honour the flag is
//! decided by [`crate::config::policy`].

use tracing::{info, warn};

use crate::can::protocol;
use crate::channel::ParameterChannel;
use crate::config::policy::Field;
use crate::config::victor::{VictorSpxConfiguration, VictorSpxPidSetConfiguration};
use crate::controller::BaseMotorController;
use crate::param::ParamEnum;
use crate::status::{ErrorAccumulator, StatusCode};
use crate::types::{
    LimitSwitchNormal, PidIdx, RemoteFeedbackDevice, RemoteLimitSwitchSource, SensorTerm,
};

/// Victor SPX motor controller
#[derive(Debug)]
pub struct VictorSpx<C> {
    base: BaseMotorController<C>,
}

impl<C: ParameterChannel> VictorSpx<C> {
    /// # Arguments
    /// * `device_number` - CAN device number [0, 62]
    /// * `channel` - Parameter access to the device
    ///
    /// # Returns
    /// * `Err(StatusCode::InvalidParamValue)` if the device number is out of range
    pub fn new(device_number: u8, channel: C) -> Result<Self, StatusCode> {
        let base_id = protocol::base_arbitration_id(device_number).ok_or(StatusCode::InvalidParamValue)?;
        info!("Victor SPX #{} at base id 0x{:08X}", device_number, base_id);
        Ok(Self {
            base: BaseMotorController::new(base_id, channel),
        })
    }

    /// Shared configuration routines and single-field calls
    pub fn base(&self) -> &BaseMotorController<C> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseMotorController<C> {
        &mut self.base
    }

    pub fn into_channel(self) -> C {
        self.base.into_channel()
    }

    /// Write the persistent settings of one PID set
    ///
    /// The coefficient follows the optimization flag. The sensor selection
    /// is always written: the firmware boots with a selection the record
    /// default does not match.
    ///
    /// # Arguments
    /// * `pid` - PID set settings
    /// * `pid_idx` - Primary or auxiliary closed loop
    /// * `timeout_ms` - Acknowledge timeout, 0 = fire and forget
    /// * `enable_optimizations` - Skip the coefficient if it is default
    ///
    /// # Returns
    /// The worse of the two write statuses
    pub fn configure_pid(
        &mut self,
        pid: &VictorSpxPidSetConfiguration,
        pid_idx: PidIdx,
        timeout_ms: u64,
        enable_optimizations: bool,
    ) -> StatusCode {
        let mut errors = ErrorAccumulator::new();

        self.base.write_gated(
            &mut errors,
            Field::PidFeedbackCoefficient,
            pid.selected_feedback_coefficient_different(),
            enable_optimizations,
            |c| c.config_selected_feedback_coefficient(pid.base.selected_feedback_coefficient, pid_idx, timeout_ms),
        );
        self.base.write_gated(
            &mut errors,
            Field::PidFeedbackSensor,
            pid.selected_feedback_sensor_different(),
            enable_optimizations,
            |c| c.config_selected_feedback_sensor(pid.selected_feedback_sensor, pid_idx, timeout_ms),
        );

        errors.worst()
    }

    /// Read the persistent settings of one PID set into `pid`
    ///
    /// # Returns
    /// The worst read status; fields whose read failed are unchanged
    pub fn get_pid_configs(
        &mut self,
        pid: &mut VictorSpxPidSetConfiguration,
        pid_idx: PidIdx,
        timeout_ms: u64,
    ) -> StatusCode {
        let mut errors = ErrorAccumulator::new();
        errors.append(self.base.base_get_pid_configs(&mut pid.base, pid_idx, timeout_ms));

        if let Some(sensor) = self.base.read_enum(
            &mut errors,
            ParamEnum::FeedbackSensorType,
            pid_idx.ordinal(),
            timeout_ms,
            RemoteFeedbackDevice::from_raw,
        ) {
            pid.selected_feedback_sensor = sensor;
        }

        errors.worst()
    }

    /// Write every persistent setting
    ///
    /// Steps run in a fixed order and all of them are attempted, whatever
    /// the earlier ones returned.
    ///
    /// # Returns
    /// The worst status of all writes, `Ok` if nothing was written
    pub fn config_all_settings(&mut self, config: &VictorSpxConfiguration, timeout_ms: u64) -> StatusCode {
        info!(
            "Configuring all settings of Victor SPX #{} (optimizations {})",
            self.base.device_id(),
            if config.enable_optimizations() { "on" } else { "off" }
        );
        let optimize = config.enable_optimizations();
        let mut errors = ErrorAccumulator::new();

        errors.append(self.base.base_config_all_settings(&config.base, timeout_ms));

        errors.append(self.configure_pid(&config.primary_pid, PidIdx::Primary, timeout_ms, optimize));
        errors.append(self.configure_pid(&config.auxiliary_pid, PidIdx::Auxiliary, timeout_ms, optimize));

        self.base.write_gated(
            &mut errors,
            Field::ForwardLimitSwitch,
            config.forward_limit_switch_different(),
            optimize,
            |c| {
                c.config_forward_limit_switch_source(
                    config.forward_limit_switch_source,
                    config.forward_limit_switch_normal,
                    config.forward_limit_switch_device_id,
                    timeout_ms,
                )
            },
        );
        self.base.write_gated(
            &mut errors,
            Field::ReverseLimitSwitch,
            config.reverse_limit_switch_different(),
            optimize,
            |c| {
                c.config_reverse_limit_switch_source(
                    config.reverse_limit_switch_source,
                    config.reverse_limit_switch_normal,
                    config.reverse_limit_switch_device_id,
                    timeout_ms,
                )
            },
        );

        for term in SensorTerm::ALL {
            self.base.write_gated(
                &mut errors,
                term_field(term),
                config.sensor_term_different(term),
                optimize,
                |c| c.config_sensor_term(term, config.sensor_term(term), timeout_ms),
            );
        }

        let worst = errors.worst();
        if worst.is_ok() {
            info!("Configured all settings");
        } else {
            warn!("Configure all settings finished with {}", worst);
        }
        worst
    }

    /// Read every persistent setting into `config`
    ///
    /// Best effort: every read is attempted and a failed read leaves its
    /// field unchanged.
    ///
    /// # Returns
    /// The worst read status
    pub fn get_all_configs(&mut self, config: &mut VictorSpxConfiguration, timeout_ms: u64) -> StatusCode {
        info!("Reading all settings of Victor SPX #{}", self.base.device_id());
        let mut errors = ErrorAccumulator::new();

        errors.append(self.base.base_get_all_configs(&mut config.base, timeout_ms));

        errors.append(self.get_pid_configs(&mut config.primary_pid, PidIdx::Primary, timeout_ms));
        errors.append(self.get_pid_configs(&mut config.auxiliary_pid, PidIdx::Auxiliary, timeout_ms));

        for term in SensorTerm::ALL {
            if let Some(device) = self.base.read_enum(
                &mut errors,
                ParamEnum::SensorTerm,
                term.ordinal(),
                timeout_ms,
                RemoteFeedbackDevice::from_raw,
            ) {
                *config.sensor_term_mut(term) = device;
            }
        }

        let e = &mut errors;
        if let Some(source) = self.read_limit_switch_source(e, 0, timeout_ms) {
            config.forward_limit_switch_source = source;
        }
        if let Some(source) = self.read_limit_switch_source(e, 1, timeout_ms) {
            config.reverse_limit_switch_source = source;
        }
        if let Some(v) = self.base.read_value(e, ParamEnum::LimitSwitchRemoteDevId, 0, timeout_ms) {
            config.forward_limit_switch_device_id = v.round() as i32;
        }
        if let Some(v) = self.base.read_value(e, ParamEnum::LimitSwitchRemoteDevId, 1, timeout_ms) {
            config.reverse_limit_switch_device_id = v.round() as i32;
        }
        if let Some(normal) = self.read_limit_switch_normal(e, 0, timeout_ms) {
            config.forward_limit_switch_normal = normal;
        }
        if let Some(normal) = self.read_limit_switch_normal(e, 1, timeout_ms) {
            config.reverse_limit_switch_normal = normal;
        }

        let worst = errors.worst();
        if !worst.is_ok() {
            warn!("Read all settings finished with {}", worst);
        }
        worst
    }

    /// Write the device default of every setting
    ///
    /// Runs [`Self::config_all_settings`] on the default record with
    /// optimizations disabled, so every optimizable field is written.
    pub fn config_factory_default(&mut self, timeout_ms: u64) -> StatusCode {
        info!("Restoring factory defaults of Victor SPX #{}", self.base.device_id());
        let mut config = VictorSpxConfiguration::DEFAULT;
        config.base.enable_optimizations = false;
        self.config_all_settings(&config, timeout_ms)
    }

    fn read_limit_switch_source(
        &mut self,
        errors: &mut ErrorAccumulator,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Option<RemoteLimitSwitchSource> {
        self.base.read_enum(
            errors,
            ParamEnum::LimitSwitchSource,
            ordinal,
            timeout_ms,
            RemoteLimitSwitchSource::from_raw,
        )
    }

    fn read_limit_switch_normal(
        &mut self,
        errors: &mut ErrorAccumulator,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Option<LimitSwitchNormal> {
        self.base.read_enum(
            errors,
            ParamEnum::LimitSwitchNormClosedAndDis,
            ordinal,
            timeout_ms,
            LimitSwitchNormal::from_raw,
        )
    }
}

fn term_field(term: SensorTerm) -> Field {
    match term {
        SensorTerm::Sum0 => Field::Sum0Term,
        SensorTerm::Sum1 => Field::Sum1Term,
        SensorTerm::Diff0 => Field::Diff0Term,
        SensorTerm::Diff1 => Field::Diff1Term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::can::SimulatedDevice;

    const TIMEOUT_MS: u64 = 10;

    fn victor() -> VictorSpx<SimulatedDevice> {
        VictorSpx::new(1, SimulatedDevice::new(1)).unwrap()
    }

    #[test]
    fn test_device_number_range() {
        assert!(VictorSpx::new(62, SimulatedDevice::new(62)).is_ok());
        assert_eq!(
            VictorSpx::new(63, SimulatedDevice::new(0)).err(),
            Some(StatusCode::InvalidParamValue)
        );
    }

    #[test]
    fn test_configure_pid_default_writes_sensor_only() {
        let mut victor = victor();
        let status = victor.configure_pid(&VictorSpxPidSetConfiguration::DEFAULT, PidIdx::Auxiliary, TIMEOUT_MS, true);
        assert_eq!(status, StatusCode::Ok);

        let writes = victor.base().channel().writes().to_vec();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].param, ParamEnum::FeedbackSensorType);
        assert_eq!(writes[0].ordinal, 1);
    }

    #[test]
    fn test_configure_pid_unoptimized_writes_coefficient() {
        let mut victor = victor();
        victor.configure_pid(&VictorSpxPidSetConfiguration::DEFAULT, PidIdx::Primary, TIMEOUT_MS, false);

        let device = victor.base().channel();
        assert_eq!(device.writes_of(ParamEnum::SelectedSensorCoefficient).len(), 1);
        assert_eq!(device.writes_of(ParamEnum::FeedbackSensorType).len(), 1);
    }

    #[test]
    fn test_configure_pid_returns_worst_status() {
        let mut victor = victor();
        victor
            .base_mut()
            .channel_mut()
            .inject_fault(ParamEnum::SelectedSensorCoefficient, StatusCode::TxTimeout);

        let mut pid = VictorSpxPidSetConfiguration::DEFAULT;
        pid.base.selected_feedback_coefficient = 0.5;

        let status = victor.configure_pid(&pid, PidIdx::Primary, TIMEOUT_MS, true);
        assert_eq!(status, StatusCode::TxTimeout);
        // The sensor write still went out
        assert_eq!(victor.base().channel().writes_of(ParamEnum::FeedbackSensorType).len(), 1);
    }

    #[test]
    fn test_get_pid_configs() {
        let mut victor = victor();
        let mut pid = VictorSpxPidSetConfiguration::DEFAULT;
        pid.base.selected_feedback_coefficient = 0.125;
        pid.selected_feedback_sensor = RemoteFeedbackDevice::SensorDifference;
        victor.configure_pid(&pid, PidIdx::Auxiliary, TIMEOUT_MS, true);

        let mut read = VictorSpxPidSetConfiguration::DEFAULT;
        assert_eq!(victor.get_pid_configs(&mut read, PidIdx::Auxiliary, TIMEOUT_MS), StatusCode::Ok);
        assert_eq!(read, pid);
    }

    #[test]
    fn test_fresh_device_sensor_selection_reads_off() {
        let mut victor = victor();
        let mut read = VictorSpxPidSetConfiguration::DEFAULT;
        victor.get_pid_configs(&mut read, PidIdx::Primary, TIMEOUT_MS);
        assert_eq!(read.selected_feedback_sensor, RemoteFeedbackDevice::FactoryDefaultOff);
    }

    #[test]
    fn test_sensor_terms_ignore_optimization_flag() {
        let mut victor = victor();
        let mut config = VictorSpxConfiguration::DEFAULT;
        config.base.enable_optimizations = false;
        config.diff1_term = RemoteFeedbackDevice::SoftwareEmulatedSensor;

        victor.config_all_settings(&config, TIMEOUT_MS);

        let writes = victor.base().channel().writes_of(ParamEnum::SensorTerm);
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].ordinal, 3);
        assert!(victor.base().channel().writes_of(ParamEnum::LimitSwitchSource).is_empty());
    }

    #[test]
    fn test_factory_default() {
        let mut victor = victor();
        let mut config = VictorSpxConfiguration::DEFAULT;
        config.base.slot0.kp = 2.0;
        config.base.neutral_deadband = 0.2;
        victor.config_all_settings(&config, TIMEOUT_MS);

        assert_eq!(victor.config_factory_default(TIMEOUT_MS), StatusCode::Ok);

        let mut read = VictorSpxConfiguration::DEFAULT;
        victor.get_all_configs(&mut read, TIMEOUT_MS);
        assert_eq!(read, VictorSpxConfiguration::DEFAULT);
    }
}
