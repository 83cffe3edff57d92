//! Configuration routines shared by every motor controller
//!
//! `BaseMotorController` turns typed configuration calls into single
//! parameter writes and reads on a [`ParameterChannel`], and synchronizes the
//! shared part of a configuration record.

use tracing::{debug, warn};

use crate::can::protocol::{self, pack_limit_switch};
use crate::channel::ParameterChannel;
use crate::config::base::{BaseMotorControllerConfiguration, BasePidSetConfiguration, SlotConfiguration};
use crate::config::policy::{should_write, Field};
use crate::param::ParamEnum;
use crate::status::{ErrorAccumulator, StatusCode};
use crate::types::{
    LimitSwitchNormal, PidIdx, RemoteFeedbackDevice, RemoteLimitSwitchSource, SensorTerm,
    VelocityMeasPeriod,
};

/// Limit switch sub-index of the combined parameter
const FORWARD_LIMIT_SWITCH: i32 = 0;
const REVERSE_LIMIT_SWITCH: i32 = 1;

/// Ordinal the auxiliary PID polarity is stored under
const AUX_PID_ORDINAL: i32 = 1;

/// Shared configuration access of one device on the bus
#[derive(Debug)]
pub struct BaseMotorController<C> {
    channel: C,
    base_id: u32,
}

impl<C: ParameterChannel> BaseMotorController<C> {
    /// # Arguments
    /// * `base_id` - Base arbitration id of the device
    /// * `channel` - Parameter access to the device
    pub fn new(base_id: u32, channel: C) -> Self {
        Self { channel, base_id }
    }

    pub fn base_id(&self) -> u32 {
        self.base_id
    }

    /// Device number [0, 62]
    pub fn device_id(&self) -> u8 {
        protocol::device_number_of(self.base_id)
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    // === Raw parameter access ===

    /// Write one parameter
    pub fn config_set_parameter(
        &mut self,
        param: ParamEnum,
        value: f64,
        ordinal: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        debug!("Set {:?}[{}] = {}", param, ordinal, value);
        let status = self.channel.set_parameter(param, value, ordinal, timeout_ms);
        if !status.is_ok() {
            warn!("Set {:?}[{}] failed: {}", param, ordinal, status);
        }
        status
    }

    /// Read one parameter
    pub fn config_get_parameter(
        &mut self,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Result<f64, StatusCode> {
        let result = self.channel.get_parameter(param, ordinal, timeout_ms);
        match result {
            Ok(value) => debug!("Get {:?}[{}] = {}", param, ordinal, value),
            Err(status) => warn!("Get {:?}[{}] failed: {}", param, ordinal, status),
        }
        result
    }

    fn config_set_combined_parameter(
        &mut self,
        param: ParamEnum,
        bitfield: u32,
        sub_index: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        debug!("Set {:?}[{}] = 0x{:08X}", param, sub_index, bitfield);
        let status = self
            .channel
            .set_combined_parameter(param, bitfield, sub_index, timeout_ms);
        if !status.is_ok() {
            warn!("Set {:?}[{}] failed: {}", param, sub_index, status);
        }
        status
    }

    // === Output shaping ===

    pub fn config_open_loop_ramp(&mut self, seconds_from_neutral_to_full: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::OpenloopRamp, seconds_from_neutral_to_full, 0, timeout_ms)
    }

    pub fn config_closed_loop_ramp(&mut self, seconds_from_neutral_to_full: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ClosedloopRamp, seconds_from_neutral_to_full, 0, timeout_ms)
    }

    pub fn config_peak_output_forward(&mut self, percent_out: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::PeakPosOutput, percent_out, 0, timeout_ms)
    }

    pub fn config_peak_output_reverse(&mut self, percent_out: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::PeakNegOutput, percent_out, 0, timeout_ms)
    }

    pub fn config_nominal_output_forward(&mut self, percent_out: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::NominalPosOutput, percent_out, 0, timeout_ms)
    }

    pub fn config_nominal_output_reverse(&mut self, percent_out: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::NominalNegOutput, percent_out, 0, timeout_ms)
    }

    pub fn config_neutral_deadband(&mut self, percent_deadband: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::NeutralDeadband, percent_deadband, 0, timeout_ms)
    }

    // === Voltage and velocity measurement ===

    /// # Arguments
    /// * `voltage` - Voltage treated as full output, 0 = compensation off
    pub fn config_voltage_comp_saturation(&mut self, voltage: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::NominalBatteryVoltage, voltage, 0, timeout_ms)
    }

    pub fn config_voltage_measurement_filter(&mut self, filter_window_samples: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(
            ParamEnum::BatteryVoltageFilterSize,
            filter_window_samples as f64,
            0,
            timeout_ms,
        )
    }

    pub fn config_velocity_measurement_period(&mut self, period: VelocityMeasPeriod, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::SampleVelocityPeriod, period.raw() as f64, 0, timeout_ms)
    }

    pub fn config_velocity_measurement_window(&mut self, window_size: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::SampleVelocityWindow, window_size as f64, 0, timeout_ms)
    }

    // === Soft limits ===

    pub fn config_forward_soft_limit_threshold(&mut self, sensor_units: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ForwardSoftLimitThreshold, sensor_units as f64, 0, timeout_ms)
    }

    pub fn config_reverse_soft_limit_threshold(&mut self, sensor_units: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ReverseSoftLimitThreshold, sensor_units as f64, 0, timeout_ms)
    }

    pub fn config_forward_soft_limit_enable(&mut self, enable: bool, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ForwardSoftLimitEnable, flag(enable), 0, timeout_ms)
    }

    pub fn config_reverse_soft_limit_enable(&mut self, enable: bool, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ReverseSoftLimitEnable, flag(enable), 0, timeout_ms)
    }

    // === Closed-loop slots ===

    pub fn config_kp(&mut self, slot_idx: i32, value: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ProfileParamSlotP, value, slot_idx, timeout_ms)
    }

    pub fn config_ki(&mut self, slot_idx: i32, value: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ProfileParamSlotI, value, slot_idx, timeout_ms)
    }

    pub fn config_kd(&mut self, slot_idx: i32, value: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ProfileParamSlotD, value, slot_idx, timeout_ms)
    }

    pub fn config_kf(&mut self, slot_idx: i32, value: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ProfileParamSlotF, value, slot_idx, timeout_ms)
    }

    pub fn config_integral_zone(&mut self, slot_idx: i32, izone: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ProfileParamSlotIZone, izone as f64, slot_idx, timeout_ms)
    }

    pub fn config_allowable_closedloop_error(&mut self, slot_idx: i32, error: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(
            ParamEnum::ProfileParamSlotAllowableErr,
            error as f64,
            slot_idx,
            timeout_ms,
        )
    }

    pub fn config_max_integral_accumulator(&mut self, slot_idx: i32, iaccum: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ProfileParamSlotMaxIAccum, iaccum, slot_idx, timeout_ms)
    }

    pub fn config_closed_loop_peak_output(&mut self, slot_idx: i32, percent_out: f64, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::ProfileParamSlotPeakOutput, percent_out, slot_idx, timeout_ms)
    }

    /// # Arguments
    /// * `loop_time_ms` - Closed-loop period [ms]
    pub fn config_closed_loop_period(&mut self, slot_idx: i32, loop_time_ms: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(
            ParamEnum::ProfileParamSlotClosedLoopPeriod,
            loop_time_ms as f64,
            slot_idx,
            timeout_ms,
        )
    }

    pub fn config_aux_pid_polarity(&mut self, invert: bool, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::PidLoopPolarity, flag(invert), AUX_PID_ORDINAL, timeout_ms)
    }

    // === Motion magic ===

    pub fn config_motion_cruise_velocity(&mut self, sensor_units_per_100ms: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::MotMagVelCruise, sensor_units_per_100ms as f64, 0, timeout_ms)
    }

    pub fn config_motion_acceleration(&mut self, sensor_units_per_100ms_per_sec: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::MotMagAccel, sensor_units_per_100ms_per_sec as f64, 0, timeout_ms)
    }

    // === Custom parameters ===

    /// # Arguments
    /// * `param_index` - 0 or 1
    pub fn config_set_custom_param(&mut self, new_value: i32, param_index: i32, timeout_ms: u64) -> StatusCode {
        self.config_set_parameter(ParamEnum::CustomParam, new_value as f64, param_index, timeout_ms)
    }

    pub fn config_get_custom_param(&mut self, param_index: i32, timeout_ms: u64) -> Result<i32, StatusCode> {
        self.config_get_parameter(ParamEnum::CustomParam, param_index, timeout_ms)
            .map(integer)
    }

    // === Feedback selection ===

    pub fn config_selected_feedback_sensor(
        &mut self,
        feedback_device: RemoteFeedbackDevice,
        pid_idx: PidIdx,
        timeout_ms: u64,
    ) -> StatusCode {
        self.config_set_parameter(
            ParamEnum::FeedbackSensorType,
            feedback_device.raw() as f64,
            pid_idx.ordinal(),
            timeout_ms,
        )
    }

    pub fn config_selected_feedback_coefficient(
        &mut self,
        coefficient: f64,
        pid_idx: PidIdx,
        timeout_ms: u64,
    ) -> StatusCode {
        self.config_set_parameter(
            ParamEnum::SelectedSensorCoefficient,
            coefficient,
            pid_idx.ordinal(),
            timeout_ms,
        )
    }

    pub fn config_sensor_term(
        &mut self,
        sensor_term: SensorTerm,
        feedback_device: RemoteFeedbackDevice,
        timeout_ms: u64,
    ) -> StatusCode {
        self.config_set_parameter(
            ParamEnum::SensorTerm,
            feedback_device.raw() as f64,
            sensor_term.ordinal(),
            timeout_ms,
        )
    }

    // === Remote limit switches ===

    /// Source, polarity and remote id go out in one combined write
    ///
    /// # Arguments
    /// * `device_id` - CAN device number of the remote sensor [0, 62]
    pub fn config_forward_limit_switch_source(
        &mut self,
        source: RemoteLimitSwitchSource,
        normal: LimitSwitchNormal,
        device_id: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        self.config_limit_switch_source(FORWARD_LIMIT_SWITCH, source, normal, device_id, timeout_ms)
    }

    pub fn config_reverse_limit_switch_source(
        &mut self,
        source: RemoteLimitSwitchSource,
        normal: LimitSwitchNormal,
        device_id: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        self.config_limit_switch_source(REVERSE_LIMIT_SWITCH, source, normal, device_id, timeout_ms)
    }

    fn config_limit_switch_source(
        &mut self,
        sub_index: i32,
        source: RemoteLimitSwitchSource,
        normal: LimitSwitchNormal,
        device_id: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        let Some(bitfield) = pack_limit_switch(source, normal, device_id) else {
            warn!(
                "Limit switch remote device id {} out of range [0, {}]",
                device_id,
                protocol::MAX_DEVICE_NUMBER
            );
            return StatusCode::InvalidParamValue;
        };
        self.config_set_combined_parameter(ParamEnum::LimitSwitchSource, bitfield, sub_index, timeout_ms)
    }

    // === Record synchronization ===

    /// Run `write` if the policy table asks for it and record its status
    pub(crate) fn write_gated(
        &mut self,
        errors: &mut ErrorAccumulator,
        field: Field,
        different: bool,
        enable_optimizations: bool,
        write: impl FnOnce(&mut Self) -> StatusCode,
    ) {
        if should_write(field, different, enable_optimizations) {
            errors.append(write(self));
        }
    }

    /// Read one parameter and record its status
    ///
    /// # Returns
    /// * `Some(value)` if the read succeeded
    /// * `None` if it failed; the caller keeps its current value
    pub(crate) fn read_value(
        &mut self,
        errors: &mut ErrorAccumulator,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Option<f64> {
        match self.config_get_parameter(param, ordinal, timeout_ms) {
            Ok(value) => {
                errors.append(StatusCode::Ok);
                Some(value)
            }
            Err(status) => {
                errors.append(status);
                None
            }
        }
    }

    /// Read one enumerated parameter
    ///
    /// A raw value with no matching variant counts as a failed read.
    pub(crate) fn read_enum<T>(
        &mut self,
        errors: &mut ErrorAccumulator,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
        from_raw: fn(i32) -> Option<T>,
    ) -> Option<T> {
        let raw = integer(self.read_value(errors, param, ordinal, timeout_ms)?);
        let value = from_raw(raw);
        if value.is_none() {
            warn!("{:?}[{}] holds unknown value {}", param, ordinal, raw);
            errors.append(StatusCode::InvalidParamValue);
        }
        value
    }

    /// Write every shared field the policy table selects
    ///
    /// Each field is compared against its device default; with
    /// optimizations disabled every field is written.
    pub fn base_config_all_settings(
        &mut self,
        config: &BaseMotorControllerConfiguration,
        timeout_ms: u64,
    ) -> StatusCode {
        let optimize = config.enable_optimizations;
        let mut errors = ErrorAccumulator::new();

        self.write_gated(
            &mut errors,
            Field::OpenLoopRamp,
            config.open_loop_ramp_different(),
            optimize,
            |c| c.config_open_loop_ramp(config.open_loop_ramp, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::ClosedLoopRamp,
            config.closed_loop_ramp_different(),
            optimize,
            |c| c.config_closed_loop_ramp(config.closed_loop_ramp, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::PeakOutputForward,
            config.peak_output_forward_different(),
            optimize,
            |c| c.config_peak_output_forward(config.peak_output_forward, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::PeakOutputReverse,
            config.peak_output_reverse_different(),
            optimize,
            |c| c.config_peak_output_reverse(config.peak_output_reverse, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::NominalOutputForward,
            config.nominal_output_forward_different(),
            optimize,
            |c| c.config_nominal_output_forward(config.nominal_output_forward, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::NominalOutputReverse,
            config.nominal_output_reverse_different(),
            optimize,
            |c| c.config_nominal_output_reverse(config.nominal_output_reverse, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::NeutralDeadband,
            config.neutral_deadband_different(),
            optimize,
            |c| c.config_neutral_deadband(config.neutral_deadband, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::VoltageCompSaturation,
            config.voltage_comp_saturation_different(),
            optimize,
            |c| c.config_voltage_comp_saturation(config.voltage_comp_saturation, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::VoltageMeasurementFilter,
            config.voltage_measurement_filter_different(),
            optimize,
            |c| c.config_voltage_measurement_filter(config.voltage_measurement_filter, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::VelocityMeasurementPeriod,
            config.velocity_measurement_period_different(),
            optimize,
            |c| c.config_velocity_measurement_period(config.velocity_measurement_period, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::VelocityMeasurementWindow,
            config.velocity_measurement_window_different(),
            optimize,
            |c| c.config_velocity_measurement_window(config.velocity_measurement_window, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::ForwardSoftLimitThreshold,
            config.forward_soft_limit_threshold_different(),
            optimize,
            |c| c.config_forward_soft_limit_threshold(config.forward_soft_limit_threshold, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::ReverseSoftLimitThreshold,
            config.reverse_soft_limit_threshold_different(),
            optimize,
            |c| c.config_reverse_soft_limit_threshold(config.reverse_soft_limit_threshold, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::ForwardSoftLimitEnable,
            config.forward_soft_limit_enable_different(),
            optimize,
            |c| c.config_forward_soft_limit_enable(config.forward_soft_limit_enable, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::ReverseSoftLimitEnable,
            config.reverse_soft_limit_enable_different(),
            optimize,
            |c| c.config_reverse_soft_limit_enable(config.reverse_soft_limit_enable, timeout_ms),
        );

        for (slot_idx, slot) in config.slots().into_iter().enumerate() {
            self.write_slot(&mut errors, slot_idx as i32, slot, optimize, timeout_ms);
        }

        self.write_gated(
            &mut errors,
            Field::AuxPidPolarity,
            config.aux_pid_polarity_different(),
            optimize,
            |c| c.config_aux_pid_polarity(config.aux_pid_polarity, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::MotionCruiseVelocity,
            config.motion_cruise_velocity_different(),
            optimize,
            |c| c.config_motion_cruise_velocity(config.motion_cruise_velocity, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::MotionAcceleration,
            config.motion_acceleration_different(),
            optimize,
            |c| c.config_motion_acceleration(config.motion_acceleration, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::CustomParam0,
            config.custom_param0_different(),
            optimize,
            |c| c.config_set_custom_param(config.custom_param0, 0, timeout_ms),
        );
        self.write_gated(
            &mut errors,
            Field::CustomParam1,
            config.custom_param1_different(),
            optimize,
            |c| c.config_set_custom_param(config.custom_param1, 1, timeout_ms),
        );

        errors.worst()
    }

    fn write_slot(
        &mut self,
        errors: &mut ErrorAccumulator,
        slot_idx: i32,
        slot: &SlotConfiguration,
        optimize: bool,
        timeout_ms: u64,
    ) {
        self.write_gated(errors, Field::SlotKp, slot.kp_different(), optimize, |c| {
            c.config_kp(slot_idx, slot.kp, timeout_ms)
        });
        self.write_gated(errors, Field::SlotKi, slot.ki_different(), optimize, |c| {
            c.config_ki(slot_idx, slot.ki, timeout_ms)
        });
        self.write_gated(errors, Field::SlotKd, slot.kd_different(), optimize, |c| {
            c.config_kd(slot_idx, slot.kd, timeout_ms)
        });
        self.write_gated(errors, Field::SlotKf, slot.kf_different(), optimize, |c| {
            c.config_kf(slot_idx, slot.kf, timeout_ms)
        });
        self.write_gated(
            errors,
            Field::SlotIntegralZone,
            slot.integral_zone_different(),
            optimize,
            |c| c.config_integral_zone(slot_idx, slot.integral_zone, timeout_ms),
        );
        self.write_gated(
            errors,
            Field::SlotAllowableClosedloopError,
            slot.allowable_closedloop_error_different(),
            optimize,
            |c| c.config_allowable_closedloop_error(slot_idx, slot.allowable_closedloop_error, timeout_ms),
        );
        self.write_gated(
            errors,
            Field::SlotMaxIntegralAccumulator,
            slot.max_integral_accumulator_different(),
            optimize,
            |c| c.config_max_integral_accumulator(slot_idx, slot.max_integral_accumulator, timeout_ms),
        );
        self.write_gated(
            errors,
            Field::SlotClosedLoopPeakOutput,
            slot.closed_loop_peak_output_different(),
            optimize,
            |c| c.config_closed_loop_peak_output(slot_idx, slot.closed_loop_peak_output, timeout_ms),
        );
        self.write_gated(
            errors,
            Field::SlotClosedLoopPeriod,
            slot.closed_loop_period_different(),
            optimize,
            |c| c.config_closed_loop_period(slot_idx, slot.closed_loop_period, timeout_ms),
        );
    }

    /// Read the shared part of a PID set
    pub fn base_get_pid_configs(
        &mut self,
        pid: &mut BasePidSetConfiguration,
        pid_idx: PidIdx,
        timeout_ms: u64,
    ) -> StatusCode {
        let mut errors = ErrorAccumulator::new();
        if let Some(value) = self.read_value(
            &mut errors,
            ParamEnum::SelectedSensorCoefficient,
            pid_idx.ordinal(),
            timeout_ms,
        ) {
            pid.selected_feedback_coefficient = value;
        }
        errors.worst()
    }

    /// Read every shared field into `config`
    ///
    /// Fields whose read fails keep their current value. The optimization
    /// flag is not a device setting and is left alone.
    pub fn base_get_all_configs(
        &mut self,
        config: &mut BaseMotorControllerConfiguration,
        timeout_ms: u64,
    ) -> StatusCode {
        let mut errors = ErrorAccumulator::new();
        let e = &mut errors;

        if let Some(v) = self.read_value(e, ParamEnum::OpenloopRamp, 0, timeout_ms) {
            config.open_loop_ramp = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::ClosedloopRamp, 0, timeout_ms) {
            config.closed_loop_ramp = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::PeakPosOutput, 0, timeout_ms) {
            config.peak_output_forward = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::PeakNegOutput, 0, timeout_ms) {
            config.peak_output_reverse = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::NominalPosOutput, 0, timeout_ms) {
            config.nominal_output_forward = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::NominalNegOutput, 0, timeout_ms) {
            config.nominal_output_reverse = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::NeutralDeadband, 0, timeout_ms) {
            config.neutral_deadband = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::NominalBatteryVoltage, 0, timeout_ms) {
            config.voltage_comp_saturation = v;
        }
        if let Some(v) = self.read_value(e, ParamEnum::BatteryVoltageFilterSize, 0, timeout_ms) {
            config.voltage_measurement_filter = integer(v);
        }
        if let Some(period) = self.read_enum(
            e,
            ParamEnum::SampleVelocityPeriod,
            0,
            timeout_ms,
            VelocityMeasPeriod::from_raw,
        ) {
            config.velocity_measurement_period = period;
        }
        if let Some(v) = self.read_value(e, ParamEnum::SampleVelocityWindow, 0, timeout_ms) {
            config.velocity_measurement_window = integer(v);
        }
        if let Some(v) = self.read_value(e, ParamEnum::ForwardSoftLimitThreshold, 0, timeout_ms) {
            config.forward_soft_limit_threshold = integer(v);
        }
        if let Some(v) = self.read_value(e, ParamEnum::ReverseSoftLimitThreshold, 0, timeout_ms) {
            config.reverse_soft_limit_threshold = integer(v);
        }
        if let Some(v) = self.read_value(e, ParamEnum::ForwardSoftLimitEnable, 0, timeout_ms) {
            config.forward_soft_limit_enable = v != 0.0;
        }
        if let Some(v) = self.read_value(e, ParamEnum::ReverseSoftLimitEnable, 0, timeout_ms) {
            config.reverse_soft_limit_enable = v != 0.0;
        }

        for (slot_idx, slot) in config.slots_mut().into_iter().enumerate() {
            self.read_slot(e, slot_idx as i32, slot, timeout_ms);
        }

        if let Some(v) = self.read_value(e, ParamEnum::PidLoopPolarity, AUX_PID_ORDINAL, timeout_ms) {
            config.aux_pid_polarity = v != 0.0;
        }
        if let Some(v) = self.read_value(e, ParamEnum::MotMagVelCruise, 0, timeout_ms) {
            config.motion_cruise_velocity = integer(v);
        }
        if let Some(v) = self.read_value(e, ParamEnum::MotMagAccel, 0, timeout_ms) {
            config.motion_acceleration = integer(v);
        }
        if let Some(v) = self.read_value(e, ParamEnum::CustomParam, 0, timeout_ms) {
            config.custom_param0 = integer(v);
        }
        if let Some(v) = self.read_value(e, ParamEnum::CustomParam, 1, timeout_ms) {
            config.custom_param1 = integer(v);
        }

        errors.worst()
    }

    fn read_slot(
        &mut self,
        errors: &mut ErrorAccumulator,
        slot_idx: i32,
        slot: &mut SlotConfiguration,
        timeout_ms: u64,
    ) {
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotP, slot_idx, timeout_ms) {
            slot.kp = v;
        }
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotI, slot_idx, timeout_ms) {
            slot.ki = v;
        }
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotD, slot_idx, timeout_ms) {
            slot.kd = v;
        }
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotF, slot_idx, timeout_ms) {
            slot.kf = v;
        }
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotIZone, slot_idx, timeout_ms) {
            slot.integral_zone = integer(v);
        }
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotAllowableErr, slot_idx, timeout_ms) {
            slot.allowable_closedloop_error = integer(v);
        }
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotMaxIAccum, slot_idx, timeout_ms) {
            slot.max_integral_accumulator = v;
        }
        if let Some(v) = self.read_value(errors, ParamEnum::ProfileParamSlotPeakOutput, slot_idx, timeout_ms) {
            slot.closed_loop_peak_output = v;
        }
        if let Some(v) = self.read_value(
            errors,
            ParamEnum::ProfileParamSlotClosedLoopPeriod,
            slot_idx,
            timeout_ms,
        ) {
            slot.closed_loop_period = integer(v);
        }
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn integer(value: f64) -> i32 {
    value.round() as i32
}
