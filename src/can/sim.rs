//! In-process Victor SPX parameter store
//!
//! Answers parameter frames the way the controller firmware does and keeps a
//! log of every accepted write. Implements [`ParameterChannel`] by encoding
//! each call into frames, so the full protocol path is exercised.

use std::collections::HashMap;

use embedded_can::ExtendedId;
use tracing::{debug, info, warn};

use super::protocol::{
    self, api_ids, decode_param_request, decode_param_response, decode_param_set,
    encode_param_request, encode_param_response, encode_param_set, encode_value, match_response,
    unpack_limit_switch, widen, ParamValue,
};
use crate::channel::{read_timeout_ms, ParameterChannel};
use crate::config::params::{self, limit_switch, pid, sensor_term, slot};
use crate::param::ParamEnum;
use crate::status::StatusCode;

/// One write accepted by the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamWrite {
    pub param: ParamEnum,
    pub ordinal: u8,
    pub value: ParamValue,
}

/// Simulated device answering parameter frames
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    base_id: u32,
    values: HashMap<(ParamEnum, u8), f64>,
    faults: HashMap<ParamEnum, StatusCode>,
    writes: Vec<ParamWrite>,
    response_delay_ms: u64,
}

impl SimulatedDevice {
    /// Create a device with factory settings
    ///
    /// # Arguments
    /// * `device_number` - CAN device number, clamped to [0, 62]
    pub fn new(device_number: u8) -> Self {
        let device_number = device_number.min(protocol::MAX_DEVICE_NUMBER);
        info!("Simulated Victor SPX #{} powered on", device_number);
        Self {
            base_id: protocol::VICTOR_SPX_DEVICE_TYPE | device_number as u32,
            values: HashMap::new(),
            faults: HashMap::new(),
            writes: Vec::new(),
            response_delay_ms: 0,
        }
    }

    pub fn base_id(&self) -> u32 {
        self.base_id
    }

    /// Make every request and write of `param` fail with `status`
    ///
    /// `StatusCode::RxTimeout` makes the device drop the frame without
    /// answering.
    pub fn inject_fault(&mut self, param: ParamEnum, status: StatusCode) {
        self.faults.insert(param, status);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Time the device takes to answer a frame [ms]
    ///
    /// A caller waiting less than this sees `StatusCode::RxTimeout`. Writes
    /// are still applied.
    pub fn set_response_delay(&mut self, delay_ms: u64) {
        self.response_delay_ms = delay_ms;
    }

    /// Writes accepted since power-on or the last `clear_writes`
    pub fn writes(&self) -> &[ParamWrite] {
        &self.writes
    }

    pub fn writes_of(&self, param: ParamEnum) -> Vec<ParamWrite> {
        self.writes.iter().copied().filter(|w| w.param == param).collect()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Current value of a parameter
    pub fn value(&self, param: ParamEnum, ordinal: u8) -> f64 {
        self.values
            .get(&(param, ordinal))
            .copied()
            .unwrap_or_else(|| factory_value(param))
    }

    /// Restore factory settings; faults and the write log are kept
    pub fn factory_reset(&mut self) {
        self.values.clear();
    }

    /// Process one received frame
    ///
    /// # Returns
    /// * `Some((id, data))` - response frame to transmit
    /// * `None` - frame not addressed to this device, or dropped
    pub fn handle_frame(&mut self, id: u32, data: &[u8]) -> Option<(ExtendedId, [u8; 8])> {
        if protocol::device_number_of(id) != protocol::device_number_of(self.base_id) {
            return None;
        }
        let response_id = protocol::frame_id(self.base_id, api_ids::PARAM_RESPONSE)?;

        match protocol::api_of(id) {
            api_ids::PARAM_SET => {
                let set = decode_param_set(data)?;
                let response = self.apply_set(set.param_id, set.ordinal, set.value)?;
                Some((response_id, response))
            }
            api_ids::PARAM_REQUEST => {
                let (param_id, ordinal) = decode_param_request(data)?;
                let response = self.answer_request(param_id, ordinal)?;
                Some((response_id, response))
            }
            other => {
                debug!("Ignoring frame with API 0x{:04X}", other);
                None
            }
        }
    }

    fn apply_set(&mut self, param_id: u16, ordinal: u8, value: ParamValue) -> Option<[u8; 8]> {
        let Some(param) = ParamEnum::from_id(param_id) else {
            warn!("Set of unknown parameter {}", param_id);
            return Some(encode_param_response(param_id, ordinal, StatusCode::InvalidParamValue, 0));
        };

        if let Some(&fault) = self.faults.get(&param) {
            warn!("Set of {:?}[{}] failed: {}", param, ordinal, fault);
            if fault == StatusCode::RxTimeout {
                return None;
            }
            return Some(encode_param_response(param_id, ordinal, fault, value.bits()));
        }

        match (param, value) {
            (ParamEnum::LimitSwitchSource, ParamValue::Bitfield(bits)) => {
                let (source, normal, device_id) = unpack_limit_switch(bits);
                self.values.insert((ParamEnum::LimitSwitchSource, ordinal), source as f64);
                self.values
                    .insert((ParamEnum::LimitSwitchNormClosedAndDis, ordinal), normal as f64);
                self.values
                    .insert((ParamEnum::LimitSwitchRemoteDevId, ordinal), device_id as f64);
            }
            (_, ParamValue::Integer(v)) if param.is_integer() => {
                self.values.insert((param, ordinal), v as f64);
            }
            (_, ParamValue::Float(v)) if !param.is_integer() => {
                self.values.insert((param, ordinal), widen(v));
            }
            _ => {
                warn!("Set of {:?}[{}] with wrong value kind {:?}", param, ordinal, value);
                return Some(encode_param_response(
                    param_id,
                    ordinal,
                    StatusCode::InvalidParamValue,
                    value.bits(),
                ));
            }
        }

        debug!("{:?}[{}] <- {:?}", param, ordinal, value);
        self.writes.push(ParamWrite {
            param,
            ordinal,
            value,
        });
        Some(encode_param_response(param_id, ordinal, StatusCode::Ok, value.bits()))
    }

    fn answer_request(&mut self, param_id: u16, ordinal: u8) -> Option<[u8; 8]> {
        let Some(param) = ParamEnum::from_id(param_id) else {
            warn!("Request of unknown parameter {}", param_id);
            return Some(encode_param_response(param_id, ordinal, StatusCode::InvalidParamValue, 0));
        };

        if let Some(&fault) = self.faults.get(&param) {
            if fault == StatusCode::RxTimeout {
                return None;
            }
            return Some(encode_param_response(param_id, ordinal, fault, 0));
        }

        let bits = encode_value(param, self.value(param, ordinal)).map_or(0, ParamValue::bits);
        Some(encode_param_response(param_id, ordinal, StatusCode::Ok, bits))
    }

    fn exchange(&mut self, api: u32, data: [u8; 8]) -> Option<[u8; 8]> {
        let id = protocol::frame_id(self.base_id, api)?;
        self.handle_frame(id.as_raw(), &data).map(|(_, response)| response)
    }

    fn write(&mut self, param: ParamEnum, value: ParamValue, ordinal: i32, timeout_ms: u64) -> StatusCode {
        let Ok(ordinal) = u8::try_from(ordinal) else {
            return StatusCode::InvalidParamValue;
        };
        let response = self.exchange(api_ids::PARAM_SET, encode_param_set(param.id(), ordinal, value));

        // Fire and forget: nothing is verified
        if timeout_ms == 0 {
            return StatusCode::Ok;
        }
        if self.response_delay_ms > timeout_ms {
            return StatusCode::RxTimeout;
        }

        match response.and_then(|data| decode_param_response(&data)) {
            Some(response) => match match_response(response, param.id(), ordinal) {
                Ok(response) => response.status,
                Err(status) => status,
            },
            None => StatusCode::RxTimeout,
        }
    }
}

impl ParameterChannel for SimulatedDevice {
    fn set_parameter(
        &mut self,
        param: ParamEnum,
        value: f64,
        ordinal: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        let Some(value) = encode_value(param, value) else {
            warn!("{} does not fit {:?}", value, param);
            return StatusCode::InvalidParamValue;
        };
        self.write(param, value, ordinal, timeout_ms)
    }

    fn get_parameter(
        &mut self,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Result<f64, StatusCode> {
        let ordinal = u8::try_from(ordinal).map_err(|_| StatusCode::InvalidParamValue)?;
        let data = self
            .exchange(api_ids::PARAM_REQUEST, encode_param_request(param.id(), ordinal))
            .ok_or(StatusCode::RxTimeout)?;
        if self.response_delay_ms > read_timeout_ms(timeout_ms) {
            return Err(StatusCode::RxTimeout);
        }
        let response = decode_param_response(&data).ok_or(StatusCode::GeneralError)?;
        let response = match_response(response, param.id(), ordinal)?;

        if response.status.is_error() {
            return Err(response.status);
        }
        Ok(response.value())
    }

    fn set_combined_parameter(
        &mut self,
        param: ParamEnum,
        bitfield: u32,
        sub_index: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        self.write(param, ParamValue::Bitfield(bitfield), sub_index, timeout_ms)
    }
}

/// Value a parameter holds after a factory reset
pub fn factory_value(param: ParamEnum) -> f64 {
    match param {
        ParamEnum::OpenloopRamp => params::DEFAULT_OPEN_LOOP_RAMP,
        ParamEnum::ClosedloopRamp => params::DEFAULT_CLOSED_LOOP_RAMP,
        ParamEnum::NeutralDeadband => params::DEFAULT_NEUTRAL_DEADBAND,
        ParamEnum::PeakPosOutput => params::DEFAULT_PEAK_OUTPUT_FORWARD,
        ParamEnum::NominalPosOutput => params::DEFAULT_NOMINAL_OUTPUT_FORWARD,
        ParamEnum::PeakNegOutput => params::DEFAULT_PEAK_OUTPUT_REVERSE,
        ParamEnum::NominalNegOutput => params::DEFAULT_NOMINAL_OUTPUT_REVERSE,
        ParamEnum::ProfileParamSlotP => slot::DEFAULT_KP,
        ParamEnum::ProfileParamSlotI => slot::DEFAULT_KI,
        ParamEnum::ProfileParamSlotD => slot::DEFAULT_KD,
        ParamEnum::ProfileParamSlotF => slot::DEFAULT_KF,
        ParamEnum::ProfileParamSlotIZone => slot::DEFAULT_INTEGRAL_ZONE as f64,
        ParamEnum::ProfileParamSlotAllowableErr => slot::DEFAULT_ALLOWABLE_CLOSEDLOOP_ERROR as f64,
        ParamEnum::ProfileParamSlotMaxIAccum => slot::DEFAULT_MAX_INTEGRAL_ACCUMULATOR,
        ParamEnum::ProfileParamSlotPeakOutput => slot::DEFAULT_CLOSED_LOOP_PEAK_OUTPUT,
        ParamEnum::ProfileParamSlotClosedLoopPeriod => slot::DEFAULT_CLOSED_LOOP_PERIOD as f64,
        ParamEnum::SampleVelocityPeriod => params::DEFAULT_VELOCITY_MEASUREMENT_PERIOD.raw() as f64,
        ParamEnum::SampleVelocityWindow => params::DEFAULT_VELOCITY_MEASUREMENT_WINDOW as f64,
        ParamEnum::SelectedSensorCoefficient => pid::DEFAULT_SELECTED_FEEDBACK_COEFFICIENT,
        ParamEnum::FeedbackSensorType => pid::FIRMWARE_FEEDBACK_SENSOR.raw() as f64,
        ParamEnum::SensorTerm => sensor_term::DEFAULT_TERM.raw() as f64,
        ParamEnum::PidLoopPolarity => bool_value(params::DEFAULT_AUX_PID_POLARITY),
        ParamEnum::ForwardSoftLimitThreshold => params::DEFAULT_FORWARD_SOFT_LIMIT_THRESHOLD as f64,
        ParamEnum::ReverseSoftLimitThreshold => params::DEFAULT_REVERSE_SOFT_LIMIT_THRESHOLD as f64,
        ParamEnum::ForwardSoftLimitEnable => bool_value(params::DEFAULT_FORWARD_SOFT_LIMIT_ENABLE),
        ParamEnum::ReverseSoftLimitEnable => bool_value(params::DEFAULT_REVERSE_SOFT_LIMIT_ENABLE),
        ParamEnum::NominalBatteryVoltage => params::DEFAULT_VOLTAGE_COMP_SATURATION,
        ParamEnum::BatteryVoltageFilterSize => params::DEFAULT_VOLTAGE_MEASUREMENT_FILTER as f64,
        ParamEnum::MotMagAccel => params::DEFAULT_MOTION_ACCELERATION as f64,
        ParamEnum::MotMagVelCruise => params::DEFAULT_MOTION_CRUISE_VELOCITY as f64,
        ParamEnum::LimitSwitchSource => limit_switch::DEFAULT_SOURCE.raw() as f64,
        ParamEnum::LimitSwitchNormClosedAndDis => limit_switch::DEFAULT_NORMAL.raw() as f64,
        ParamEnum::LimitSwitchRemoteDevId => limit_switch::DEFAULT_DEVICE_ID as f64,
        ParamEnum::CustomParam => params::DEFAULT_CUSTOM_PARAM as f64,
    }
}

fn bool_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RemoteFeedbackDevice;

    #[test]
    fn test_factory_values() {
        let mut device = SimulatedDevice::new(3);
        assert_eq!(device.get_parameter(ParamEnum::NeutralDeadband, 0, 10), Ok(0.04));
        assert_eq!(device.get_parameter(ParamEnum::PeakNegOutput, 0, 10), Ok(-1.0));
        assert_eq!(
            device.get_parameter(ParamEnum::FeedbackSensorType, 1, 10),
            Ok(RemoteFeedbackDevice::FactoryDefaultOff.raw() as f64)
        );
    }

    #[test]
    fn test_set_then_get() {
        let mut device = SimulatedDevice::new(0);
        assert_eq!(device.set_parameter(ParamEnum::ProfileParamSlotP, 0.25, 2, 10), StatusCode::Ok);
        assert_eq!(device.get_parameter(ParamEnum::ProfileParamSlotP, 2, 10), Ok(0.25));
        assert_eq!(device.get_parameter(ParamEnum::ProfileParamSlotP, 1, 10), Ok(0.0));
        assert_eq!(device.writes().len(), 1);
    }

    #[test]
    fn test_combined_limit_switch_write() {
        let mut device = SimulatedDevice::new(0);
        let bits = 3 | (1 << 8) | (9 << 16);
        assert_eq!(
            device.set_combined_parameter(ParamEnum::LimitSwitchSource, bits, 1, 10),
            StatusCode::Ok
        );
        assert_eq!(device.value(ParamEnum::LimitSwitchSource, 1), 3.0);
        assert_eq!(device.value(ParamEnum::LimitSwitchNormClosedAndDis, 1), 1.0);
        assert_eq!(device.value(ParamEnum::LimitSwitchRemoteDevId, 1), 9.0);
        assert_eq!(device.value(ParamEnum::LimitSwitchRemoteDevId, 0), 0.0);
    }

    #[test]
    fn test_injected_fault() {
        let mut device = SimulatedDevice::new(0);
        device.inject_fault(ParamEnum::OpenloopRamp, StatusCode::InvalidParamValue);

        assert_eq!(
            device.set_parameter(ParamEnum::OpenloopRamp, 0.5, 0, 10),
            StatusCode::InvalidParamValue
        );
        assert_eq!(
            device.get_parameter(ParamEnum::OpenloopRamp, 0, 10),
            Err(StatusCode::InvalidParamValue)
        );
        assert!(device.writes().is_empty());

        device.clear_faults();
        assert_eq!(device.get_parameter(ParamEnum::OpenloopRamp, 0, 10), Ok(0.0));
    }

    #[test]
    fn test_dropped_frame_times_out() {
        let mut device = SimulatedDevice::new(0);
        device.inject_fault(ParamEnum::SensorTerm, StatusCode::RxTimeout);
        assert_eq!(
            device.set_parameter(ParamEnum::SensorTerm, 12.0, 0, 10),
            StatusCode::RxTimeout
        );
        assert_eq!(
            device.get_parameter(ParamEnum::SensorTerm, 0, 10),
            Err(StatusCode::RxTimeout)
        );
    }

    #[test]
    fn test_fire_and_forget_reports_ok() {
        let mut device = SimulatedDevice::new(0);
        device.inject_fault(ParamEnum::MotMagAccel, StatusCode::InvalidParamValue);
        assert_eq!(device.set_parameter(ParamEnum::MotMagAccel, 100.0, 0, 0), StatusCode::Ok);
        assert_eq!(device.value(ParamEnum::MotMagAccel, 0), 0.0);
    }

    #[test]
    fn test_large_integer_kept_exactly() {
        let mut device = SimulatedDevice::new(0);
        let threshold = ParamEnum::ReverseSoftLimitThreshold;
        assert_eq!(device.set_parameter(threshold, -16_777_217.0, 0, 10), StatusCode::Ok);
        assert_eq!(device.writes()[0].value, ParamValue::Integer(-16_777_217));
        assert_eq!(device.get_parameter(threshold, 0, 10), Ok(-16_777_217.0));
    }

    #[test]
    fn test_fractional_integer_rejected() {
        let mut device = SimulatedDevice::new(0);
        assert_eq!(
            device.set_parameter(ParamEnum::CustomParam, 2.5, 0, 10),
            StatusCode::InvalidParamValue
        );
        assert!(device.writes().is_empty());
    }

    #[test]
    fn test_wrong_value_kind_rejected() {
        let mut device = SimulatedDevice::new(0);
        let id = protocol::frame_id(device.base_id(), api_ids::PARAM_SET).unwrap();
        let data = encode_param_set(ParamEnum::MotMagAccel.id(), 0, ParamValue::Float(100.0));
        let (_, response) = device.handle_frame(id.as_raw(), &data).unwrap();
        assert_eq!(
            decode_param_response(&response).unwrap().status,
            StatusCode::InvalidParamValue
        );
        assert!(device.writes().is_empty());
    }

    #[test]
    fn test_read_without_timeout_waits_default() {
        let mut device = SimulatedDevice::new(0);
        device.set_response_delay(20);

        assert_eq!(device.get_parameter(ParamEnum::NeutralDeadband, 0, 0), Ok(0.04));
        assert_eq!(
            device.get_parameter(ParamEnum::NeutralDeadband, 0, 10),
            Err(StatusCode::RxTimeout)
        );

        device.set_response_delay(crate::channel::DEFAULT_READ_TIMEOUT_MS + 1);
        assert_eq!(
            device.get_parameter(ParamEnum::NeutralDeadband, 0, 0),
            Err(StatusCode::RxTimeout)
        );
    }

    #[test]
    fn test_slow_answer_still_applies_write() {
        let mut device = SimulatedDevice::new(0);
        device.set_response_delay(20);
        assert_eq!(
            device.set_parameter(ParamEnum::OpenloopRamp, 0.5, 0, 10),
            StatusCode::RxTimeout
        );
        assert_eq!(device.value(ParamEnum::OpenloopRamp, 0), 0.5);
    }

    #[test]
    fn test_other_device_ignored() {
        let mut device = SimulatedDevice::new(1);
        let other = protocol::frame_id(protocol::VICTOR_SPX_DEVICE_TYPE | 2, api_ids::PARAM_SET).unwrap();
        let data = encode_param_set(ParamEnum::CustomParam.id(), 0, ParamValue::Integer(4));
        assert!(device.handle_frame(other.as_raw(), &data).is_none());
        assert!(device.writes().is_empty());
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut device = SimulatedDevice::new(0);
        let id = protocol::frame_id(device.base_id(), api_ids::PARAM_SET).unwrap();
        let data = encode_param_set(999, 0, ParamValue::Float(1.0));
        let (_, response) = device.handle_frame(id.as_raw(), &data).unwrap();
        assert_eq!(
            decode_param_response(&response).unwrap().status,
            StatusCode::InvalidParamValue
        );
    }
}
