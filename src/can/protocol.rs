// CAN parameter frame protocol for Victor SPX persistent configuration
use embedded_can::ExtendedId;
use tracing::{error, warn};

use crate::param::ParamEnum;
use crate::status::StatusCode;
use crate::types::{LimitSwitchNormal, RemoteLimitSwitchSource};

/// Device type bits of a Victor SPX arbitration id
pub const VICTOR_SPX_DEVICE_TYPE: u32 = 0x0104_0000;

/// Highest device number on the bus
pub const MAX_DEVICE_NUMBER: u8 = 62;

/// API bits of the parameter frames
pub mod api_ids {
    /// Host -> device: read a parameter (param id, ordinal)
    pub const PARAM_REQUEST: u32 = 0x1800;

    /// Device -> host: answer to a request or a set (param id, ordinal, status, value)
    pub const PARAM_RESPONSE: u32 = 0x1840;

    /// Host -> device: write a parameter (param id, ordinal, flags, value)
    pub const PARAM_SET: u32 = 0x1880;
}

/// Set frame flags (byte 3)
pub mod flags {
    /// Value bytes are a raw 32-bit value, not an f32
    pub const RAW: u8 = 0x01;

    /// Raw value packs several sub-fields of one parameter
    pub const COMBINED: u8 = 0x02;
}

/// Value carried in bytes 4..8 of a parameter frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Integer(i32),
    Bitfield(u32),
}

impl ParamValue {
    pub fn bits(self) -> u32 {
        match self {
            ParamValue::Float(value) => value.to_bits(),
            ParamValue::Integer(value) => value as u32,
            ParamValue::Bitfield(bits) => bits,
        }
    }

    fn flags(self) -> u8 {
        match self {
            ParamValue::Float(_) => 0,
            ParamValue::Integer(_) => flags::RAW,
            ParamValue::Bitfield(_) => flags::RAW | flags::COMBINED,
        }
    }
}

/// Wire form of a numeric parameter value
///
/// # Returns
/// * `Some(ParamValue::Integer)` for integer parameters holding a whole i32
/// * `Some(ParamValue::Float)` for float parameters
/// * `None` if an integer parameter is given a fraction or an out of range value
pub fn encode_value(param: ParamEnum, value: f64) -> Option<ParamValue> {
    if !param.is_integer() {
        return Some(ParamValue::Float(value as f32));
    }
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(ParamValue::Integer(value as i32))
}

/// Numeric value of the bits a device reported for a parameter
pub fn decode_value(param: ParamEnum, bits: u32) -> f64 {
    if param.is_integer() {
        bits as i32 as f64
    } else {
        widen(f32::from_bits(bits))
    }
}

/// Decoded set frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSet {
    pub param_id: u16,
    pub ordinal: u8,
    pub value: ParamValue,
}

/// Decoded response frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamResponse {
    pub param_id: u16,
    pub ordinal: u8,
    pub status: StatusCode,
    pub value_bits: u32,
}

impl ParamResponse {
    /// Value decoded by the kind of the answered parameter
    ///
    /// Floats are widened through their shortest decimal form, so a 0.04
    /// written as f32 reads back as 0.04.
    pub fn value(&self) -> f64 {
        match ParamEnum::from_id(self.param_id) {
            Some(param) => decode_value(param, self.value_bits),
            None => widen(f32::from_bits(self.value_bits)),
        }
    }
}

/// Widen an f32 through its shortest round-trip decimal representation
pub fn widen(value: f32) -> f64 {
    let text = value.to_string();
    text.parse::<f64>().unwrap_or(value as f64)
}

/// Base arbitration id of a Victor SPX
///
/// # Arguments
/// * `device_number` - CAN device number [0, 62]
///
/// # Returns
/// * `Some(base_id)` if the device number is in range
/// * `None` otherwise
pub fn base_arbitration_id(device_number: u8) -> Option<u32> {
    if device_number > MAX_DEVICE_NUMBER {
        error!("Device number {} out of range [0, {}]", device_number, MAX_DEVICE_NUMBER);
        return None;
    }
    Some(VICTOR_SPX_DEVICE_TYPE | device_number as u32)
}

/// Arbitration id of a parameter frame for a device
///
/// # Arguments
/// * `base_id` - Base arbitration id of the device
/// * `api` - One of [`api_ids`]
pub fn frame_id(base_id: u32, api: u32) -> Option<ExtendedId> {
    ExtendedId::new((base_id & 0xFFFF_0000) | api | (base_id & 0x3F))
}

/// Device number part of an arbitration id
pub fn device_number_of(id: u32) -> u8 {
    (id & 0x3F) as u8
}

/// API part of an arbitration id
pub fn api_of(id: u32) -> u32 {
    id & 0xFFC0
}

fn encode_header(param_id: u16, ordinal: u8, byte3: u8) -> [u8; 8] {
    let mut data = [0u8; 8];
    data[0..2].copy_from_slice(&param_id.to_le_bytes());
    data[2] = ordinal;
    data[3] = byte3;
    data
}

/// Encode a parameter write into CAN data
///
/// # Returns
/// 8-byte array: param id (LE), ordinal, flags, value (LE)
pub fn encode_param_set(param_id: u16, ordinal: u8, value: ParamValue) -> [u8; 8] {
    let mut data = encode_header(param_id, ordinal, value.flags());
    data[4..8].copy_from_slice(&value.bits().to_le_bytes());
    data
}

/// Parse a parameter write from CAN data
///
/// # Returns
/// * `Some(ParamSet)` if parsing successful
/// * `None` if data length is incorrect
pub fn decode_param_set(data: &[u8]) -> Option<ParamSet> {
    if data.len() < 8 {
        warn!("Param set: invalid data length {}", data.len());
        return None;
    }

    let param_id = u16::from_le_bytes([data[0], data[1]]);
    let bits = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let value = if data[3] & flags::RAW == 0 {
        ParamValue::Float(f32::from_bits(bits))
    } else if data[3] & flags::COMBINED != 0 {
        ParamValue::Bitfield(bits)
    } else {
        ParamValue::Integer(bits as i32)
    };

    Some(ParamSet {
        param_id,
        ordinal: data[2],
        value,
    })
}

/// Encode a parameter read request into CAN data
pub fn encode_param_request(param_id: u16, ordinal: u8) -> [u8; 8] {
    encode_header(param_id, ordinal, 0)
}

/// Parse a parameter read request from CAN data
///
/// # Returns
/// * `Some((param_id, ordinal))` if parsing successful
/// * `None` if data length is incorrect
pub fn decode_param_request(data: &[u8]) -> Option<(u16, u8)> {
    if data.len() < 3 {
        warn!("Param request: invalid data length {}", data.len());
        return None;
    }
    Some((u16::from_le_bytes([data[0], data[1]]), data[2]))
}

/// Encode a parameter response into CAN data
///
/// # Arguments
/// * `status` - Result of the request or write, carried in byte 3
/// * `value_bits` - Current value of the parameter
pub fn encode_param_response(
    param_id: u16,
    ordinal: u8,
    status: StatusCode,
    value_bits: u32,
) -> [u8; 8] {
    let mut data = encode_header(param_id, ordinal, status.code() as u8);
    data[4..8].copy_from_slice(&value_bits.to_le_bytes());
    data
}

/// Parse a parameter response from CAN data
///
/// # Returns
/// * `Some(ParamResponse)` if parsing successful
/// * `None` if data length is incorrect
pub fn decode_param_response(data: &[u8]) -> Option<ParamResponse> {
    if data.len() < 8 {
        warn!("Param response: invalid data length {}", data.len());
        return None;
    }

    Some(ParamResponse {
        param_id: u16::from_le_bytes([data[0], data[1]]),
        ordinal: data[2],
        status: StatusCode::from_code(data[3] as i8),
        value_bits: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
    })
}

/// Check that a response answers the given parameter
///
/// # Returns
/// * `Ok(response)` if the response echoes `param_id` and `ordinal`
/// * `Err(StatusCode::UnexpectedArbId)` if it answers something else
pub fn match_response(
    response: ParamResponse,
    param_id: u16,
    ordinal: u8,
) -> Result<ParamResponse, StatusCode> {
    if response.param_id == param_id && response.ordinal == ordinal {
        Ok(response)
    } else {
        Err(StatusCode::UnexpectedArbId)
    }
}

/// Pack a limit switch source, polarity and remote device id into one value
///
/// Bits 0..8 source, 8..16 polarity, 16..32 remote device id.
///
/// # Returns
/// * `Some(bits)` if `device_id` is a device number [0, 62]
/// * `None` otherwise
pub fn pack_limit_switch(
    source: RemoteLimitSwitchSource,
    normal: LimitSwitchNormal,
    device_id: i32,
) -> Option<u32> {
    let device_id = u8::try_from(device_id).ok().filter(|id| *id <= MAX_DEVICE_NUMBER)?;
    let source = source.raw() as u32 & 0xFF;
    let normal = normal.raw() as u32 & 0xFF;
    Some(source | (normal << 8) | ((device_id as u32) << 16))
}

/// Split a packed limit switch value into raw (source, polarity, remote id)
pub fn unpack_limit_switch(bits: u32) -> (i32, i32, i32) {
    (
        (bits & 0xFF) as i32,
        ((bits >> 8) & 0xFF) as i32,
        (bits >> 16) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_can::Id;

    #[test]
    fn test_base_arbitration_id() {
        assert_eq!(base_arbitration_id(0), Some(0x0104_0000));
        assert_eq!(base_arbitration_id(62), Some(0x0104_003E));
        assert_eq!(base_arbitration_id(63), None);
    }

    #[test]
    fn test_frame_ids() {
        let base_id = base_arbitration_id(5).unwrap();
        let set = frame_id(base_id, api_ids::PARAM_SET).unwrap();
        let response = frame_id(base_id, api_ids::PARAM_RESPONSE).unwrap();

        assert_eq!(set.as_raw(), 0x0104_1885);
        assert_eq!(response.as_raw(), 0x0104_1845);
        assert_eq!(device_number_of(set.as_raw()), 5);
        assert_eq!(api_of(set.as_raw()), api_ids::PARAM_SET);
        assert!(matches!(Id::from(set), Id::Extended(_)));
    }

    #[test]
    fn test_encode_decode_param_set() {
        let data = encode_param_set(330, 1, ParamValue::Float(0.5));
        let decoded = decode_param_set(&data).unwrap();
        assert_eq!(decoded.param_id, 330);
        assert_eq!(decoded.ordinal, 1);
        assert_eq!(decoded.value, ParamValue::Float(0.5));

        let data = encode_param_set(421, 0, ParamValue::Bitfield(0x0007_0101));
        assert_eq!(data[3], flags::RAW | flags::COMBINED);
        assert_eq!(decode_param_set(&data).unwrap().value, ParamValue::Bitfield(0x0007_0101));

        let data = encode_param_set(341, 0, ParamValue::Integer(-5));
        assert_eq!(data[3], flags::RAW);
        assert_eq!(&data[4..8], &(-5i32).to_le_bytes());
        assert_eq!(decode_param_set(&data).unwrap().value, ParamValue::Integer(-5));
    }

    #[test]
    fn test_integer_parameters_keep_every_bit() {
        let threshold = ParamEnum::ForwardSoftLimitThreshold;
        let value = encode_value(threshold, 16_777_217.0).unwrap();
        assert_eq!(value, ParamValue::Integer(16_777_217));
        assert_eq!(decode_value(threshold, value.bits()), 16_777_217.0);

        let response = decode_param_response(&encode_param_response(
            ParamEnum::CustomParam.id(),
            0,
            StatusCode::Ok,
            ParamValue::Integer(-123_456_789).bits(),
        ))
        .unwrap();
        assert_eq!(response.value(), -123_456_789.0);
    }

    #[test]
    fn test_encode_value_rejects_unrepresentable_integers() {
        assert_eq!(encode_value(ParamEnum::CustomParam, 1.5), None);
        assert_eq!(encode_value(ParamEnum::CustomParam, 3_000_000_000.0), None);
        assert_eq!(encode_value(ParamEnum::ProfileParamSlotP, 1.5), Some(ParamValue::Float(1.5)));
    }

    #[test]
    fn test_response_carries_status() {
        let data = encode_param_response(302, 0, StatusCode::InvalidParamValue, 0);
        let decoded = decode_param_response(&data).unwrap();
        assert_eq!(decoded.status, StatusCode::InvalidParamValue);
        assert_eq!(decoded.param_id, 302);
    }

    #[test]
    fn test_short_frames_rejected() {
        assert!(decode_param_set(&[0u8; 4]).is_none());
        assert!(decode_param_response(&[0u8; 7]).is_none());
        assert!(decode_param_request(&[0u8; 2]).is_none());
    }

    #[test]
    fn test_match_response() {
        let response = decode_param_response(&encode_param_response(332, 2, StatusCode::Ok, 0)).unwrap();
        assert!(match_response(response, 332, 2).is_ok());
        assert_eq!(match_response(response, 332, 3), Err(StatusCode::UnexpectedArbId));
    }

    #[test]
    fn test_widen_keeps_decimal_value() {
        assert_eq!(widen(0.04), 0.04);
        assert_eq!(widen(-1.0), -1.0);
    }

    #[test]
    fn test_pack_limit_switch() {
        let bits = pack_limit_switch(
            RemoteLimitSwitchSource::RemoteCanifier,
            LimitSwitchNormal::NormallyClosed,
            17,
        )
        .unwrap();
        assert_eq!(unpack_limit_switch(bits), (2, 1, 17));

        let source = RemoteLimitSwitchSource::Deactivated;
        let normal = LimitSwitchNormal::NormallyOpen;
        assert!(pack_limit_switch(source, normal, 62).is_some());
        assert!(pack_limit_switch(source, normal, 63).is_none());
        assert!(pack_limit_switch(source, normal, 70_000).is_none());
        assert!(pack_limit_switch(source, normal, -1).is_none());
    }
}
