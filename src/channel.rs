//! Single-parameter access to a device
//!
//! Implementations own the transport and the timeout semantics of writes:
//! * `timeout_ms == 0`: send and return immediately, nothing is verified
//! * `timeout_ms > 0`: block until the device acknowledges or the timeout
//!   elapses, in which case `StatusCode::RxTimeout` is returned
//!
//! A read has nothing to return without an answer, so it always waits. A
//! read timeout of 0 waits [`DEFAULT_READ_TIMEOUT_MS`].

use crate::param::ParamEnum;
use crate::status::StatusCode;

/// Wait of a read issued with `timeout_ms == 0` [ms]
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 50;

/// Effective wait of a read
pub fn read_timeout_ms(timeout_ms: u64) -> u64 {
    if timeout_ms == 0 {
        DEFAULT_READ_TIMEOUT_MS
    } else {
        timeout_ms
    }
}

/// Timed read/write of one persistent parameter
pub trait ParameterChannel {
    /// Write one numeric parameter
    ///
    /// # Arguments
    /// * `param` - Parameter id
    /// * `value` - New value
    /// * `ordinal` - Slot, PID index or term the value belongs to
    /// * `timeout_ms` - Acknowledge timeout, 0 = fire and forget
    fn set_parameter(
        &mut self,
        param: ParamEnum,
        value: f64,
        ordinal: i32,
        timeout_ms: u64,
    ) -> StatusCode;

    /// Read one parameter
    ///
    /// `timeout_ms == 0` waits [`DEFAULT_READ_TIMEOUT_MS`].
    fn get_parameter(
        &mut self,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Result<f64, StatusCode>;

    /// Write several logical fields packed into one physical parameter
    fn set_combined_parameter(
        &mut self,
        param: ParamEnum,
        bitfield: u32,
        sub_index: i32,
        timeout_ms: u64,
    ) -> StatusCode;
}

impl<C: ParameterChannel + ?Sized> ParameterChannel for &mut C {
    fn set_parameter(
        &mut self,
        param: ParamEnum,
        value: f64,
        ordinal: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        (**self).set_parameter(param, value, ordinal, timeout_ms)
    }

    fn get_parameter(
        &mut self,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Result<f64, StatusCode> {
        (**self).get_parameter(param, ordinal, timeout_ms)
    }

    fn set_combined_parameter(
        &mut self,
        param: ParamEnum,
        bitfield: u32,
        sub_index: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        (**self).set_combined_parameter(param, bitfield, sub_index, timeout_ms)
    }
}

impl<C: ParameterChannel + ?Sized> ParameterChannel for Box<C> {
    fn set_parameter(
        &mut self,
        param: ParamEnum,
        value: f64,
        ordinal: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        (**self).set_parameter(param, value, ordinal, timeout_ms)
    }

    fn get_parameter(
        &mut self,
        param: ParamEnum,
        ordinal: i32,
        timeout_ms: u64,
    ) -> Result<f64, StatusCode> {
        (**self).get_parameter(param, ordinal, timeout_ms)
    }

    fn set_combined_parameter(
        &mut self,
        param: ParamEnum,
        bitfield: u32,
        sub_index: i32,
        timeout_ms: u64,
    ) -> StatusCode {
        (**self).set_combined_parameter(param, bitfield, sub_index, timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_timeout() {
        assert_eq!(read_timeout_ms(0), DEFAULT_READ_TIMEOUT_MS);
        assert_eq!(read_timeout_ms(5), 5);
    }
}
