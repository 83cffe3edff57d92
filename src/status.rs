//! Device status codes and worst-status reduction
//!
//! Every remote operation answers with a [`StatusCode`]. Multi-step operations
//! collect the individual results in an [`ErrorAccumulator`] and report only the
//! most severe one.

use thiserror::Error;

/// Result of one remote operation.
///
/// Variants are declared from least to most severe; the derived ordering is
/// the severity ordering.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StatusCode {
    #[default]
    #[error("ok")]
    Ok,

    /// Warning: the last received frame for this signal is stale
    #[error("CAN message is stale")]
    CanMsgStale,

    #[error("not all PID values were updated")]
    NotAllPidValuesUpdated,

    #[error("signal was not updated")]
    SigNotUpdated,

    /// No response from the device within the timeout
    #[error("timed out waiting for the device to respond")]
    RxTimeout,

    #[error("timed out transmitting to the device")]
    TxTimeout,

    #[error("parameter value rejected")]
    InvalidParamValue,

    #[error("unexpected arbitration id")]
    UnexpectedArbId,

    #[error("sensor not present")]
    SensorNotPresent,

    #[error("firmware too old")]
    FirmwareTooOld,

    #[error("not implemented")]
    NotImplemented,

    #[error("CAN receive buffer overflow")]
    CanOverflow,

    #[error("CAN transmit failed")]
    TxFailed,

    #[error("general error")]
    GeneralError,
}

impl StatusCode {
    /// Wire code carried in response frames
    pub const fn code(self) -> i8 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::CanMsgStale => 1,
            StatusCode::TxFailed => -1,
            StatusCode::InvalidParamValue => -2,
            StatusCode::RxTimeout => -3,
            StatusCode::TxTimeout => -4,
            StatusCode::UnexpectedArbId => -5,
            StatusCode::CanOverflow => -6,
            StatusCode::SensorNotPresent => -7,
            StatusCode::FirmwareTooOld => -8,
            StatusCode::GeneralError => -100,
            StatusCode::NotImplemented => -101,
            StatusCode::SigNotUpdated => -120,
            StatusCode::NotAllPidValuesUpdated => -121,
        }
    }

    /// Decode a wire code. Codes the host does not know map to `GeneralError`.
    pub const fn from_code(code: i8) -> Self {
        match code {
            0 => StatusCode::Ok,
            1 => StatusCode::CanMsgStale,
            -1 => StatusCode::TxFailed,
            -2 => StatusCode::InvalidParamValue,
            -3 => StatusCode::RxTimeout,
            -4 => StatusCode::TxTimeout,
            -5 => StatusCode::UnexpectedArbId,
            -6 => StatusCode::CanOverflow,
            -7 => StatusCode::SensorNotPresent,
            -8 => StatusCode::FirmwareTooOld,
            -101 => StatusCode::NotImplemented,
            -120 => StatusCode::SigNotUpdated,
            -121 => StatusCode::NotAllPidValuesUpdated,
            _ => StatusCode::GeneralError,
        }
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, StatusCode::Ok)
    }

    /// Positive wire codes are warnings; the operation still took effect
    pub const fn is_warning(self) -> bool {
        self.code() > 0
    }

    pub const fn is_error(self) -> bool {
        self.code() < 0
    }
}

/// Collects the statuses of a multi-step operation
///
/// Created per top-level call and dropped when the call returns.
#[derive(Debug, Default, Clone)]
pub struct ErrorAccumulator {
    worst: StatusCode,
    count: usize,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one result
    pub fn append(&mut self, code: StatusCode) {
        self.count += 1;
        if code > self.worst {
            self.worst = code;
        }
    }

    /// Most severe status recorded so far, `Ok` if none
    pub fn worst(&self) -> StatusCode {
        self.worst
    }

    /// Number of results recorded
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Extend<StatusCode> for ErrorAccumulator {
    fn extend<I: IntoIterator<Item = StatusCode>>(&mut self, iter: I) {
        for code in iter {
            self.append(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accumulator_is_ok() {
        let errors = ErrorAccumulator::new();
        assert_eq!(errors.worst(), StatusCode::Ok);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_worst_of_sequence() {
        let mut errors = ErrorAccumulator::new();
        errors.append(StatusCode::Ok);
        errors.append(StatusCode::RxTimeout);
        errors.append(StatusCode::Ok);
        assert_eq!(errors.worst(), StatusCode::RxTimeout);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_bus_failure_outranks_timeout() {
        let mut errors = ErrorAccumulator::new();
        errors.extend([StatusCode::TxFailed, StatusCode::RxTimeout, StatusCode::CanMsgStale]);
        assert_eq!(errors.worst(), StatusCode::TxFailed);
    }

    #[test]
    fn test_warning_is_less_severe_than_error() {
        assert!(StatusCode::CanMsgStale > StatusCode::Ok);
        assert!(StatusCode::CanMsgStale < StatusCode::RxTimeout);
        assert!(StatusCode::CanMsgStale.is_warning());
        assert!(StatusCode::RxTimeout.is_error());
    }

    #[test]
    fn test_wire_codes() {
        for status in [
            StatusCode::Ok,
            StatusCode::CanMsgStale,
            StatusCode::RxTimeout,
            StatusCode::InvalidParamValue,
            StatusCode::NotAllPidValuesUpdated,
            StatusCode::GeneralError,
        ] {
            assert_eq!(StatusCode::from_code(status.code()), status);
        }
        assert_eq!(StatusCode::from_code(-77), StatusCode::GeneralError);
    }
}
