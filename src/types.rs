//! Enumerations shared by the configuration records and the controller

use serde::{Deserialize, Serialize};

/// Feedback source selectable on a Victor SPX
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteFeedbackDevice {
    /// Firmware power-on selection
    FactoryDefaultOff,
    SensorSum,
    SensorDifference,
    RemoteSensor0,
    RemoteSensor1,
    SoftwareEmulatedSensor,
}

impl RemoteFeedbackDevice {
    pub const fn raw(self) -> i32 {
        match self {
            RemoteFeedbackDevice::FactoryDefaultOff => 0,
            RemoteFeedbackDevice::SensorSum => 9,
            RemoteFeedbackDevice::SensorDifference => 10,
            RemoteFeedbackDevice::RemoteSensor0 => 11,
            RemoteFeedbackDevice::RemoteSensor1 => 12,
            RemoteFeedbackDevice::SoftwareEmulatedSensor => 15,
        }
    }

    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(RemoteFeedbackDevice::FactoryDefaultOff),
            9 => Some(RemoteFeedbackDevice::SensorSum),
            10 => Some(RemoteFeedbackDevice::SensorDifference),
            11 => Some(RemoteFeedbackDevice::RemoteSensor0),
            12 => Some(RemoteFeedbackDevice::RemoteSensor1),
            15 => Some(RemoteFeedbackDevice::SoftwareEmulatedSensor),
            _ => None,
        }
    }
}

/// Where a limit switch signal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteLimitSwitchSource {
    RemoteTalonSrx,
    RemoteCanifier,
    Deactivated,
}

impl RemoteLimitSwitchSource {
    pub const fn raw(self) -> i32 {
        match self {
            RemoteLimitSwitchSource::RemoteTalonSrx => 1,
            RemoteLimitSwitchSource::RemoteCanifier => 2,
            RemoteLimitSwitchSource::Deactivated => 3,
        }
    }

    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(RemoteLimitSwitchSource::RemoteTalonSrx),
            2 => Some(RemoteLimitSwitchSource::RemoteCanifier),
            3 => Some(RemoteLimitSwitchSource::Deactivated),
            _ => None,
        }
    }
}

/// Limit switch polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSwitchNormal {
    NormallyOpen,
    NormallyClosed,
    Disabled,
}

impl LimitSwitchNormal {
    pub const fn raw(self) -> i32 {
        match self {
            LimitSwitchNormal::NormallyOpen => 0,
            LimitSwitchNormal::NormallyClosed => 1,
            LimitSwitchNormal::Disabled => 2,
        }
    }

    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(LimitSwitchNormal::NormallyOpen),
            1 => Some(LimitSwitchNormal::NormallyClosed),
            2 => Some(LimitSwitchNormal::Disabled),
            _ => None,
        }
    }
}

/// Inputs of the on-device sensor sum/difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorTerm {
    Sum0,
    Sum1,
    Diff0,
    Diff1,
}

impl SensorTerm {
    pub const ALL: [SensorTerm; 4] = [
        SensorTerm::Sum0,
        SensorTerm::Sum1,
        SensorTerm::Diff0,
        SensorTerm::Diff1,
    ];

    pub const fn ordinal(self) -> i32 {
        match self {
            SensorTerm::Sum0 => 0,
            SensorTerm::Sum1 => 1,
            SensorTerm::Diff0 => 2,
            SensorTerm::Diff1 => 3,
        }
    }
}

/// Closed-loop slot on the device: 0 primary, 1 auxiliary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PidIdx {
    Primary,
    Auxiliary,
}

impl PidIdx {
    pub const fn ordinal(self) -> i32 {
        match self {
            PidIdx::Primary => 0,
            PidIdx::Auxiliary => 1,
        }
    }
}

/// Velocity measurement period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VelocityMeasPeriod {
    #[serde(rename = "1ms")]
    Period1Ms,
    #[serde(rename = "2ms")]
    Period2Ms,
    #[serde(rename = "5ms")]
    Period5Ms,
    #[serde(rename = "10ms")]
    Period10Ms,
    #[serde(rename = "20ms")]
    Period20Ms,
    #[serde(rename = "25ms")]
    Period25Ms,
    #[serde(rename = "50ms")]
    Period50Ms,
    #[serde(rename = "100ms")]
    Period100Ms,
}

impl VelocityMeasPeriod {
    /// Period in milliseconds, which is also the device value
    pub const fn raw(self) -> i32 {
        match self {
            VelocityMeasPeriod::Period1Ms => 1,
            VelocityMeasPeriod::Period2Ms => 2,
            VelocityMeasPeriod::Period5Ms => 5,
            VelocityMeasPeriod::Period10Ms => 10,
            VelocityMeasPeriod::Period20Ms => 20,
            VelocityMeasPeriod::Period25Ms => 25,
            VelocityMeasPeriod::Period50Ms => 50,
            VelocityMeasPeriod::Period100Ms => 100,
        }
    }

    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(VelocityMeasPeriod::Period1Ms),
            2 => Some(VelocityMeasPeriod::Period2Ms),
            5 => Some(VelocityMeasPeriod::Period5Ms),
            10 => Some(VelocityMeasPeriod::Period10Ms),
            20 => Some(VelocityMeasPeriod::Period20Ms),
            25 => Some(VelocityMeasPeriod::Period25Ms),
            50 => Some(VelocityMeasPeriod::Period50Ms),
            100 => Some(VelocityMeasPeriod::Period100Ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_raw_values() {
        assert_eq!(RemoteFeedbackDevice::from_raw(3), None);
        assert_eq!(RemoteLimitSwitchSource::from_raw(0), None);
        assert_eq!(LimitSwitchNormal::from_raw(-1), None);
        assert_eq!(VelocityMeasPeriod::from_raw(30), None);
    }

    #[test]
    fn test_sensor_term_ordinals() {
        let ordinals: Vec<i32> = SensorTerm::ALL.iter().map(|t| t.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_feedback_device_raw() {
        assert_eq!(RemoteFeedbackDevice::RemoteSensor0.raw(), 11);
        assert_eq!(
            RemoteFeedbackDevice::from_raw(12),
            Some(RemoteFeedbackDevice::RemoteSensor1)
        );
    }
}
