//! Identifiers of the persistent parameters held by the controller firmware
//!
//! A parameter is addressed by its id plus an ordinal. The ordinal selects the
//! slot, PID index, sensor term or limit switch direction depending on the
//! parameter.

/// Persistent parameter id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamEnum {
    // === Output shaping (300-308) ===
    OpenloopRamp,
    ClosedloopRamp,
    NeutralDeadband,
    PeakPosOutput,
    NominalPosOutput,
    PeakNegOutput,
    NominalNegOutput,

    // === Closed-loop slot gains (310-319), ordinal = slot ===
    ProfileParamSlotP,
    ProfileParamSlotI,
    ProfileParamSlotD,
    ProfileParamSlotF,
    ProfileParamSlotIZone,
    ProfileParamSlotAllowableErr,
    ProfileParamSlotMaxIAccum,
    ProfileParamSlotPeakOutput,
    ProfileParamSlotClosedLoopPeriod,

    // === Velocity measurement (325-326) ===
    SampleVelocityPeriod,
    SampleVelocityWindow,

    // === Feedback selection (330-333), ordinal = PID index or sensor term ===
    SelectedSensorCoefficient,
    FeedbackSensorType,
    SensorTerm,
    PidLoopPolarity,

    // === Soft limits (340-343) ===
    ForwardSoftLimitThreshold,
    ReverseSoftLimitThreshold,
    ForwardSoftLimitEnable,
    ReverseSoftLimitEnable,

    // === Voltage compensation (350-351) ===
    NominalBatteryVoltage,
    BatteryVoltageFilterSize,

    // === Motion magic (410-411) ===
    MotMagAccel,
    MotMagVelCruise,

    // === Limit switches (421-424), ordinal 0 = forward, 1 = reverse ===
    LimitSwitchSource,
    LimitSwitchNormClosedAndDis,
    LimitSwitchRemoteDevId,

    // === User storage (440), ordinal = index ===
    CustomParam,
}

impl ParamEnum {
    pub const ALL: [ParamEnum; 34] = [
        ParamEnum::OpenloopRamp,
        ParamEnum::ClosedloopRamp,
        ParamEnum::NeutralDeadband,
        ParamEnum::PeakPosOutput,
        ParamEnum::NominalPosOutput,
        ParamEnum::PeakNegOutput,
        ParamEnum::NominalNegOutput,
        ParamEnum::ProfileParamSlotP,
        ParamEnum::ProfileParamSlotI,
        ParamEnum::ProfileParamSlotD,
        ParamEnum::ProfileParamSlotF,
        ParamEnum::ProfileParamSlotIZone,
        ParamEnum::ProfileParamSlotAllowableErr,
        ParamEnum::ProfileParamSlotMaxIAccum,
        ParamEnum::ProfileParamSlotPeakOutput,
        ParamEnum::ProfileParamSlotClosedLoopPeriod,
        ParamEnum::SampleVelocityPeriod,
        ParamEnum::SampleVelocityWindow,
        ParamEnum::SelectedSensorCoefficient,
        ParamEnum::FeedbackSensorType,
        ParamEnum::SensorTerm,
        ParamEnum::PidLoopPolarity,
        ParamEnum::ForwardSoftLimitThreshold,
        ParamEnum::ReverseSoftLimitThreshold,
        ParamEnum::ForwardSoftLimitEnable,
        ParamEnum::ReverseSoftLimitEnable,
        ParamEnum::NominalBatteryVoltage,
        ParamEnum::BatteryVoltageFilterSize,
        ParamEnum::MotMagAccel,
        ParamEnum::MotMagVelCruise,
        ParamEnum::LimitSwitchSource,
        ParamEnum::LimitSwitchNormClosedAndDis,
        ParamEnum::LimitSwitchRemoteDevId,
        ParamEnum::CustomParam,
    ];

    /// Id carried in bytes 0..2 of a parameter frame
    pub const fn id(self) -> u16 {
        match self {
            ParamEnum::OpenloopRamp => 300,
            ParamEnum::ClosedloopRamp => 301,
            ParamEnum::NeutralDeadband => 302,
            ParamEnum::PeakPosOutput => 305,
            ParamEnum::NominalPosOutput => 306,
            ParamEnum::PeakNegOutput => 307,
            ParamEnum::NominalNegOutput => 308,
            ParamEnum::ProfileParamSlotP => 310,
            ParamEnum::ProfileParamSlotI => 311,
            ParamEnum::ProfileParamSlotD => 312,
            ParamEnum::ProfileParamSlotF => 313,
            ParamEnum::ProfileParamSlotIZone => 314,
            ParamEnum::ProfileParamSlotAllowableErr => 315,
            ParamEnum::ProfileParamSlotMaxIAccum => 316,
            ParamEnum::ProfileParamSlotPeakOutput => 317,
            ParamEnum::ProfileParamSlotClosedLoopPeriod => 319,
            ParamEnum::SampleVelocityPeriod => 325,
            ParamEnum::SampleVelocityWindow => 326,
            ParamEnum::SelectedSensorCoefficient => 330,
            ParamEnum::FeedbackSensorType => 331,
            ParamEnum::SensorTerm => 332,
            ParamEnum::PidLoopPolarity => 333,
            ParamEnum::ForwardSoftLimitThreshold => 340,
            ParamEnum::ReverseSoftLimitThreshold => 341,
            ParamEnum::ForwardSoftLimitEnable => 342,
            ParamEnum::ReverseSoftLimitEnable => 343,
            ParamEnum::NominalBatteryVoltage => 350,
            ParamEnum::BatteryVoltageFilterSize => 351,
            ParamEnum::MotMagAccel => 410,
            ParamEnum::MotMagVelCruise => 411,
            ParamEnum::LimitSwitchSource => 421,
            ParamEnum::LimitSwitchNormClosedAndDis => 422,
            ParamEnum::LimitSwitchRemoteDevId => 424,
            ParamEnum::CustomParam => 440,
        }
    }

    /// Whether the firmware stores the parameter as an i32 rather than an f32
    ///
    /// Integer parameters travel as raw 32-bit values so counts above 2^24
    /// keep every bit.
    pub const fn is_integer(self) -> bool {
        !matches!(
            self,
            ParamEnum::OpenloopRamp
                | ParamEnum::ClosedloopRamp
                | ParamEnum::NeutralDeadband
                | ParamEnum::PeakPosOutput
                | ParamEnum::NominalPosOutput
                | ParamEnum::PeakNegOutput
                | ParamEnum::NominalNegOutput
                | ParamEnum::ProfileParamSlotP
                | ParamEnum::ProfileParamSlotI
                | ParamEnum::ProfileParamSlotD
                | ParamEnum::ProfileParamSlotF
                | ParamEnum::ProfileParamSlotMaxIAccum
                | ParamEnum::ProfileParamSlotPeakOutput
                | ParamEnum::SelectedSensorCoefficient
                | ParamEnum::NominalBatteryVoltage
        )
    }

    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|param| param.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<u16> = ParamEnum::ALL.iter().map(|p| p.id()).collect();
        assert_eq!(ids.len(), ParamEnum::ALL.len());
    }

    #[test]
    fn test_from_id() {
        assert_eq!(ParamEnum::from_id(332), Some(ParamEnum::SensorTerm));
        assert_eq!(ParamEnum::from_id(999), None);
    }

    #[test]
    fn test_value_kinds() {
        assert!(ParamEnum::ForwardSoftLimitThreshold.is_integer());
        assert!(ParamEnum::CustomParam.is_integer());
        assert!(ParamEnum::LimitSwitchSource.is_integer());
        assert!(!ParamEnum::ProfileParamSlotP.is_integer());
        assert!(!ParamEnum::SelectedSensorCoefficient.is_integer());
    }
}
