//! Write gating per configurable field
//!
//! `write_gate` is the single table deciding when a field is written by the
//! configure-all routines. The gates are not uniform across fields.

/// When a field is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteGate {
    /// Every call
    Unconditional,
    /// Only when the value differs from its default, whatever the
    /// optimization flag says
    WhenDifferent,
    /// When the value differs from its default or optimizations are disabled
    WhenDifferentOrUnoptimized,
}

/// Every field written by the configure-all routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // === Shared ===
    OpenLoopRamp,
    ClosedLoopRamp,
    PeakOutputForward,
    PeakOutputReverse,
    NominalOutputForward,
    NominalOutputReverse,
    NeutralDeadband,
    VoltageCompSaturation,
    VoltageMeasurementFilter,
    VelocityMeasurementPeriod,
    VelocityMeasurementWindow,
    ForwardSoftLimitThreshold,
    ReverseSoftLimitThreshold,
    ForwardSoftLimitEnable,
    ReverseSoftLimitEnable,
    SlotKp,
    SlotKi,
    SlotKd,
    SlotKf,
    SlotIntegralZone,
    SlotAllowableClosedloopError,
    SlotMaxIntegralAccumulator,
    SlotClosedLoopPeakOutput,
    SlotClosedLoopPeriod,
    AuxPidPolarity,
    MotionCruiseVelocity,
    MotionAcceleration,
    CustomParam0,
    CustomParam1,

    // === PID sets ===
    PidFeedbackCoefficient,
    PidFeedbackSensor,

    // === Victor SPX ===
    ForwardLimitSwitch,
    ReverseLimitSwitch,
    Sum0Term,
    Sum1Term,
    Diff0Term,
    Diff1Term,
}

impl Field {
    pub const ALL: [Field; 37] = [
        Field::OpenLoopRamp,
        Field::ClosedLoopRamp,
        Field::PeakOutputForward,
        Field::PeakOutputReverse,
        Field::NominalOutputForward,
        Field::NominalOutputReverse,
        Field::NeutralDeadband,
        Field::VoltageCompSaturation,
        Field::VoltageMeasurementFilter,
        Field::VelocityMeasurementPeriod,
        Field::VelocityMeasurementWindow,
        Field::ForwardSoftLimitThreshold,
        Field::ReverseSoftLimitThreshold,
        Field::ForwardSoftLimitEnable,
        Field::ReverseSoftLimitEnable,
        Field::SlotKp,
        Field::SlotKi,
        Field::SlotKd,
        Field::SlotKf,
        Field::SlotIntegralZone,
        Field::SlotAllowableClosedloopError,
        Field::SlotMaxIntegralAccumulator,
        Field::SlotClosedLoopPeakOutput,
        Field::SlotClosedLoopPeriod,
        Field::AuxPidPolarity,
        Field::MotionCruiseVelocity,
        Field::MotionAcceleration,
        Field::CustomParam0,
        Field::CustomParam1,
        Field::PidFeedbackCoefficient,
        Field::PidFeedbackSensor,
        Field::ForwardLimitSwitch,
        Field::ReverseLimitSwitch,
        Field::Sum0Term,
        Field::Sum1Term,
        Field::Diff0Term,
        Field::Diff1Term,
    ];
}

/// Gate of each field
pub const fn write_gate(field: Field) -> WriteGate {
    match field {
        // The firmware boots with a sensor selection the record cannot express
        Field::PidFeedbackSensor => WriteGate::Unconditional,

        Field::ForwardLimitSwitch
        | Field::ReverseLimitSwitch
        | Field::Sum0Term
        | Field::Sum1Term
        | Field::Diff0Term
        | Field::Diff1Term => WriteGate::WhenDifferent,

        Field::PidFeedbackCoefficient
        | Field::OpenLoopRamp
        | Field::ClosedLoopRamp
        | Field::PeakOutputForward
        | Field::PeakOutputReverse
        | Field::NominalOutputForward
        | Field::NominalOutputReverse
        | Field::NeutralDeadband
        | Field::VoltageCompSaturation
        | Field::VoltageMeasurementFilter
        | Field::VelocityMeasurementPeriod
        | Field::VelocityMeasurementWindow
        | Field::ForwardSoftLimitThreshold
        | Field::ReverseSoftLimitThreshold
        | Field::ForwardSoftLimitEnable
        | Field::ReverseSoftLimitEnable
        | Field::SlotKp
        | Field::SlotKi
        | Field::SlotKd
        | Field::SlotKf
        | Field::SlotIntegralZone
        | Field::SlotAllowableClosedloopError
        | Field::SlotMaxIntegralAccumulator
        | Field::SlotClosedLoopPeakOutput
        | Field::SlotClosedLoopPeriod
        | Field::AuxPidPolarity
        | Field::MotionCruiseVelocity
        | Field::MotionAcceleration
        | Field::CustomParam0
        | Field::CustomParam1 => WriteGate::WhenDifferentOrUnoptimized,
    }
}

/// Whether `field` has to be written
///
/// # Arguments
/// * `different` - the field's value differs from its default
/// * `enable_optimizations` - the record's optimization flag
pub const fn should_write(field: Field, different: bool, enable_optimizations: bool) -> bool {
    match write_gate(field) {
        WriteGate::Unconditional => true,
        WriteGate::WhenDifferent => different,
        WriteGate::WhenDifferentOrUnoptimized => different || !enable_optimizations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_sensor_always_written() {
        for different in [false, true] {
            for optimize in [false, true] {
                assert!(should_write(Field::PidFeedbackSensor, different, optimize));
            }
        }
    }

    #[test]
    fn test_pid_coefficient_falls_back_to_always() {
        assert!(!should_write(Field::PidFeedbackCoefficient, false, true));
        assert!(should_write(Field::PidFeedbackCoefficient, false, false));
        assert!(should_write(Field::PidFeedbackCoefficient, true, true));
    }

    #[test]
    fn test_sensor_terms_ignore_optimization_flag() {
        for field in [Field::Sum0Term, Field::Sum1Term, Field::Diff0Term, Field::Diff1Term] {
            assert!(!should_write(field, false, false));
            assert!(!should_write(field, false, true));
            assert!(should_write(field, true, false));
        }
    }

    #[test]
    fn test_limit_switches_difference_gated() {
        assert!(!should_write(Field::ForwardLimitSwitch, false, false));
        assert!(should_write(Field::ReverseLimitSwitch, true, true));
    }

    #[test]
    fn test_only_one_unconditional_field() {
        let unconditional: Vec<Field> = Field::ALL
            .iter()
            .copied()
            .filter(|f| write_gate(*f) == WriteGate::Unconditional)
            .collect();
        assert_eq!(unconditional, vec![Field::PidFeedbackSensor]);
    }
}
