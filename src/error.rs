/// Configuration errors
///
/// Every constraint is checked once when an instance is built. A running
/// instance never fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The filter needs at least one integrator/comb stage.
    #[error("CIC stage count must be at least one")]
    Stages,
    /// The decimation ratio must be at least one.
    #[error("decimation rate must be at least one")]
    Rate,
    /// Input samples must fit the registers.
    #[error("input width {0} is outside 1..=63")]
    InputWidth(u32),
    /// The registers can not hold the full filter gain.
    #[error("register width {width} is outside {required}..=64")]
    Width {
        /// Requested register width
        width: u32,
        /// Minimum width for the filter gain
        required: u32,
    },
    /// The filter gain `R^M` exceeds any supported register width.
    #[error("filter gain exceeds 64 bit registers")]
    Gain,
    /// Clock frequencies must be positive and finite.
    #[error("clock frequencies must be positive and finite")]
    Frequency,
    /// System clock ticks per microphone clock period out of range
    #[error("system to microphone clock ratio {0} is outside 2..=2^32-1")]
    ClockRatio(u64),
    /// Output word width
    #[error("word width {0} is outside 2..=32")]
    Word(u32),
    /// The bit clock half period is shorter than the edge detection latency
    /// or does not fit a counter.
    #[error("bit clock half period of {0} ticks is outside 2..=2^32-1")]
    BitClock(u64),
    /// The scale factor must be at least one.
    #[error("scale factor must be finite and at least one")]
    ScaleFactor,
}
