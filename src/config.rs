use miniconf::{Leaf, Tree};
use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::{CicConfig, ConfigError};

/// Microphone clock edge convention
///
/// Stereo PDM microphone pairs share the data line. The channel select pin
/// picks which microphone drives data after which clock edge.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::AsRefStr,
    strum::FromRepr,
    strum::IntoStaticStr,
)]
pub enum ClockEdge {
    /// Clock output as generated (rising edge with the sample strobe),
    /// channel select low.
    #[default]
    Falling = 0,
    /// Inverted clock output, channel select high.
    Rising = 1,
}

/// Converter settings
///
/// All values are fixed for the lifetime of a converter instance.
/// Each field is a settings tree leaf addressed by its name.
///
/// ```
/// # use pdm2pcm::{ClockEdge, ConverterConfig};
/// use miniconf::TreeAny;
/// let mut c = ConverterConfig::default();
/// *c.mut_by_key::<u32, _>(["rate"]).unwrap() = 32;
/// assert_eq!(*c.rate, 32);
/// assert_eq!(c.ref_by_key::<ClockEdge, _>(["clock_edge"]), Ok(&ClockEdge::Falling));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tree)]
pub struct ConverterConfig {
    /// System clock frequency
    ///
    /// Any unit, as long as it matches `fs_in`.
    pub sys_clk_freq: Leaf<f64>,
    /// Microphone clock and input sample frequency
    pub fs_in: Leaf<f64>,
    /// Decimation ratio `R`
    pub rate: Leaf<u32>,
    /// Output word width `dw` in bits, `2..=32`
    pub word: Leaf<u32>,
    /// Output attenuation
    ///
    /// Filter output is shifted right by `ceil(log2(scale_factor))` bits.
    pub scale_factor: Leaf<f64>,
    /// Microphone clock polarity and channel select
    pub clock_edge: Leaf<ClockEdge>,
}

impl Default for ConverterConfig {
    /// 48 MHz system clock, 2.4 MHz microphone clock, 48 kHz output rate
    fn default() -> Self {
        Self {
            sys_clk_freq: Leaf(48e6),
            fs_in: Leaf(2.4e6),
            rate: Leaf(50),
            word: Leaf(16),
            scale_factor: Leaf(6e3),
            clock_edge: Leaf(ClockEdge::default()),
        }
    }
}

impl ConverterConfig {
    /// Validate and derive the integer timing constants for an `M` stage
    /// converter.
    ///
    /// ```
    /// # use pdm2pcm::ConverterConfig;
    /// let t = ConverterConfig::default().timing::<5>().unwrap();
    /// assert_eq!(t.clock_ratio, 20);
    /// assert_eq!(t.half_bit, 15);
    /// assert_eq!(t.shift, 13);
    /// assert_eq!(t.cic.width(), 31);
    /// ```
    pub fn timing<const M: usize>(&self) -> Result<Timing, ConfigError> {
        let (sys, fs) = (*self.sys_clk_freq, *self.fs_in);
        if !(sys.is_finite() && fs.is_finite() && sys > 0.0 && fs > 0.0) {
            return Err(ConfigError::Frequency);
        }
        let clock_ratio = Float::round(sys / fs) as u64;
        if !(2..=u32::MAX as u64).contains(&clock_ratio) {
            return Err(ConfigError::ClockRatio(clock_ratio));
        }
        let (rate, word) = (*self.rate, *self.word);
        if !(2..=32).contains(&word) {
            return Err(ConfigError::Word(word));
        }
        // The PDM bit enters the filter as +-1.
        let cic = CicConfig::new(M as _, rate, 2)?;
        let half_bit = clock_ratio * rate as u64 / (4 * word as u64);
        if !(2..=u32::MAX as u64).contains(&half_bit) {
            return Err(ConfigError::BitClock(half_bit));
        }
        let sf = *self.scale_factor;
        if !(sf.is_finite() && sf >= 1.0) {
            return Err(ConfigError::ScaleFactor);
        }
        let shift = Float::ceil(Float::log2(sf)) as u32;
        if shift > 63 {
            return Err(ConfigError::ScaleFactor);
        }
        Ok(Timing {
            cic,
            clock_ratio: clock_ratio as _,
            half_bit: half_bit as _,
            word,
            shift,
            clock_edge: *self.clock_edge,
        })
    }
}

/// Output level with a full scale input
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scaling {
    /// Full scale fits the word and uses its most significant bit
    Nominal,
    /// Full scale exceeds the word range and wraps
    Clipping,
    /// Full scale leaves the most significant bit unused
    Attenuated,
}

/// Validated integer converter constants
///
/// Obtained from [`ConverterConfig::timing()`] only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Timing {
    /// Filter dimensions, 2 bit input
    pub cic: CicConfig,
    /// System clock ticks per microphone clock period `N`
    pub clock_ratio: u32,
    /// System clock ticks per bit clock half period `K`
    pub half_bit: u32,
    /// Output word width `dw`
    pub word: u32,
    /// Right shift from filter output to output word
    pub shift: u32,
    /// Microphone clock polarity
    pub clock_edge: ClockEdge,
}

impl Timing {
    /// Output word value for a full scale (all high) PDM input
    pub fn full_scale(&self) -> i64 {
        (self.cic.gain() >> self.shift) as i64
    }

    /// Check the attenuation against the word range.
    ///
    /// Quality check only. Clipping and heavy attenuation are not errors.
    pub fn scaling(&self) -> Scaling {
        let fs = self.full_scale();
        if fs >= 1 << (self.word - 1) {
            Scaling::Clipping
        } else if fs < 1 << (self.word - 2) {
            Scaling::Attenuated
        } else {
            Scaling::Nominal
        }
    }

    /// System clock ticks per output frame (both channels)
    pub fn frame(&self) -> u32 {
        4 * self.word * self.half_bit
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use miniconf::{IntoKeys, TreeAny, TreeDeserialize};
    use serde::de::value::{Error, StrDeserializer, U32Deserializer};

    fn config(sys_clk_freq: f64, rate: u32, word: u32, scale_factor: f64) -> ConverterConfig {
        ConverterConfig {
            sys_clk_freq: Leaf(sys_clk_freq),
            fs_in: Leaf(1.0),
            rate: Leaf(rate),
            word: Leaf(word),
            scale_factor: Leaf(scale_factor),
            ..Default::default()
        }
    }

    #[test]
    fn derived() {
        let t = config(4.0, 16, 8, 64.0).timing::<3>().unwrap();
        assert_eq!((t.clock_ratio, t.half_bit, t.shift), (4, 2, 6));
        assert_eq!(t.cic.width(), 14);
        assert_eq!(t.frame(), 64);
        // N is rounded
        let t = config(5.6, 16, 8, 64.0).timing::<3>().unwrap();
        assert_eq!((t.clock_ratio, t.half_bit), (6, 3));
        // shift rounds the scale factor up to a power of two
        assert_eq!(config(4.0, 16, 8, 1.0).timing::<3>().unwrap().shift, 0);
        assert_eq!(config(4.0, 16, 8, 65.0).timing::<3>().unwrap().shift, 7);
        let t = ConverterConfig {
            scale_factor: Leaf(1e6),
            ..Default::default()
        }
        .timing::<5>()
        .unwrap();
        assert_eq!(t.shift, 20);
    }

    #[test]
    fn scaling() {
        assert_eq!(
            ConverterConfig::default().timing::<5>().unwrap().scaling(),
            Scaling::Clipping
        );
        assert_eq!(
            ConverterConfig::default().timing::<3>().unwrap().scaling(),
            Scaling::Attenuated
        );
        let t = config(4.0, 50, 16, 4.0).timing::<3>().unwrap();
        assert_eq!(t.full_scale(), 31250);
        assert_eq!(t.scaling(), Scaling::Nominal);
    }

    #[test]
    fn rejected() {
        assert_eq!(
            config(f64::NAN, 16, 8, 1.0).timing::<3>(),
            Err(ConfigError::Frequency)
        );
        assert_eq!(
            ConverterConfig {
                fs_in: Leaf(0.0),
                ..Default::default()
            }
            .timing::<3>(),
            Err(ConfigError::Frequency)
        );
        assert_eq!(
            config(1.4, 16, 8, 1.0).timing::<3>(),
            Err(ConfigError::ClockRatio(1))
        );
        assert_eq!(
            config(4.0, 16, 1, 1.0).timing::<3>(),
            Err(ConfigError::Word(1))
        );
        assert_eq!(
            config(4.0, 16, 33, 1.0).timing::<3>(),
            Err(ConfigError::Word(33))
        );
        assert_eq!(
            config(4.0, 8, 8, 1.0).timing::<3>(),
            Err(ConfigError::BitClock(1))
        );
        assert_eq!(
            config(4.0, 0, 8, 1.0).timing::<3>(),
            Err(ConfigError::Rate)
        );
        assert_eq!(
            config(4.0, 16, 8, 1.0).timing::<0>(),
            Err(ConfigError::Stages)
        );
        assert_eq!(
            config(4.0, 16, 8, 0.5).timing::<3>(),
            Err(ConfigError::ScaleFactor)
        );
        assert_eq!(
            config(4.0, 16, 8, f64::INFINITY).timing::<3>(),
            Err(ConfigError::ScaleFactor)
        );
    }

    #[test]
    fn settings_tree() {
        let mut c = ConverterConfig::default();
        c.deserialize_by_key(["rate"].into_keys(), U32Deserializer::<Error>::new(32))
            .unwrap();
        c.deserialize_by_key(
            ["clock_edge"].into_keys(),
            StrDeserializer::<Error>::new("Rising"),
        )
        .unwrap();
        assert_eq!(*c.rate, 32);
        assert_eq!(
            c.ref_by_key::<ClockEdge, _>(["clock_edge"]),
            Ok(&ClockEdge::Rising)
        );
        *c.mut_by_key::<f64, _>(["scale_factor"]).unwrap() = 3e3;
        let t = c.timing::<5>().unwrap();
        assert_eq!((t.half_bit, t.shift), (10, 12));
        assert_eq!(t.clock_edge, ClockEdge::Rising);
        // Unknown names and mistyped values
        assert!(c.ref_by_key::<u32, _>(["fs"]).is_err());
        assert!(c.ref_by_key::<u32, _>(["scale_factor"]).is_err());
        assert!(c
            .deserialize_by_key(["word"].into_keys(), StrDeserializer::<Error>::new("x"))
            .is_err());
        assert_eq!(*c.word, 16);
    }

    #[test]
    fn clock_edge_names() {
        assert_eq!("Rising".parse::<ClockEdge>(), Ok(ClockEdge::Rising));
        assert_eq!(ClockEdge::Falling.as_ref(), "Falling");
        assert_eq!(ClockEdge::from_repr(1), Some(ClockEdge::Rising));
        let s: &'static str = ClockEdge::Rising.into();
        assert_eq!(s, "Rising");
    }
}
