use serde::{Deserialize, Serialize};

use crate::{ceil_log2, range, wrap, Clocked, ConfigError};

/// CIC decimator dimensions
///
/// The register width is `input_width + ceil(stages*log2(rate))`, enough
/// for the full filter gain `rate**stages` on any `input_width` bit signed
/// input.
///
/// Deserialization applies the same checks as [`CicConfig::new()`] and
/// [`CicConfig::with_width()`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CicDimensions")]
pub struct CicConfig {
    stages: u32,
    rate: u32,
    input_width: u32,
    width: u32,
}

/// Unvalidated [`CicConfig`] fields
#[derive(Deserialize)]
struct CicDimensions {
    stages: u32,
    rate: u32,
    input_width: u32,
    width: u32,
}

impl TryFrom<CicDimensions> for CicConfig {
    type Error = ConfigError;

    fn try_from(d: CicDimensions) -> Result<Self, Self::Error> {
        Self::new(d.stages, d.rate, d.input_width)?.with_width(d.width)
    }
}

impl CicConfig {
    /// Derive the register width for the given stage count, decimation
    /// ratio, and input width.
    ///
    /// ```
    /// # use pdm2pcm::CicConfig;
    /// let c = CicConfig::new(5, 50, 2).unwrap();
    /// assert_eq!(c.width(), 31);
    /// assert_eq!(c.gain(), 50u64.pow(5));
    /// ```
    pub fn new(stages: u32, rate: u32, input_width: u32) -> Result<Self, ConfigError> {
        if stages == 0 {
            return Err(ConfigError::Stages);
        }
        if rate == 0 {
            return Err(ConfigError::Rate);
        }
        if !(1..64).contains(&input_width) {
            return Err(ConfigError::InputWidth(input_width));
        }
        let growth = (rate as u128)
            .checked_pow(stages)
            .map(ceil_log2)
            .ok_or(ConfigError::Gain)?;
        let width = input_width + growth;
        if width > 64 {
            return Err(ConfigError::Gain);
        }
        Ok(Self {
            stages,
            rate,
            input_width,
            width,
        })
    }

    /// Use a different register width.
    ///
    /// Wider registers are fine. Narrower ones would silently corrupt the
    /// output and are rejected.
    pub fn with_width(self, width: u32) -> Result<Self, ConfigError> {
        if !(self.required_width()..=64).contains(&width) {
            return Err(ConfigError::Width {
                width,
                required: self.required_width(),
            });
        }
        Ok(Self { width, ..self })
    }

    /// Number of integrator/comb stages `M`
    pub fn stages(&self) -> u32 {
        self.stages
    }

    /// Decimation ratio `R`
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Input sample width `W`
    pub fn input_width(&self) -> u32 {
        self.input_width
    }

    /// Register width `nbit`
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Minimum register width
    pub fn required_width(&self) -> u32 {
        self.input_width + ceil_log2(self.gain() as u128)
    }

    /// Filter DC gain `R**M`
    pub fn gain(&self) -> u64 {
        (self.rate as u64).pow(self.stages)
    }
}

/// Cascaded integrator comb decimator with an input sample strobe
///
/// Register level model of an `M` stage CIC decimator clocked by the system
/// clock. Inputs are taken on strobe ticks only. The integrators run at the
/// strobe rate. Every `R`-th strobe arms the decimation gate and on the next
/// tick the comb chain takes the last integrator value and differences it
/// against the previous one. The output is valid on the tick after that.
///
/// All registers are `width` bits wide and wrap. With sufficient width
/// (see [`CicConfig`]) the wrapping cancels in the combs and the output is
/// exact.
///
/// ```
/// # use pdm2pcm::{CicDecimator, Clocked};
/// let mut cic = CicDecimator::<3>::new(4, 2).unwrap();
/// let y: Vec<_> = (0..40).filter_map(|_| cic.tick(Some(1))).collect();
/// assert_eq!(y[4..], [cic.gain() as i64; 5]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CicDecimator<const M: usize> {
    config: CicConfig,
    // input buffer
    buff: i64,
    // integrator values at the last strobe
    di: [i64; M],
    // first comb stage
    comb: i64,
    // comb values at the last decimation
    dc: [i64; M],
    // strobes modulo R
    index: u32,
    // decimation gate
    ena: bool,
    valid: bool,
}

impl<const M: usize> CicDecimator<M> {
    /// Create a new zero-initialized filter with `W = input_width`
    /// and derived register width.
    pub fn new(rate: u32, input_width: u32) -> Result<Self, ConfigError> {
        Self::from_config(CicConfig::new(M as _, rate, input_width)?)
    }

    /// Create a new zero-initialized filter.
    ///
    /// The configuration stage count must match `M`.
    pub fn from_config(config: CicConfig) -> Result<Self, ConfigError> {
        if config.stages as usize != M {
            return Err(ConfigError::Stages);
        }
        Ok(Self::cleared(config))
    }

    const fn cleared(config: CicConfig) -> Self {
        Self {
            config,
            buff: 0,
            di: [0; M],
            comb: 0,
            dc: [0; M],
            index: 0,
            ena: false,
            valid: false,
        }
    }

    /// Filter configuration
    pub fn config(&self) -> &CicConfig {
        &self.config
    }

    /// Return the filter gain
    pub fn gain(&self) -> u64 {
        self.config.gain()
    }

    /// Clear all registers.
    pub fn reset(&mut self) {
        *self = Self::cleared(self.config);
    }

    /// Current integrator chain values `intg[0..M]`.
    pub fn integrators(&self) -> [i64; M] {
        let w = self.config.width;
        let mut intg = [0; M];
        let mut x = self.buff;
        for (y, di) in intg.iter_mut().zip(&self.di) {
            x = wrap(x.wrapping_add(*di), w);
            *y = x;
        }
        intg
    }

    fn comb_chain(&self) -> ([i64; M], i64) {
        let w = self.config.width;
        let mut comb = [0; M];
        let mut x = self.comb;
        for (y, dc) in comb.iter_mut().zip(&self.dc) {
            *y = x;
            x = wrap(x.wrapping_sub(*dc), w);
        }
        (comb, x)
    }

    /// Current comb chain values `comb[0..M]`.
    pub fn combs(&self) -> [i64; M] {
        self.comb_chain().0
    }

    /// Current output of the last comb stage.
    ///
    /// Only meaningful while [`CicDecimator::valid()`].
    pub fn output(&self) -> i64 {
        self.comb_chain().1
    }

    /// Whether the output is a fresh decimated sample.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Clock all registers once.
    ///
    /// # Args
    /// * `x`: Input sample if the input strobe is asserted this tick.
    pub fn update(&mut self, x: Option<i64>) {
        let intg = self.integrators();
        let comb = self.combs();
        self.valid = self.ena;
        if self.ena {
            if let Some(last) = intg.last() {
                self.comb = *last;
            }
            self.dc = comb;
        }
        if let Some(x) = x {
            debug_assert!({
                let (min, max) = range(self.config.input_width);
                (min..=max).contains(&x)
            });
            self.buff = wrap(x, self.config.width);
            self.di = intg;
            if self.index < self.config.rate - 1 {
                self.index += 1;
                self.ena = false;
            } else {
                self.index = 0;
                self.ena = true;
            }
        } else {
            self.ena = false;
        }
    }
}

impl<const M: usize> Clocked<Option<i64>, Option<i64>> for CicDecimator<M> {
    /// Tick with an optional strobed input, emit the decimated output when valid.
    fn tick(&mut self, x: Option<i64>) -> Option<i64> {
        self.update(x);
        self.valid.then(|| self.output())
    }
}
