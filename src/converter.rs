use serde::{Deserialize, Serialize};

use crate::{
    bipolar, CicDecimator, ClockEdge, Clocked, ConfigError, ConverterConfig, Framer, RateGenerator,
    Scaling, Timing,
};

/// Converter inputs for one tick
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Run. Low holds the converter in reset.
    pub enable: bool,
    /// Microphone data
    pub pdm: bool,
}

/// Converter outputs for one tick
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pins {
    /// Microphone clock
    pub mic_clk: bool,
    /// Microphone channel select
    pub mic_sel: bool,
    /// Serial audio bit clock
    pub bclk: bool,
    /// Serial audio word select
    pub ws: bool,
    /// Serial audio data
    pub sd: bool,
    /// Input sample strobe (diagnostic)
    pub fs: bool,
    /// Held scaled sample (diagnostic)
    pub sample: i32,
}

/// PDM microphone to two channel serial audio converter
///
/// Clocks a PDM microphone at `fs_in`, decimates its bit stream with an `M`
/// stage CIC filter by `R` and frames the scaled samples as `dw` bit MSB
/// first words on a bit clock/word select/serial data bus. Each sample is
/// sent on both channels.
///
/// The microphone bit presented on a tick is taken when [`Pins::fs`] was high
/// on the previous tick.
///
/// ```
/// # use pdm2pcm::{Clocked, ConverterConfig, Input, PdmToPcm};
/// # use miniconf::Leaf;
/// let config = ConverterConfig {
///     sys_clk_freq: Leaf(4.0),
///     fs_in: Leaf(1.0),
///     rate: Leaf(16),
///     word: Leaf(8),
///     scale_factor: Leaf(64.0),
///     ..Default::default()
/// };
/// let mut c = PdmToPcm::<3>::new(&config).unwrap();
/// // All high microphone
/// for _ in 0..1000 {
///     c.tick(Input { enable: true, pdm: true });
/// }
/// assert_eq!(c.pins().sample, 16 * 16 * 16 / 64);
/// // Disable resets
/// assert_eq!(c.tick(Input::default()), Default::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdmToPcm<const M: usize> {
    timing: Timing,
    rate: RateGenerator,
    cic: CicDecimator<M>,
    framer: Framer,
}

impl<const M: usize> PdmToPcm<M> {
    /// Validate the configuration and create a converter in reset.
    pub fn new(config: &ConverterConfig) -> Result<Self, ConfigError> {
        let timing = config.timing::<M>()?;
        log::debug!(
            "nbit = {}, N = {}, K = {}, shift = {}",
            timing.cic.width(),
            timing.clock_ratio,
            timing.half_bit,
            timing.shift
        );
        match timing.scaling() {
            Scaling::Nominal => {}
            s => log::warn!(
                "scale factor {}: full scale {} in {} bit words: {:?}",
                *config.scale_factor,
                timing.full_scale(),
                timing.word,
                s
            ),
        }
        Ok(Self {
            timing,
            rate: RateGenerator::new(timing.clock_ratio),
            cic: CicDecimator::from_config(timing.cic)?,
            framer: Framer::new(timing.half_bit, timing.word, timing.shift),
        })
    }

    /// Derived constants
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// The decimation filter
    pub fn cic(&self) -> &CicDecimator<M> {
        &self.cic
    }

    /// Return all state to reset.
    pub fn reset(&mut self) {
        self.rate.reset();
        self.cic.reset();
        self.framer.reset();
    }

    /// Current output levels
    pub fn pins(&self) -> Pins {
        let clock = self.rate.clock();
        let serial = self.framer.serial();
        let (mic_clk, mic_sel) = match self.timing.clock_edge {
            ClockEdge::Falling => (clock.drive, false),
            ClockEdge::Rising => (!clock.drive, true),
        };
        Pins {
            mic_clk,
            mic_sel,
            bclk: serial.bclk,
            ws: serial.ws,
            sd: serial.sd,
            fs: clock.strobe,
            sample: self.framer.sample(),
        }
    }
}

impl<const M: usize> Clocked<Input, Pins> for PdmToPcm<M> {
    fn tick(&mut self, x: Input) -> Pins {
        if x.enable {
            let strobe = self.rate.clock().strobe;
            self.framer.update(self.cic.valid().then(|| self.cic.output()));
            self.cic.update(strobe.then_some(bipolar(x.pdm)));
            self.rate.update();
        } else {
            self.reset();
        }
        self.pins()
    }
}
