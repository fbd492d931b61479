use serde::{Deserialize, Serialize};

use crate::Clocked;

/// Edge pulses reported by [`EdgeDetector`]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edges {
    /// Low to high transition
    pub rising: bool,
    /// High to low transition
    pub falling: bool,
}

/// Registered edge detector
///
/// Keeps the last two input samples. A `01` history (older sample low,
/// newer high) is a rising edge, `10` a falling edge. Each pulse is one tick
/// wide and both never fire together.
///
/// Detection is registered, not combinational: `tick(x[t])` first shifts
/// `x[t]` into the history and then reports `rising = !x[t-1] & x[t]` and
/// `falling = x[t-1] & !x[t]`. Reading [`EdgeDetector::edges()`] before the
/// next update sees the same pulse one tick after the transition.
///
/// ```
/// # use pdm2pcm::{Clocked, EdgeDetector};
/// let mut e = EdgeDetector::default();
/// let r: Vec<_> = [false, true, true, false]
///     .into_iter()
///     .map(|x| e.tick(x).rising)
///     .collect();
/// assert_eq!(r, [false, true, false, false]);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDetector {
    history: u8,
}

impl EdgeDetector {
    /// Shift in a new sample.
    pub fn update(&mut self, x: bool) {
        self.history = ((self.history << 1) | x as u8) & 0b11;
    }

    /// Clear the history.
    ///
    /// No edge is reported until two samples have been taken again.
    pub fn reset(&mut self) {
        self.history = 0;
    }

    /// Current edges from the registered history
    pub fn edges(&self) -> Edges {
        Edges {
            rising: self.history == 0b01,
            falling: self.history == 0b10,
        }
    }
}

impl Clocked<bool, Edges> for EdgeDetector {
    fn tick(&mut self, x: bool) -> Edges {
        self.update(x);
        self.edges()
    }
}
