use serde::{Deserialize, Serialize};

use crate::Clocked;

/// Microphone clock and sample strobe state
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicClock {
    /// One tick input sample strobe, once per period
    pub strobe: bool,
    /// Clock drive level, rising with the strobe, falling at mid period
    pub drive: bool,
}

/// Sample rate generator
///
/// Divides the system clock by `N` into a one tick sample strobe and a
/// microphone clock drive. The drive rises together with the strobe and
/// falls after `N/2` ticks.
///
/// Ticking with `enable` low holds everything at zero.
///
/// ```
/// # use pdm2pcm::{Clocked, RateGenerator};
/// let mut g = RateGenerator::new(4);
/// let drive: Vec<_> = (0..8).map(|_| g.tick(true).drive).collect();
/// assert_eq!(drive, [false, false, false, true, true, false, false, true]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RateGenerator {
    period: u32,
    count: u32,
    clock: MicClock,
}

impl RateGenerator {
    /// Create a new divider by `period` (`>= 2`).
    pub fn new(period: u32) -> Self {
        debug_assert!(period >= 2);
        Self {
            period,
            count: 0,
            clock: MicClock::default(),
        }
    }

    /// Clock the enabled divider.
    pub fn update(&mut self) {
        if self.count < self.period - 1 {
            if self.count == self.period / 2 - 1 {
                self.clock.drive = false;
            }
            self.count += 1;
            self.clock.strobe = false;
        } else {
            self.count = 0;
            self.clock = MicClock {
                strobe: true,
                drive: true,
            };
        }
    }

    /// Clear counter, strobe, and drive.
    pub fn reset(&mut self) {
        *self = Self::new(self.period);
    }

    /// Current strobe and drive
    pub fn clock(&self) -> MicClock {
        self.clock
    }
}

impl Clocked<bool, MicClock> for RateGenerator {
    fn tick(&mut self, enable: bool) -> MicClock {
        if enable {
            self.update();
        } else {
            self.reset();
        }
        self.clock
    }
}
