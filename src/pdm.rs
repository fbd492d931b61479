use serde::{Deserialize, Serialize};

use crate::Clocked;

/// Filter input value of a PDM bit: `+1` for high, `-1` for low.
///
/// Equal densities of high and low bits average to zero.
pub const fn bipolar(bit: bool) -> i64 {
    if bit { 1 } else { -1 }
}

/// First order 1-bit delta-sigma modulator
///
/// Produces a PDM bit stream from a density input, like a PDM microphone
/// does from sound pressure. The accumulator carry is the output bit.
/// Given constant input `x`, the average density of high bits is `x/(1 << 32)`.
///
/// ```
/// # use pdm2pcm::{Clocked, PdmModulator};
/// let mut m = PdmModulator::default();
/// let n = 1 << 12;
/// let ones = (0..n).filter(|_| m.tick(0x4000_0000)).count();
/// assert_eq!(ones, n / 4);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdmModulator {
    accu: u32,
}

impl Clocked<u32, bool> for PdmModulator {
    fn tick(&mut self, x: u32) -> bool {
        let carry;
        (self.accu, carry) = self.accu.overflowing_add(x);
        carry
    }
}
