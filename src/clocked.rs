//! Synchronous, single clock domain processing.

/// A block of synchronous logic advanced once per system clock tick.
///
/// Each tick first updates all registers from their previous values and the
/// inputs of this tick, then evaluates the combinational outputs from the
/// updated registers. Identical input sequences from the reset state always
/// produce identical output sequences.
///
/// Blocks nest by ownership: a composite advances its parts from its own
/// `tick()`.
pub trait Clocked<X: Copy, Y = X> {
    /// Advance by one tick with the given inputs and obtain the outputs.
    fn tick(&mut self, x: X) -> Y;

    /// Advance by one tick per input, writing one output per tick.
    ///
    /// Input and output must be of the same size.
    fn run(&mut self, x: &[X], y: &mut [Y]) {
        debug_assert_eq!(x.len(), y.len());
        for (x, y) in x.iter().zip(y) {
            *y = self.tick(*x);
        }
    }
}

impl<X: Copy, Y, T: Clocked<X, Y>> Clocked<X, Y> for &mut T {
    fn tick(&mut self, x: X) -> Y {
        (*self).tick(x)
    }

    fn run(&mut self, x: &[X], y: &mut [Y]) {
        (*self).run(x, y)
    }
}
