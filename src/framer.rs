use serde::{Deserialize, Serialize};

use crate::{wrap, Clocked, EdgeDetector};

/// Serial audio bus levels
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serial {
    /// Bit clock
    pub bclk: bool,
    /// Word select (low: left, high: right)
    pub ws: bool,
    /// Serial data
    pub sd: bool,
}

/// Two channel serial audio framer
///
/// Scales decimated samples into `word` bit two's complement words and
/// shifts them out MSB first on both channels.
///
/// The first sample starts the bit clock. It toggles every `half_bit` ticks.
/// Word select toggles with every `2*word`-th bit clock toggle, always with a
/// falling bit clock edge. Falling edges are seen through an [`EdgeDetector`]
/// two ticks late. On the one where two half periods have passed since the
/// word select change, the held sample is copied into the buffer of the
/// channel selected now. On every other one the active buffer shifts left.
/// Serial data is the MSB of the active buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Framer {
    half_bit: u32,
    word: u32,
    shift: u32,
    // holding register
    sample: i32,
    running: bool,
    // ticks in the current bit clock half period
    count: u32,
    bclk: bool,
    // bit clock half periods in the current word
    half: u32,
    ws: bool,
    left: u32,
    right: u32,
    right_active: bool,
    falling: EdgeDetector,
}

impl Framer {
    /// Create a new idle framer.
    ///
    /// # Args
    /// * `half_bit`: System clock ticks per bit clock half period `K`, `>= 2`
    /// * `word`: Word width in bits, `2..=32`
    /// * `shift`: Right shift from filter output to word
    pub fn new(half_bit: u32, word: u32, shift: u32) -> Self {
        debug_assert!(half_bit >= 2);
        debug_assert!((2..=32).contains(&word));
        Self {
            half_bit,
            word,
            shift,
            sample: 0,
            running: false,
            count: 0,
            bclk: false,
            half: 0,
            ws: false,
            left: 0,
            right: 0,
            right_active: false,
            falling: EdgeDetector::default(),
        }
    }

    fn mask(&self) -> u32 {
        u32::MAX >> (32 - self.word)
    }

    /// Clock the framer once.
    ///
    /// # Args
    /// * `x`: Decimated filter output if valid this tick
    pub fn update(&mut self, x: Option<i64>) {
        let old = *self;
        if let Some(x) = x {
            self.sample = wrap(x >> self.shift, self.word) as _;
            self.running = true;
        }
        if old.running {
            if old.count < self.half_bit - 1 {
                self.count += 1;
            } else {
                self.count = 0;
                self.bclk = !old.bclk;
                if old.half < 2 * self.word - 1 {
                    self.half += 1;
                } else {
                    self.half = 0;
                    self.ws = !old.ws;
                }
            }
            if old.falling.edges().falling {
                let mask = self.mask();
                if old.half == 2 {
                    let word = old.sample as u32 & mask;
                    if old.ws {
                        self.right = word;
                    } else {
                        self.left = word;
                    }
                    self.right_active = old.ws;
                } else if old.right_active {
                    self.right = (old.right << 1) & mask;
                } else {
                    self.left = (old.left << 1) & mask;
                }
            }
        }
        self.falling.update(old.bclk);
    }

    /// Return to the idle state.
    pub fn reset(&mut self) {
        *self = Self::new(self.half_bit, self.word, self.shift);
    }

    /// Current bus levels
    pub fn serial(&self) -> Serial {
        let buf = if self.right_active {
            self.right
        } else {
            self.left
        };
        Serial {
            bclk: self.bclk,
            ws: self.ws,
            sd: (buf >> (self.word - 1)) & 1 != 0,
        }
    }

    /// Held scaled sample
    pub fn sample(&self) -> i32 {
        self.sample
    }
}

impl Clocked<Option<i64>, Serial> for Framer {
    fn tick(&mut self, x: Option<i64>) -> Serial {
        self.update(x);
        self.serial()
    }
}
