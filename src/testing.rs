//! Tools to test the converter at the pin level
#![allow(dead_code)]
use rand::{prelude::*, rngs::StdRng};

use crate::{wrap, Clocked, Input, Pins, PdmModulator};

/// Indices where a signal changes level, starting from low.
pub fn toggles(x: impl Iterator<Item = bool>) -> Vec<usize> {
    let mut prev = false;
    x.enumerate()
        .filter_map(|(i, x)| {
            let t = x != prev;
            prev = x;
            t.then_some(i)
        })
        .collect()
}

/// Seeded random bits
pub fn random_bits(seed: u64, n: usize) -> Vec<bool> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random()).collect()
}

/// Run a converter, presenting a new PDM bit from `density` whenever the
/// microphone clock strobes, like a microphone clocked by the converter.
pub fn drive<C: Clocked<Input, Pins>>(
    c: &mut C,
    n: usize,
    mut density: impl FnMut(usize) -> u32,
) -> Vec<Pins> {
    let mut mic = PdmModulator::default();
    let mut pdm = false;
    let mut fs = false;
    let mut k = 0;
    (0..n)
        .map(|_| {
            if fs {
                pdm = mic.tick(density(k));
                k += 1;
            }
            let p = c.tick(Input { enable: true, pdm });
            fs = p.fs;
            p
        })
        .collect()
}

/// A serialized word and the sample it was latched from
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub ws: bool,
    pub latched: i32,
    pub bits: Vec<bool>,
}

impl Word {
    /// Two's complement value of the MSB first bits
    pub fn value(&self) -> i32 {
        let v = self.bits.iter().fold(0i64, |v, b| (v << 1) | *b as i64);
        wrap(v, self.bits.len() as _) as _
    }
}

/// Receive words from the serial audio pins.
///
/// Bits are taken when the bit clock rises. A word starts with the second
/// falling bit clock edge after a word select change (the change itself
/// being the first). Its reference sample is the holding register value on
/// the tick after that edge, when the framer latches it.
pub fn receive(pins: &[Pins]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut cur: Option<Word> = None;
    let mut falls = None;
    for t in 1..pins.len() {
        let (p, q) = (&pins[t - 1], &pins[t]);
        if p.bclk && !q.bclk {
            if p.ws != q.ws {
                falls = Some(1);
            } else if let Some(f) = falls.as_mut() {
                *f += 1;
            }
            if falls == Some(2) {
                let Some(next) = pins.get(t + 1) else { break };
                words.extend(cur.take());
                cur = Some(Word {
                    ws: q.ws,
                    latched: next.sample,
                    bits: Vec::new(),
                });
            }
        }
        if !p.bclk && q.bclk {
            if let Some(w) = cur.as_mut() {
                w.bits.push(q.sd);
            }
        }
    }
    words
}
