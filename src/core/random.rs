//! Bit-exact Mersenne Twister used by the target game's world generator
//!
//! Seeding is lazy: construction only initializes the first 398 state words,
//! and each draw from the first 227 positions fills one more word. Most
//! callers take a handful of draws per instance, so the full 624-word
//! initialization is usually never paid for. Output is identical to the
//! standard MT19937 stream for the same seed.

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
const MAG01: [u32; 2] = [0, MATRIX_A];
const INIT_MULTIPLIER: u32 = 1_812_433_253;
const DEFAULT_SEED: u32 = 5489;
const TWO_POW_M32: f64 = 1.0 / (1u64 << 32) as f64;

/// Stateful 32-bit generator. Never shared between threads; build one per use.
#[derive(Clone)]
pub struct MersenneTwister {
    seed: u32,
    mt: [u32; N],
    mti: usize,
    mti_fast: usize,
}

impl MersenneTwister {
    pub fn new(seed: u32) -> Self {
        let mut rng = MersenneTwister {
            seed,
            mt: [0; N],
            mti: N + 1,
            mti_fast: 0,
        };
        rng.set_seed(seed);
        rng
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Re-seed in place, with the same partial initialization as `new`
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.mti = N + 1;
        self.init_unified(seed, M);
    }

    fn init_unified(&mut self, initial: u32, limit: usize) {
        self.mt[0] = initial;
        for i in 1..=limit {
            self.mt[i] = init_word(self.mt[i - 1], i);
        }
        self.mti = N;
        self.mti_fast = (limit + 1).min(N);
    }

    /// One tempered 32-bit output word
    pub fn next_u32(&mut self) -> u32 {
        if self.mti == N {
            self.mti = 0;
        } else if self.mti > N {
            self.init_unified(DEFAULT_SEED, N - 1);
            self.mti = 0;
        }

        let i = self.mti;
        let current = self.mt[i];
        let next = self.mt[(i + 1) % N];
        let mixed = twist(current, next);

        if i >= N - M {
            // Upper region reads words regenerated earlier in this cycle;
            // index N-1 wraps onto the fresh word 0.
            self.mt[i] = mixed ^ self.mt[i - (N - M)];
        } else {
            self.mt[i] = mixed ^ self.mt[i + M];
            if self.mti_fast < N {
                let f = self.mti_fast;
                self.mt[f] = init_word(self.mt[f - 1], f);
                self.mti_fast += 1;
            }
        }

        self.mti += 1;
        temper(self.mt[i])
    }

    /// Top 31 bits of the next word
    pub fn next_int(&mut self) -> i32 {
        (self.next_u32() >> 1) as i32
    }

    /// Unsigned modulo reduction; biased on purpose, and 0 when `bound <= 0`
    pub fn next_int_bounded(&mut self, bound: i32) -> i32 {
        if bound > 0 {
            (self.next_u32() as u64 % bound as u64) as i32
        } else {
            0
        }
    }

    /// Inclusive range; returns `min` when `min >= max`
    pub fn next_int_range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = max.wrapping_sub(min).wrapping_add(1);
        min.wrapping_add(self.next_int_bounded(span))
    }

    pub fn next_bool(&mut self) -> bool {
        self.next_u32() & 0x0800_0000 != 0
    }

    pub fn next_double(&mut self) -> f64 {
        self.next_u32() as f64 * TWO_POW_M32
    }

    pub fn next_float(&mut self) -> f32 {
        self.next_double() as f32
    }

    pub fn next_float_bounded(&mut self, bound: f32) -> f32 {
        self.next_float() * bound
    }

    pub fn next_float_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_float() * (max - min)
    }
}

/// One-shot derivation of `count` tempered words from `seed`.
///
/// Seeds a throwaway state of `count + 397` words and twists only the first
/// `count`. Shares nothing with any `MersenneTwister` instance; the output
/// equals the first `count` draws of `MersenneTwister::new(seed)` while
/// `count <= 227`.
pub fn gen_nums(seed: u32, count: usize) -> Vec<u32> {
    let mut state = vec![0u32; count + M];
    state[0] = seed;
    for i in 1..state.len() {
        state[i] = init_word(state[i - 1], i);
    }

    (0..count)
        .map(|i| temper(state[i + M] ^ twist(state[i], state[i + 1])))
        .collect()
}

#[inline]
fn init_word(prev: u32, index: usize) -> u32 {
    INIT_MULTIPLIER
        .wrapping_mul(prev ^ (prev >> 30))
        .wrapping_add(index as u32)
}

#[inline]
fn twist(current: u32, next: u32) -> u32 {
    let y = (current & UPPER_MASK) | (next & LOWER_MASK);
    (y >> 1) ^ MAG01[(y & 1) as usize]
}

#[inline]
fn temper(mut y: u32) -> u32 {
    y ^= y >> 11;
    y ^= (y << 7) & 0x9d2c_5680;
    y ^= (y << 15) & 0xefc6_0000;
    y ^ (y >> 18)
}
