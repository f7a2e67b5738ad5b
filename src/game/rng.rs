/// Mulberry32 step: returns a value in `[0, 1)` and the seed for the next draw.
pub fn next_random(seed: u32) -> (f64, u32) {
  let next_seed = seed.wrapping_add(0x6D2B_79F5);
  let mut t = next_seed;
  t = (t ^ (t >> 15)).wrapping_mul(t | 1);
  t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
  let value = (t ^ (t >> 14)) as f64 / 4_294_967_296.0;
  (value, next_seed)
}

/// Threads a seed through successive draws inside one tick.
#[derive(Debug, Clone, Copy)]
pub struct SeededRng {
  seed: u32,
}

impl SeededRng {
  pub fn new(seed: u32) -> Self {
    Self { seed }
  }

  pub fn seed(&self) -> u32 {
    self.seed
  }

  pub fn next_f64(&mut self) -> f64 {
    let (value, next_seed) = next_random(self.seed);
    self.seed = next_seed;
    value
  }

  pub fn next_index(&mut self, len: usize) -> usize {
    if len == 0 {
      return 0;
    }
    ((self.next_f64() * len as f64) as usize).min(len - 1)
  }

  pub fn chance(&mut self, probability: f64) -> bool {
    self.next_f64() < probability
  }
}
