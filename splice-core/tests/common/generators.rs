//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("SPLICE_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random element name. Never collides with the default marker, which
    /// starts with an uppercase letter.
    pub fn name(&mut self) -> String {
        let len = 1 + self.geometric(0.7);
        let mut name = String::with_capacity(len);
        name.push(self.rng.gen_range(b'a'..=b'z') as char);
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789-_";
        for _ in 1..len {
            name.push(chars[self.rng.gen_range(0..chars.len())] as char);
        }
        name
    }

    /// Random attribute value, including characters that need escaping
    pub fn value(&mut self) -> String {
        let len = 1 + self.geometric(0.8);
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789-_.&<";
        let mut val = String::with_capacity(len);
        for _ in 0..len {
            match chars[self.rng.gen_range(0..chars.len())] {
                b'&' => val.push_str("&amp;"),
                b'<' => val.push_str("&lt;"),
                c => val.push(c as char),
            }
        }
        val
    }

    /// Random well-formed XML fragment with no include markers
    pub fn xml_fragment(&mut self) -> String {
        let name = self.name();
        let mut out = format!("<{}", name);

        if self.chance(0.3) {
            out.push_str(&format!(" {}=\"{}\"", self.name(), self.value()));
        }

        if self.chance(0.3) {
            out.push_str("/>");
            return out;
        }
        out.push('>');

        if self.chance(0.4) {
            out.push_str("some text here");
        }
        if self.chance(0.2) {
            out.push_str("<!-- a comment -->");
        }
        if self.chance(0.3) {
            out.push_str(&self.xml_fragment());
        }

        out.push_str(&format!("</{}>", name));
        out
    }

    /// Inject random blank lines / indentation (dropped by whitespace trimming)
    pub fn whitespace(&mut self) -> String {
        let lines = self.geometric(0.3);
        let indent = self.geometric(0.9) * 2;
        let mut out = "\n".repeat(lines);
        out.push_str(&" ".repeat(indent));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.xml_fragment(), g2.xml_fragment());
        }
    }
}
