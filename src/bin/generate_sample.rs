//! Write a synthetic `final.csv` with a few dozen companies.
//!
//! Usage: `generate_sample [OUTPUT] [COUNT]` (defaults: `final.csv`, 60).

use anyhow::{Context, Result};

const PREFIXES: [&str; 12] = [
    "North", "Blue", "Silver", "Pacific", "Summit", "Iron", "Nova", "Atlas", "Bright", "Cedar",
    "Delta", "Orion",
];
const SUFFIXES: [&str; 8] = [
    "Systems", "Holdings", "Energy", "Pharma", "Motors", "Networks", "Foods", "Capital",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// `3610` → `"3 610"`: the thousands-separated form found in scraped data.
fn spaced(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "final.csv".to_string());
    let count: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid company count '{n}'"))?,
        None => 60,
    };

    let mut rng = SimpleRng::new(42);

    // Log-normal market caps, largest first like a ranking page.
    let mut caps: Vec<u64> = (0..count)
        .map(|_| rng.gauss(5.5, 1.1).exp().round().max(1.0) as u64)
        .collect();
    caps.sort_unstable_by(|a, b| b.cmp(a));

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Rank", "Name", "Market Cap", "Price"])?;

    for (i, cap) in caps.iter().enumerate() {
        let name = format!(
            "{} {}",
            PREFIXES[i % PREFIXES.len()],
            SUFFIXES[(i / PREFIXES.len()) % SUFFIXES.len()]
        );
        let price = (rng.gauss(4.5, 1.0).exp() * 100.0).round() / 100.0;
        writer.write_record([
            (i + 1).to_string(),
            name,
            spaced(*cap),
            format!("{price:.2}"),
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {count} companies to {output_path}");
    Ok(())
}
