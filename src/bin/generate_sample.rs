use anyhow::{Context, Result};

/// 8 × 8 secondary meshes of 40 × 40 cells each.
const SIZE: usize = 320;

/// A rain cell: centre (row, col), radius in cells, peak intensity.
type Storm = (f64, f64, f64, f64);

fn gaussian_2d(r: f64, c: f64, storm: &Storm) -> f64 {
    let (mu_r, mu_c, sigma, peak) = *storm;
    let d2 = (r - mu_r).powi(2) + (c - mu_c).powi(2);
    peak * (-d2 / (2.0 * sigma.powi(2))).exp()
}

/// SplitMix64: one word of state, enough for a reproducible sample field.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[lo, hi)` from the top 53 bits.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

fn main() -> Result<()> {
    let mut rng = SplitMix64(42);

    let storms: Vec<Storm> = (0..12)
        .map(|_| {
            (
                rng.uniform(0.0, SIZE as f64),
                rng.uniform(0.0, SIZE as f64),
                rng.uniform(6.0, 40.0),
                rng.uniform(200.0, 4000.0),
            )
        })
        .collect();

    let output_path = "combine.csv";
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)
        .context("creating output file")?;

    for r in 0..SIZE {
        let row: Vec<u16> = (0..SIZE)
            .map(|c| {
                let signal: f64 = storms
                    .iter()
                    .map(|s| gaussian_2d(r as f64, c as f64, s))
                    .sum();
                let noise = rng.uniform(0.0, 20.0);
                (signal + noise).min(u16::MAX as f64) as u16
            })
            .collect();
        wtr.serialize(row).with_context(|| format!("writing row {r}"))?;
    }
    wtr.flush().context("flushing output file")?;

    println!("Wrote a {SIZE}x{SIZE} rainfall field to {output_path}");
    Ok(())
}
