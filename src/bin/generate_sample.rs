use serde_json::json;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Residual intensity of a continuum-normalised spectrum with Gaussian
/// absorption lines at the catalog positions.
fn synthesize(wavelengths: &[f64], lines: &[(f64, &str, f64)]) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&w| {
            let absorbed: f64 = lines
                .iter()
                .map(|&(center, _, depth)| gaussian(w, center, 0.05, depth))
                .sum();
            (1.0 - absorbed).max(0.0)
        })
        .collect()
}

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

fn main() {
    let mut rng = SimpleRng::new(42);

    // Two segments: the Mg b triplet region and the [O I] / Ni region.
    let segments = [(5160.0, 5190.0), (6295.0, 6305.0)];
    let vrad = [4.2, 4.5];

    // (wavelength, species, depth)
    let catalog: Vec<(f64, &str, f64)> = vec![
        (5167.321, "Mg 1", 0.85),
        (5171.596, "Fe 1", 0.55),
        (5172.684, "Mg 1", 0.90),
        (5183.604, "Mg 1", 0.92),
        (5184.270, "Ti 1", 0.18),
        (5185.900, "Ti 2", 0.35),
        (6300.336, "Ni 1", 0.12),
        (6301.501, "Fe 1", 0.48),
        (6302.494, "Fe 1", 0.30),
    ];

    // Contiguous axis over each segment, step 0.01 Å.
    let mut wavelengths: Vec<f64> = Vec::new();
    for &(start, end) in &segments {
        let n = ((end - start) / 0.01) as usize;
        wavelengths.extend((0..=n).map(|i| start + i as f64 * 0.01));
    }

    let model = synthesize(&wavelengths, &catalog);
    let observed: Vec<f64> = model.iter().map(|&y| y + rng.gauss(0.0, 0.004)).collect();

    let atomic: Vec<serde_json::Value> = catalog
        .iter()
        .map(|&(wave, species, depth)| json!({ "wave": wave, "species": species, "depth": depth }))
        .collect();

    let n_points = wavelengths.len();
    let dataset = json!({
        "wran": segments,
        "wave": wavelengths,
        "sob": observed,
        "smod": model,
        "vrad": vrad,
        "atomic": atomic,
    });

    let output_path = "sample_spectrum.json";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    serde_json::to_writer(file, &dataset).expect("Failed to write JSON");

    println!(
        "Wrote {n_points} axis points across {} segments to {output_path}",
        segments.len()
    );
}
