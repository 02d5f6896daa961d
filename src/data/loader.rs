use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::model::{CatalogLine, RadialVelocity, SpectrumDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a spectrum dataset from a file. Dispatch by extension.
///
/// The proprietary IDL save files are converted to JSON by an external
/// export step; this loader only consumes that JSON.
pub fn load_file(path: &Path) -> Result<SpectrumDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (field names follow the original save-file record):
///
/// ```json
/// {
///   "wran": [[5164.0, 5190.0], [6295.0, 6305.0]],
///   "wave": [5164.0, 5164.02, ...],
///   "sob":  [0.97, 0.95, ...],
///   "smod": [0.98, 0.96, ...],
///   "vrad": 12.3,
///   "atomic": [
///     { "wave": 5171.596, "species": "Fe 1", "depth": 0.55 },
///     ...
///   ]
/// }
/// ```
///
/// `vrad` is either a scalar or an array with one entry per segment.
#[derive(Deserialize)]
struct RawDataset {
    wran: Vec<(f64, f64)>,
    wave: Vec<f64>,
    sob: Vec<f64>,
    smod: Vec<f64>,
    vrad: RawVelocity,
    atomic: Vec<RawLine>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVelocity {
    Scalar(f64),
    PerSegment(Vec<f64>),
}

#[derive(Deserialize)]
struct RawLine {
    wave: f64,
    species: String,
    depth: f64,
}

fn load_json(path: &Path) -> Result<SpectrumDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let raw: RawDataset = serde_json::from_str(&text).context("parsing spectrum JSON")?;
    dataset_from_raw(raw)
}

fn dataset_from_raw(raw: RawDataset) -> Result<SpectrumDataset> {
    if raw.sob.len() != raw.wave.len() || raw.smod.len() != raw.wave.len() {
        bail!(
            "flux arrays disagree with the wavelength axis: wave {}, sob {}, smod {}",
            raw.wave.len(),
            raw.sob.len(),
            raw.smod.len()
        );
    }

    let radial_velocity = match raw.vrad {
        RawVelocity::Scalar(v) => RadialVelocity::Scalar(v),
        RawVelocity::PerSegment(values) => {
            if values.len() != raw.wran.len() {
                bail!(
                    "{} radial velocities for {} segments",
                    values.len(),
                    raw.wran.len()
                );
            }
            RadialVelocity::PerSegment(values)
        }
    };

    let line_catalog = raw
        .atomic
        .into_iter()
        .map(|l| CatalogLine {
            center_wavelength: l.wave,
            species: l.species,
            depth: l.depth,
        })
        .collect();

    Ok(SpectrumDataset {
        wavelength_ranges: raw.wran,
        wavelength_axis: raw.wave,
        observed_flux: raw.sob,
        model_flux: raw.smod,
        radial_velocity,
        line_catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> Result<SpectrumDataset> {
        dataset_from_raw(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn scalar_and_per_segment_velocities_both_parse() {
        let ds = raw(
            r#"{
                "wran": [[5000.0, 5002.0]],
                "wave": [5000.0, 5001.0, 5002.0],
                "sob": [1.0, 0.9, 1.0],
                "smod": [1.0, 0.92, 1.0],
                "vrad": 3.5,
                "atomic": [{ "wave": 5001.0, "species": "Fe 1", "depth": 0.4 }]
            }"#,
        )
        .unwrap();
        assert_eq!(ds.radial_velocity, RadialVelocity::Scalar(3.5));
        assert_eq!(ds.line_catalog[0].species, "Fe 1");

        let ds = raw(
            r#"{
                "wran": [[5000.0, 5002.0]],
                "wave": [5000.0],
                "sob": [1.0],
                "smod": [1.0],
                "vrad": [3.5],
                "atomic": []
            }"#,
        )
        .unwrap();
        assert_eq!(ds.radial_velocity, RadialVelocity::PerSegment(vec![3.5]));
    }

    #[test]
    fn velocity_segment_mismatch_is_rejected() {
        let err = raw(
            r#"{
                "wran": [[5000.0, 5002.0], [5002.0, 5004.0]],
                "wave": [5000.0],
                "sob": [1.0],
                "smod": [1.0],
                "vrad": [3.5],
                "atomic": []
            }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("radial velocities"));
    }

    #[test]
    fn flux_length_mismatch_is_rejected() {
        assert!(raw(
            r#"{
                "wran": [[5000.0, 5002.0]],
                "wave": [5000.0, 5001.0],
                "sob": [1.0],
                "smod": [1.0, 1.0],
                "vrad": 0.0,
                "atomic": []
            }"#,
        )
        .is_err());
    }
}
