use anyhow::{bail, Context};
use chrono::NaiveDate;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smpcore::profile::{Coordinates, Profile, Samples, SmpDevice, GROUND, SURFACE};

/// Configuration for generating a synthetic SMP recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub name: String,
    pub samples: usize,
    /// mm between samples.
    pub spatial_resolution: f64,
    /// Depth (mm) where the tip enters the snow.
    pub surface: f64,
    /// Depth (mm) where the tip hits the ground and overloads.
    pub ground: f64,
    pub overload: f64,
    /// Sensor drift in N/mm.
    pub drift: f64,
    /// Force at depth zero in N.
    pub offset: f64,
    /// Uniform jitter amplitude in N.
    pub noise: f64,
    pub seed: u64,
    pub coordinates: Option<Coordinates>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            name: "SYNTH0001".into(),
            samples: 10_000,
            spatial_resolution: 0.05,
            surface: 100.0,
            ground: 450.0,
            overload: 40.0,
            drift: 2e-5,
            offset: 0.005,
            noise: 0.002,
            seed: 0,
            coordinates: Some(Coordinates::new(46.8125, 9.8487)),
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.samples < 2 {
            bail!("generator needs at least 2 samples, got {}", self.samples);
        }
        if self.spatial_resolution.is_nan() || self.spatial_resolution <= 0.0 {
            bail!("spatial resolution must be positive");
        }
        if self.surface <= 0.0 || self.surface >= self.ground {
            bail!(
                "surface {} mm must lie between 0 and ground {} mm",
                self.surface,
                self.ground
            );
        }
        Ok(())
    }
}

fn build_samples(config: &GeneratorConfig) -> anyhow::Result<Samples> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut distance = Vec::with_capacity(config.samples);
    let mut force = Vec::with_capacity(config.samples);

    for idx in 0..config.samples {
        let depth = idx as f64 * config.spatial_resolution;
        let jitter = if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        };
        let baseline = config.offset + config.drift * depth + jitter;

        let value = if depth < config.surface {
            baseline
        } else if depth < config.ground {
            // Snow: hardening with depth plus rupture spikes.
            let snow_depth = depth - config.surface;
            let rupture = rng.gen_range(0.0..0.3);
            baseline + 0.2 + 0.01 * snow_depth + rupture
        } else {
            config.overload * 1.05
        };

        distance.push(depth);
        force.push(value);
    }

    Samples::new(distance, force).context("assembling synthetic samples")
}

pub fn generate_profile(config: &GeneratorConfig) -> anyhow::Result<Profile> {
    config.validate()?;
    let samples = build_samples(config)?;
    let recording_length = samples.distance.last().copied().unwrap_or_default();

    let mut profile = Profile {
        name: config.name.clone(),
        pnt_file: format!("{}.pnt", config.name).into(),
        timestamp: NaiveDate::from_ymd_opt(2017, 1, 20).and_then(|d| d.and_hms_opt(10, 25, 32)),
        recording_length,
        spatial_resolution: config.spatial_resolution,
        overload: config.overload,
        speed: 20.0,
        coordinates: config.coordinates,
        device: SmpDevice {
            serial: "0000".into(),
            firmware: "synthetic".into(),
            length: recording_length.ceil() as u32,
            tip_diameter: 5000.0,
            sensor_sensitivity: 9.12,
            sensor_serial: "SIM-SENSOR".into(),
            amplifier_serial: "SIM-AMP".into(),
        },
        samples,
        ..Default::default()
    };
    profile.set_marker(SURFACE, config.surface);
    if config.ground <= recording_length {
        profile.set_marker(GROUND, config.ground);
    }
    Ok(profile)
}
