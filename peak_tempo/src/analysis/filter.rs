use std::f64::consts::PI;

use crate::config::BandPassConfig;

/// Cellule biquad du second ordre (forme directe II transposée)
#[derive(Debug, Clone)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl Biquad {
    fn from_coefficients(b: [f64; 3], a: [f64; 3]) -> Self {
        let inv_a0 = 1.0 / a[0];
        Self {
            b0: b[0] * inv_a0,
            b1: b[1] * inv_a0,
            b2: b[2] * inv_a0,
            a1: a[1] * inv_a0,
            a2: a[2] * inv_a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Retourne (cos(w0), alpha) avec un Q exprimé en dB
    fn prepare(cutoff_hz: f64, q_db: f64, sample_rate: f64) -> (f64, f64) {
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        let alpha = w0.sin() / (2.0 * 10f64.powf(q_db / 20.0));
        (w0.cos(), alpha)
    }

    fn lowpass(cutoff_hz: f64, q_db: f64, sample_rate: f64) -> Self {
        let (cos_w0, alpha) = Self::prepare(cutoff_hz, q_db, sample_rate);
        let b1 = 1.0 - cos_w0;
        Self::from_coefficients(
            [b1 / 2.0, b1, b1 / 2.0],
            [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
        )
    }

    fn highpass(cutoff_hz: f64, q_db: f64, sample_rate: f64) -> Self {
        let (cos_w0, alpha) = Self::prepare(cutoff_hz, q_db, sample_rate);
        let b0 = (1.0 + cos_w0) / 2.0;
        Self::from_coefficients(
            [b0, -(1.0 + cos_w0), b0],
            [1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha],
        )
    }

    #[inline]
    fn process(&mut self, sample: f32) -> f32 {
        let x = sample as f64;
        let y = x * self.b0 + self.z1;
        self.z1 = x * self.b1 + self.z2 - self.a1 * y;
        self.z2 = x * self.b2 - self.a2 * y;
        y as f32
    }
}

/// Passe-bas à `high_cut_hz` suivi d'un passe-haut à `low_cut_hz`
#[derive(Debug, Clone)]
pub struct BandPass {
    lowpass: Biquad,
    highpass: Biquad,
}

impl BandPass {
    pub fn new(config: &BandPassConfig, sample_rate: u32) -> Self {
        let sr = sample_rate as f64;
        Self {
            lowpass: Biquad::lowpass(config.high_cut_hz, config.q, sr),
            highpass: Biquad::highpass(config.low_cut_hz, config.q, sr),
        }
    }

    pub fn process(&mut self, sample: f32) -> f32 {
        let stage1 = self.lowpass.process(sample);
        self.highpass.process(stage1)
    }

    /// Filtre un canal complet à partir d'un état nul
    pub fn apply(config: &BandPassConfig, sample_rate: u32, samples: &[f32]) -> Vec<f32> {
        let mut filter = Self::new(config, sample_rate);
        samples.iter().map(|&s| filter.process(s)).collect()
    }
}
