use log::{debug, info};

use crate::analysis::buffer::PcmBuffer;
use crate::analysis::intervals::estimate_bpm;
use crate::analysis::peaks::extract_peaks;
use crate::config::TempoConfig;
use crate::error::AnalysisError;
use crate::model::{Peak, TempoEstimate, UndeterminedReason};

/// Résultat complet d'une passe : pics retenus et tempo
#[derive(Debug, Clone, PartialEq)]
pub struct TempoDetection {
    pub peaks: Vec<Peak>,
    pub estimate: TempoEstimate,
}

/// Estimateur de BPM par intervalles entre pics, sans état entre deux appels
#[derive(Debug, Clone, Default)]
pub struct TempoEstimator {
    pub config: TempoConfig,
}

impl TempoEstimator {
    pub fn new(config: TempoConfig) -> Self {
        Self { config }
    }

    /// Pics -> histogramme d'intervalles -> candidat le plus voté
    pub fn estimate(&self, buffer: &PcmBuffer) -> Result<TempoDetection, AnalysisError> {
        self.config.validate()?;

        let sample_rate = buffer.sample_rate();
        let window_size = self.config.window_size(sample_rate);
        if window_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "fenêtre de {} s vide à {} Hz",
                self.config.window_duration_seconds, sample_rate
            )));
        }

        if buffer.len() < window_size {
            debug!("{} échantillons pour une fenêtre de {}", buffer.len(), window_size);
            return Ok(TempoDetection {
                peaks: Vec::new(),
                estimate: TempoEstimate::Undetermined {
                    reason: UndeterminedReason::BufferShorterThanWindow,
                },
            });
        }

        let peaks = extract_peaks(buffer, window_size);
        debug!("{} pics retenus : {:?}", peaks.len(), peaks);

        if peaks.len() < 2 {
            return Ok(TempoDetection {
                estimate: TempoEstimate::Undetermined {
                    reason: UndeterminedReason::TooFewPeaks { found: peaks.len() },
                },
                peaks,
            });
        }

        let candidates = estimate_bpm(&peaks, sample_rate, &self.config);
        let estimate = match candidates.first() {
            Some(best) => {
                info!("BPM détecté : {} ({} votes)", best.bpm, best.count);
                TempoEstimate::Detected {
                    bpm: best.bpm,
                    candidates,
                }
            }
            None => TempoEstimate::Undetermined {
                reason: UndeterminedReason::NoIntervals,
            },
        };

        Ok(TempoDetection { peaks, estimate })
    }
}
