pub mod analysis;
pub mod config;
pub mod model;
pub mod error;

pub use analysis::buffer::PcmBuffer;
pub use analysis::estimator::{TempoDetection, TempoEstimator};
pub use analysis::source::{SignalSource, WavSource};
pub use config::{AnalysisConfig, BandPassConfig, OutputFormat, TempoConfig};
pub use error::AnalysisError;
pub use model::{IntervalCandidate, Peak, TempoEstimate, UndeterminedReason};

use model::{AnalysisResult, Metadata, TempoAnalysis};

/// Estime le tempo du signal fourni par `source`
pub fn detect_tempo<S: SignalSource + ?Sized>(
    source: &S,
    config: &TempoConfig,
) -> Result<TempoEstimate, AnalysisError> {
    let buffer = source.load()?;
    let detection = TempoEstimator::new(config.clone()).estimate(&buffer)?;
    Ok(detection.estimate)
}

pub fn run(config: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;

    // 1. Décodage stéréo, rééchantillonnage et filtrage passe-bande
    let source = WavSource::new(&config.file_path, config.target_sr, config.band);
    let buffer = source.load()?;

    // 2. Pics et histogramme d'intervalles
    let detection = TempoEstimator::new(config.tempo.clone()).estimate(&buffer)?;

    let undetermined_reason = match &detection.estimate {
        TempoEstimate::Undetermined { reason } => Some(*reason),
        TempoEstimate::Detected { .. } => None,
    };

    // 3. Construire la structure de résultat
    Ok(AnalysisResult {
        metadata: Metadata {
            file_path: config.file_path.clone(),
            sample_rate: buffer.sample_rate(),
            channels: 2,
            duration_seconds: buffer.duration_seconds(),
        },
        tempo_analysis: TempoAnalysis {
            global_bpm: detection.estimate.bpm(),
            candidates: detection.estimate.candidates().to_vec(),
            peak_count: detection.peaks.len(),
            undetermined_reason,
        },
    })
}
