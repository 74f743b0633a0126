use serde::{Serialize, Deserialize};
use std::fmt;
use std::path::PathBuf;

/// Échantillon le plus fort d'une fenêtre
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Indice absolu de l'échantillon dans le buffer
    pub position: usize,
    pub volume: f32,
}

/// Tempo candidat et nombre de paires de pics ayant voté pour lui
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalCandidate {
    pub bpm: u32,
    pub count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UndeterminedReason {
    /// Le buffer ne contient pas une seule fenêtre complète
    BufferShorterThanWindow,
    /// Moins de deux pics après le filtre de la moitié la plus forte
    TooFewPeaks { found: usize },
    /// Aucun intervalle exploitable entre les pics
    NoIntervals,
}

impl fmt::Display for UndeterminedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndeterminedReason::BufferShorterThanWindow => {
                write!(f, "buffer plus court qu'une fenêtre")
            }
            UndeterminedReason::TooFewPeaks { found } => {
                write!(f, "pas assez de pics ({found})")
            }
            UndeterminedReason::NoIntervals => write!(f, "aucun intervalle exploitable"),
        }
    }
}

/// Issue de l'estimation : un tempo, ou « indéterminé » faute de données
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TempoEstimate {
    Detected {
        bpm: u32,
        /// Liste complète classée, `candidates[0].bpm == bpm`
        candidates: Vec<IntervalCandidate>,
    },
    Undetermined {
        reason: UndeterminedReason,
    },
}

impl TempoEstimate {
    pub fn bpm(&self) -> Option<u32> {
        match self {
            TempoEstimate::Detected { bpm, .. } => Some(*bpm),
            TempoEstimate::Undetermined { .. } => None,
        }
    }

    pub fn candidates(&self) -> &[IntervalCandidate] {
        match self {
            TempoEstimate::Detected { candidates, .. } => candidates,
            TempoEstimate::Undetermined { .. } => &[],
        }
    }

    /// Candidats hors du premier
    pub fn alternatives(&self) -> &[IntervalCandidate] {
        self.candidates().get(1..).unwrap_or(&[])
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, TempoEstimate::Undetermined { .. })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AnalysisResult {
    pub metadata: Metadata,
    pub tempo_analysis: TempoAnalysis,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Metadata {
    pub file_path: PathBuf,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_seconds: f32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TempoAnalysis {
    pub global_bpm: Option<u32>,
    pub candidates: Vec<IntervalCandidate>,
    pub peak_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undetermined_reason: Option<UndeterminedReason>,
}
