use crate::error::AnalysisError;

/// Signal PCM stéréo déjà filtré, immuable une fois construit
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl PcmBuffer {
    /// Valide l'entrée avant toute analyse : canaux de même longueur, fréquence non nulle
    pub fn new(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "la fréquence d'échantillonnage doit être strictement positive".to_string(),
            ));
        }
        if left.len() != right.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "canaux de longueurs différentes ({} vs {})",
                left.len(),
                right.len()
            )));
        }
        Ok(Self { left, right, sample_rate })
    }

    /// Duplique un signal mono sur les deux canaux
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        let right = samples.clone();
        Self::new(samples, right, sample_rate)
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Nombre d'échantillons par canal
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn duration_seconds(&self) -> f32 {
        self.len() as f32 / self.sample_rate as f32
    }
}
