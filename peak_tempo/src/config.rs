use clap::ValueEnum;
use std::path::PathBuf;

use crate::error::AnalysisError;

/// Fréquence de rendu par défaut (Hz)
pub const DEFAULT_TARGET_SR: u32 = 44100;

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub file_path: PathBuf,
    pub target_sr: u32,
    /// `None` : le fichier est supposé déjà filtré
    pub band: Option<BandPassConfig>,
    pub tempo: TempoConfig,
}

impl AnalysisConfig {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            target_sr: DEFAULT_TARGET_SR,
            band: Some(BandPassConfig::default()),
            tempo: TempoConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.target_sr == 0 {
            return Err(AnalysisError::InvalidConfig(
                "target_sr doit être strictement positif".to_string(),
            ));
        }
        if let Some(band) = &self.band {
            band.validate(self.target_sr)?;
        }
        self.tempo.validate()
    }
}

/// Paramètres de l'estimation par intervalles entre pics
#[derive(Clone, Debug, PartialEq)]
pub struct TempoConfig {
    /// Durée d'une fenêtre de recherche de pic, en secondes
    pub window_duration_seconds: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    /// Borne exclusive sur l'écart d'indice entre deux pics appariés
    pub max_pair_lookahead: usize,
    /// Nombre de candidats conservés avant dédoublonnage
    pub top_candidate_count: usize,
    /// Deux candidats dont les BPM diffèrent d'au plus cette valeur sont fusionnés
    pub dedup_bpm_tolerance: u32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            window_duration_seconds: 0.5,
            min_bpm: 80.0,
            max_bpm: 180.0,
            max_pair_lookahead: 10,
            top_candidate_count: 10,
            dedup_bpm_tolerance: 1,
        }
    }
}

impl TempoConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.window_duration_seconds.is_finite() || self.window_duration_seconds <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "window_duration_seconds doit être strictement positif".to_string(),
            ));
        }
        if !self.min_bpm.is_finite() || self.min_bpm <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "min_bpm doit être strictement positif".to_string(),
            ));
        }
        // Une octave complète doit tenir dans la plage, sinon le repliement peut en sortir
        if !self.max_bpm.is_finite() || self.max_bpm < 2.0 * self.min_bpm {
            return Err(AnalysisError::InvalidConfig(format!(
                "max_bpm ({}) doit valoir au moins 2 × min_bpm ({})",
                self.max_bpm, self.min_bpm
            )));
        }
        if self.min_bpm.ceil() > self.max_bpm.floor() {
            return Err(AnalysisError::InvalidConfig(format!(
                "aucun BPM entier entre {} et {}",
                self.min_bpm, self.max_bpm
            )));
        }
        if self.max_pair_lookahead < 2 {
            return Err(AnalysisError::InvalidConfig(
                "max_pair_lookahead doit valoir au moins 2".to_string(),
            ));
        }
        if self.top_candidate_count == 0 {
            return Err(AnalysisError::InvalidConfig(
                "top_candidate_count doit être strictement positif".to_string(),
            ));
        }
        Ok(())
    }

    /// Taille d'une fenêtre en échantillons pour une fréquence donnée
    pub fn window_size(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.window_duration_seconds) as usize
    }
}

/// Filtre passe-bande appliqué avant l'analyse (zone de la grosse caisse)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandPassConfig {
    pub low_cut_hz: f64,
    pub high_cut_hz: f64,
    /// Facteur de qualité, en dB
    pub q: f64,
}

impl Default for BandPassConfig {
    fn default() -> Self {
        Self {
            low_cut_hz: 80.0,
            high_cut_hz: 150.0,
            q: 3.0,
        }
    }
}

impl BandPassConfig {
    pub fn validate(&self, sample_rate: u32) -> Result<(), AnalysisError> {
        let nyquist = sample_rate as f64 / 2.0;
        if !(self.low_cut_hz > 0.0 && self.low_cut_hz < self.high_cut_hz && self.high_cut_hz < nyquist) {
            return Err(AnalysisError::InvalidConfig(format!(
                "bande invalide : il faut 0 < {} < {} < {} Hz",
                self.low_cut_hz, self.high_cut_hz, nyquist
            )));
        }
        if !self.q.is_finite() {
            return Err(AnalysisError::InvalidConfig("q doit être fini".to_string()));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TempoConfig::default().validate().is_ok());
        assert!(AnalysisConfig::new("track.wav").validate().is_ok());
    }

    #[test]
    fn default_window_is_half_a_second() {
        assert_eq!(TempoConfig::default().window_size(44100), 22050);
        assert_eq!(TempoConfig::default().window_size(48000), 24000);
    }

    #[test]
    fn rejects_range_narrower_than_an_octave() {
        let config = TempoConfig {
            min_bpm: 100.0,
            max_bpm: 150.0,
            ..TempoConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_range_without_an_integer_bpm() {
        let config = TempoConfig {
            min_bpm: 0.4,
            max_bpm: 0.8,
            ..TempoConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidConfig(_))));

        let fractional = TempoConfig {
            min_bpm: 80.4,
            max_bpm: 180.6,
            ..TempoConfig::default()
        };
        assert!(fractional.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        let zero_window = TempoConfig {
            window_duration_seconds: 0.0,
            ..TempoConfig::default()
        };
        assert!(zero_window.validate().is_err());

        let no_lookahead = TempoConfig {
            max_pair_lookahead: 1,
            ..TempoConfig::default()
        };
        assert!(no_lookahead.validate().is_err());

        let no_candidates = TempoConfig {
            top_candidate_count: 0,
            ..TempoConfig::default()
        };
        assert!(no_candidates.validate().is_err());
    }

    #[test]
    fn band_must_fit_below_nyquist() {
        let band = BandPassConfig {
            low_cut_hz: 80.0,
            high_cut_hz: 5000.0,
            q: 3.0,
        };
        assert!(band.validate(44100).is_ok());
        assert!(band.validate(8000).is_err());

        let inverted = BandPassConfig {
            low_cut_hz: 150.0,
            high_cut_hz: 80.0,
            q: 3.0,
        };
        assert!(inverted.validate(44100).is_err());
    }
}
