use log::debug;
use std::path::PathBuf;

use crate::analysis::buffer::PcmBuffer;
use crate::analysis::decoder;
use crate::analysis::filter::BandPass;
use crate::config::BandPassConfig;
use crate::error::AnalysisError;

/// Fournit le signal stéréo filtré à analyser
pub trait SignalSource {
    fn load(&self) -> Result<PcmBuffer, AnalysisError>;
}

/// Un buffer déjà en mémoire est sa propre source
impl SignalSource for PcmBuffer {
    fn load(&self) -> Result<PcmBuffer, AnalysisError> {
        Ok(self.clone())
    }
}

/// Fichier WAV décodé, rééchantillonné puis filtré sur la bande de la grosse caisse
#[derive(Clone, Debug)]
pub struct WavSource {
    pub path: PathBuf,
    pub target_sr: u32,
    pub band: Option<BandPassConfig>,
}

impl WavSource {
    pub fn new(path: impl Into<PathBuf>, target_sr: u32, band: Option<BandPassConfig>) -> Self {
        Self {
            path: path.into(),
            target_sr,
            band,
        }
    }
}

impl SignalSource for WavSource {
    fn load(&self) -> Result<PcmBuffer, AnalysisError> {
        if !self.path.exists() {
            return Err(AnalysisError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{:?} introuvable", self.path),
            )));
        }

        let buffer = decoder::decode_to_stereo(&self.path, self.target_sr)
            .map_err(|e| AnalysisError::Decode(format!("{e:#}")))?;

        match &self.band {
            Some(band) => {
                band.validate(self.target_sr)?;
                debug!(
                    "Filtrage passe-bande {}-{} Hz (Q = {} dB)",
                    band.low_cut_hz, band.high_cut_hz, band.q
                );
                let sr = buffer.sample_rate();
                PcmBuffer::new(
                    BandPass::apply(band, sr, buffer.left()),
                    BandPass::apply(band, sr, buffer.right()),
                    sr,
                )
            }
            None => Ok(buffer),
        }
    }
}
