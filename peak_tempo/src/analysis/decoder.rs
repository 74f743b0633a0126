use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use log::{debug, warn};
use rubato::{FftFixedIn, Resampler};
use std::path::Path;

use crate::analysis::buffer::PcmBuffer;

const RESAMPLE_CHUNK: usize = 1024;

/// Charge et décode un fichier WAV en conservant les canaux séparés, avec rééchantillonnage à target_sr
pub fn decode_to_channels(path: &Path, target_sr: u32) -> Result<Vec<Vec<f32>>> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Impossible d'ouvrir le fichier {:?}", path))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    let source_sr = spec.sample_rate;

    if channels == 0 {
        bail!("Le fichier {:?} ne déclare aucun canal", path);
    }

    // Lecture des échantillons interleavés en f32 normalisé
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => {
            reader.samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .context("Erreur lors de la lecture des échantillons")?
        }
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader.samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()
                .context("Erreur lors de la conversion des échantillons")?
        }
    };

    debug!(
        "{:?} : {} canaux à {} Hz, {} échantillons",
        path, channels, source_sr, interleaved.len()
    );

    // Séparation des canaux
    let frames = interleaved.len() / channels;
    let mut per_channel: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    if channels > 1 {
        for frame in interleaved.chunks_exact(channels) {
            for (ch, sample) in frame.iter().enumerate() { per_channel[ch].push(*sample); }
        }
    } else if let Some(first) = per_channel.get_mut(0) {
        // Mono -> réutiliser le vecteur existant
        *first = interleaved;
    }

    // Rééchantillonnage individuel si nécessaire
    if source_sr != target_sr {
        for ch in per_channel.iter_mut() {
            *ch = resample(ch, source_sr, target_sr)?;
        }
    }

    Ok(per_channel)
}

/// Décode en stéréo : le mono est dupliqué, au-delà de deux canaux seuls les deux premiers sont gardés
pub fn decode_to_stereo(path: &Path, target_sr: u32) -> Result<PcmBuffer> {
    let mut channels = decode_to_channels(path, target_sr)?;

    if channels.len() > 2 {
        warn!("{} canaux dans {:?}, seuls les deux premiers sont analysés", channels.len(), path);
        channels.truncate(2);
    }

    let mut channels = channels.into_iter();
    let left = channels.next().unwrap_or_default();
    let right = match channels.next() {
        Some(right) => right,
        None => left.clone(),
    };

    Ok(PcmBuffer::new(left, right, target_sr)?)
}

/// Rééchantillonne un unique canal audio à la fréquence cible
fn resample(samples: &[f32], source_sr: u32, target_sr: u32) -> Result<Vec<f32>> {
    let mut resampler = FftFixedIn::<f32>::new(
        source_sr as usize,
        target_sr as usize,
        RESAMPLE_CHUNK,
        1,
        1,
    ).context("Erreur lors de l'initialisation du resampler")?;

    let mut output = vec![vec![0.0f32; resampler.output_frames_max()]; 1];
    let mut resampled = Vec::with_capacity(samples.len() * target_sr as usize / source_sr as usize + 1);
    for chunk in samples.chunks(RESAMPLE_CHUNK) {
        let input = [chunk];
        let processed = if chunk.len() == RESAMPLE_CHUNK {
            resampler.process_into_buffer(&input[..], &mut output, None)
        } else {
            // Dernier bloc incomplet : complété par des zéros
            resampler.process_partial_into_buffer(Some(&input[..]), &mut output, None)
        };
        let (_, out_len) = processed.context("Erreur lors du rééchantillonnage")?;
        resampled.extend_from_slice(&output[0][..out_len]);
    }
    Ok(resampled)
}
