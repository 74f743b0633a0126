use log::debug;

use crate::analysis::buffer::PcmBuffer;
use crate::model::Peak;

/// Extrait un pic par fenêtre puis ne garde que la moitié la plus forte,
/// remise dans l'ordre temporel.
///
/// Seules les fenêtres complètes sont parcourues : une fin de buffer plus courte
/// qu'une fenêtre est ignorée. Dans une fenêtre, le premier échantillon atteignant
/// le maximum l'emporte.
pub fn extract_peaks(buffer: &PcmBuffer, window_size: usize) -> Vec<Peak> {
    if window_size == 0 {
        return Vec::new();
    }

    let left = buffer.left();
    let right = buffer.right();
    let window_count = buffer.len() / window_size;

    let mut peaks: Vec<Peak> = (0..window_count)
        .map(|win| {
            let start = win * window_size;
            let mut max = Peak {
                position: start,
                volume: volume_at(left, right, start),
            };
            for sample in start + 1..start + window_size {
                let volume = volume_at(left, right, sample);
                if volume > max.volume {
                    max = Peak { position: sample, volume };
                }
            }
            max
        })
        .collect();

    debug!("{} fenêtres de {} échantillons", window_count, window_size);

    // Tri stable : à volume égal, l'ordre des fenêtres est conservé
    peaks.sort_by(|a, b| b.volume.total_cmp(&a.volume));
    peaks.truncate(peaks.len() / 2);
    peaks.sort_by_key(|p| p.position);

    peaks
}

#[inline]
fn volume_at(left: &[f32], right: &[f32], index: usize) -> f32 {
    left[index].abs().max(right[index].abs())
}
