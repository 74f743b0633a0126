use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::config::TempoConfig;
use crate::model::{IntervalCandidate, Peak};

/// Ramène un tempo dans l'octave `[min_bpm, max_bpm]` par doublements puis divisions par deux
pub fn fold_bpm(bpm: f64, min_bpm: f64, max_bpm: f64) -> f64 {
    let mut bpm = bpm;
    while bpm < min_bpm {
        bpm *= 2.0;
    }
    while bpm > max_bpm {
        bpm /= 2.0;
    }
    bpm
}

/// Histogramme des tempos obtenus entre chaque pic et ses voisins suivants.
///
/// Les pics doivent être triés par position. Retourne les candidats classés par
/// nombre de votes décroissant ; une liste vide signifie tempo indéterminé.
pub fn estimate_bpm(peaks: &[Peak], sample_rate: u32, config: &TempoConfig) -> Vec<IntervalCandidate> {
    let samples_in_one_minute = 60.0 * sample_rate as f64;
    // Bornes entières : l'arrondi d'une valeur repliée ne doit pas sortir de la plage
    let lowest = config.min_bpm.ceil();
    let highest = config.max_bpm.floor().max(lowest);

    // Ordre de création conservé pour départager les égalités de votes
    let mut candidates: Vec<IntervalCandidate> = Vec::new();
    let mut by_bpm: HashMap<u32, usize> = HashMap::new();

    for (index, current) in peaks.iter().enumerate() {
        for next in peaks.iter().skip(index + 1).take(config.max_pair_lookahead.saturating_sub(1)) {
            let samples_between = next.position.saturating_sub(current.position);
            if samples_between == 0 {
                continue;
            }

            let raw_bpm = samples_in_one_minute / samples_between as f64;
            let bpm = fold_bpm(raw_bpm, config.min_bpm, config.max_bpm)
                .round()
                .clamp(lowest, highest) as u32;

            match by_bpm.get(&bpm) {
                Some(&slot) => candidates[slot].count += 1,
                None => {
                    by_bpm.insert(bpm, candidates.len());
                    candidates.push(IntervalCandidate { bpm, count: 1 });
                }
            }
        }
    }

    debug!("{} tempos distincts avant sélection", candidates.len());

    candidates.sort_by(|a, b| b.count.cmp(&a.count));
    candidates.truncate(config.top_candidate_count);

    let mut candidates = merge_close_candidates(candidates, config.dedup_bpm_tolerance);
    candidates.sort_by(|a, b| b.count.cmp(&a.count));
    candidates
}

/// Fusionne les candidats dont les BPM sont à `tolerance` près.
///
/// Parcourt les voisins par BPM décroissant et retire le moins voté de chaque
/// paire trop proche ; à égalité de votes, le BPM le plus bas est gardé. Les
/// suppressions sont calculées pour tout le passage puis appliquées, et le passage
/// est répété tant qu'il retire quelque chose.
pub fn merge_close_candidates(
    mut candidates: Vec<IntervalCandidate>,
    tolerance: u32,
) -> Vec<IntervalCandidate> {
    candidates.sort_by(|a, b| b.bpm.cmp(&a.bpm));

    loop {
        let removed: BTreeSet<usize> = candidates
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0].bpm - pair[1].bpm <= tolerance)
            .map(|(i, pair)| if pair[0].count > pair[1].count { i + 1 } else { i })
            .collect();

        if removed.is_empty() {
            return candidates;
        }

        candidates = candidates
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, candidate)| candidate)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks_at(positions: &[usize]) -> Vec<Peak> {
        positions
            .iter()
            .map(|&position| Peak { position, volume: 1.0 })
            .collect()
    }

    fn candidate(bpm: u32, count: u32) -> IntervalCandidate {
        IntervalCandidate { bpm, count }
    }

    #[test]
    fn folding_halves_double_tempo() {
        assert_eq!(fold_bpm(240.0, 80.0, 180.0), 120.0);
        assert_eq!(fold_bpm(60.0, 80.0, 180.0), 120.0);
        assert_eq!(fold_bpm(30.0, 80.0, 180.0), 120.0);
    }

    #[test]
    fn folding_in_range_is_a_no_op() {
        for bpm in [80.0, 99.5, 120.0, 179.9, 180.0] {
            assert_eq!(fold_bpm(bpm, 80.0, 180.0), bpm);
            let folded = fold_bpm(bpm * 4.0, 80.0, 180.0);
            assert_eq!(fold_bpm(folded, 80.0, 180.0), folded);
        }
    }

    #[test]
    fn double_tempo_interval_votes_for_half() {
        // 11025 échantillons à 44100 Hz = 240 BPM, replié en 120
        let candidates = estimate_bpm(&peaks_at(&[0, 11025]), 44100, &TempoConfig::default());
        assert_eq!(candidates, vec![candidate(120, 1)]);
    }

    #[test]
    fn fewer_than_two_peaks_gives_nothing() {
        let config = TempoConfig::default();
        assert!(estimate_bpm(&[], 44100, &config).is_empty());
        assert!(estimate_bpm(&peaks_at(&[500]), 44100, &config).is_empty());
    }

    #[test]
    fn duplicate_positions_are_skipped() {
        let candidates = estimate_bpm(&peaks_at(&[0, 0, 22050]), 44100, &TempoConfig::default());
        assert_eq!(candidates, vec![candidate(120, 2)]);
    }

    #[test]
    fn lookahead_bounds_the_pairs() {
        let positions: Vec<usize> = (0..12).map(|i| i * 22050).collect();
        let config = TempoConfig {
            max_pair_lookahead: 2,
            ..TempoConfig::default()
        };
        // Seuls les voisins immédiats sont appariés
        let candidates = estimate_bpm(&peaks_at(&positions), 44100, &config);
        assert_eq!(candidates, vec![candidate(120, 11)]);
    }

    #[test]
    fn regular_peaks_vote_for_their_tempo() {
        // Un pic toutes les 0,5 s : 120 BPM pour les écarts 1, 2, 4 et 8
        let n = 30;
        let positions: Vec<usize> = (0..n).map(|i| i * 22050).collect();
        let candidates = estimate_bpm(&peaks_at(&positions), 44100, &TempoConfig::default());

        let expected: u32 = [1, 2, 4, 8].iter().map(|k| (n - k) as u32).sum();
        assert_eq!(candidates[0], candidate(120, expected));
    }

    #[test]
    fn keeps_only_the_top_candidates() {
        let config = TempoConfig {
            top_candidate_count: 2,
            dedup_bpm_tolerance: 0,
            ..TempoConfig::default()
        };
        // Écarts 0,5 s, 0,6 s et 0,4 s : 120, 100 et 150 BPM ...
        let positions = [0, 22050, 44100, 70560, 88200];
        let candidates = estimate_bpm(&peaks_at(&positions), 44100, &config);
        assert!(candidates.len() <= 2);
        assert!(candidates.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn equal_counts_keep_the_lower_bpm() {
        let merged = merge_close_candidates(vec![candidate(100, 5), candidate(101, 5)], 1);
        assert_eq!(merged, vec![candidate(100, 5)]);
    }

    #[test]
    fn higher_count_survives_a_merge() {
        let merged = merge_close_candidates(
            vec![candidate(120, 3), candidate(121, 9), candidate(140, 2), candidate(90, 4)],
            1,
        );
        assert_eq!(merged, vec![candidate(140, 2), candidate(121, 9), candidate(90, 4)]);
    }

    #[test]
    fn merged_candidates_are_never_within_tolerance() {
        let input = vec![
            candidate(104, 5),
            candidate(103, 1),
            candidate(102, 5),
            candidate(99, 2),
            candidate(98, 2),
            candidate(130, 7),
        ];
        for tolerance in 0..4u32 {
            let merged = merge_close_candidates(input.clone(), tolerance);
            for (i, a) in merged.iter().enumerate() {
                for b in &merged[i + 1..] {
                    assert!(a.bpm.abs_diff(b.bpm) > tolerance, "{a:?} / {b:?} (tolérance {tolerance})");
                }
            }
        }
    }

    #[test]
    fn fractional_bounds_keep_rounded_bpm_in_range() {
        // 60 * 8045 / 6000 = 80,45 : arrondi à 80, sous le minimum de 80,4
        let config = TempoConfig {
            min_bpm: 80.4,
            max_bpm: 180.6,
            ..TempoConfig::default()
        };
        let low = estimate_bpm(&peaks_at(&[0, 6000]), 8045, &config);
        assert_eq!(low, vec![candidate(81, 1)]);

        // 60 * 18055 / 6000 = 180,55 : arrondi à 181, au-dessus du maximum de 180,6
        let high = estimate_bpm(&peaks_at(&[0, 6000]), 18055, &config);
        assert_eq!(high, vec![candidate(180, 1)]);
    }

    #[test]
    fn candidates_stay_in_range_and_ranked() {
        let positions: Vec<usize> = [0, 9000, 21000, 40000, 47000, 66000, 90000, 101000, 130000]
            .to_vec();
        let config = TempoConfig::default();
        let candidates = estimate_bpm(&peaks_at(&positions), 44100, &config);

        assert!(!candidates.is_empty());
        for c in &candidates {
            assert!((80..=180).contains(&c.bpm), "{c:?}");
        }
        assert!(candidates.windows(2).all(|w| w[0].count >= w[1].count));
    }
}
