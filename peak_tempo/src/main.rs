use clap::Parser;
use std::path::PathBuf;
use anyhow::Result;

use peak_tempo::model::AnalysisResult;
use peak_tempo::{run, AnalysisConfig, BandPassConfig, OutputFormat, TempoConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg()]
    file_path: PathBuf,
    #[arg(long, default_value_t = 80.0)]
    min_bpm: f64,
    #[arg(long, default_value_t = 180.0)]
    max_bpm: f64,
    /// Durée d'une fenêtre de recherche de pic (s)
    #[arg(long, default_value_t = 0.5)]
    window_duration: f64,
    /// Nombre de pics suivants (exclusif) appariés à chaque pic
    #[arg(long, default_value_t = 10)]
    lookahead: usize,
    #[arg(long, default_value_t = 10)]
    top: usize,
    #[arg(long, default_value_t = 1)]
    tolerance: u32,
    #[arg(long, default_value_t = 80.0)]
    low_cut: f64,
    #[arg(long, default_value_t = 150.0)]
    high_cut: f64,
    /// Facteur de qualité des filtres (dB)
    #[arg(long, default_value_t = 3.0)]
    q: f64,
    /// Le fichier est déjà filtré
    #[arg(long)]
    no_filter: bool,
    #[arg(long, default_value_t = 44100)]
    target_sr: u32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // 1. Créer la configuration à partir des arguments
    let config = AnalysisConfig {
        file_path: args.file_path,
        target_sr: args.target_sr,
        band: (!args.no_filter).then_some(BandPassConfig {
            low_cut_hz: args.low_cut,
            high_cut_hz: args.high_cut,
            q: args.q,
        }),
        tempo: TempoConfig {
            window_duration_seconds: args.window_duration,
            min_bpm: args.min_bpm,
            max_bpm: args.max_bpm,
            max_pair_lookahead: args.lookahead,
            top_candidate_count: args.top,
            dedup_bpm_tolerance: args.tolerance,
        },
    };

    // 2. Appeler la bibliothèque
    let analysis_result = run(&config)?;

    // 3. Afficher le résultat
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis_result)?),
        OutputFormat::Text => print_text(&analysis_result),
    }

    Ok(())
}

fn print_text(result: &AnalysisResult) {
    print!("{}", render_text(result));
}

fn render_text(result: &AnalysisResult) -> String {
    let tempo = &result.tempo_analysis;
    let mut out = match (tempo.global_bpm, tempo.undetermined_reason) {
        (Some(bpm), _) => format!("BPM: {}\n", bpm),
        (None, Some(reason)) => format!("BPM: indéterminé ({})\n", reason),
        (None, None) => "BPM: indéterminé\n".to_string(),
    };
    for candidate in tempo.candidates.iter().skip(1) {
        out.push_str(&format!("  {:>3} BPM  ({} votes)\n", candidate.bpm, candidate.count));
    }
    out.push_str(&format!(
        "{:.1} s à {} Hz, {} pics\n",
        result.metadata.duration_seconds, result.metadata.sample_rate, tempo.peak_count
    ));
    out
}
