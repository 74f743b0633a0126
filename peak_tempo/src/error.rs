use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Erreur de décodage du fichier : {0}")]
    Decode(String),
    #[error("Entrée invalide : {0}")]
    InvalidInput(String),
    #[error("Configuration invalide : {0}")]
    InvalidConfig(String),
    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),
}
