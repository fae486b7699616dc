use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Lexicon load error: {0}")]
    LexiconLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
