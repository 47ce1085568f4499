//! Tipos de erro da biblioteca.

use thiserror::Error;

/// Tipo de resultado padrão da biblioteca.
pub type MemoizeResult<T> = Result<T, MemoizeError>;

/// Erros possíveis durante a memoização.
#[derive(Error, Debug)]
pub enum MemoizeError {
    #[error("Argumento não pode ser usado como chave: {0}")]
    UnhashableArgument(String),

    #[error("Computação falhou: {0}")]
    ComputationFailed(String),

    #[error("Computação em andamento foi cancelada antes de produzir um resultado")]
    ComputationCancelled,

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao parsear TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Erro ao serializar TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl MemoizeError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Cria um erro de computação falha.
    pub fn computation<S: Into<String>>(msg: S) -> Self {
        Self::ComputationFailed(msg.into())
    }

    /// Cria um erro de argumento que não pode virar chave.
    pub fn unhashable<S: Into<String>>(msg: S) -> Self {
        Self::UnhashableArgument(msg.into())
    }
}
