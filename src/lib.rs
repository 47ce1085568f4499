//! # memoize
//!
//! Memoização em processo para computações determinísticas e caras.
//!
//! O motor deriva uma chave da sequência de argumentos, consulta um cache
//! LRU com TTL opcional antes de invocar a computação subjacente e garante
//! que chamadores concorrentes com a mesma chave executem a computação no
//! máximo uma vez.
//!
//! ## Módulos
//!
//! - [`key`] - Derivação de chaves a partir de argumentos
//! - [`store`] - Cache Store (LRU + TTL) dos resultados
//! - [`memoizer`] - Motor de memoização e valor lazy por supplier
//! - [`hooks`] - Sistema de hooks para observação e customização
//! - [`types`] - Tipos compartilhados (configuração e erros)

pub mod hooks;
pub mod key;
pub mod memoizer;
pub mod store;
pub mod types;

pub use key::{key_of, CacheKey, KeyBuilder, KeySource};
pub use memoizer::{MemoizedValue, Memoizer};
pub use types::config::MemoizeConfig;
pub use types::errors::{MemoizeError, MemoizeResult};
