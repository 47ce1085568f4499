//! Derivação de chaves de cache a partir de argumentos.
//!
//! Este módulo transforma uma sequência ordenada de argumentos em uma
//! [`CacheKey`] determinística: um digest SHA-256 com separação de domínio
//! por campo, de modo que sequências distintas não colidem por concatenação.

mod builder;
mod source;

pub use builder::{CacheKey, KeyBuilder};
pub use source::{key_of, key_of_with_namespace, KeySource};
