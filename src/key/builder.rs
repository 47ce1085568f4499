//! Construção incremental de chaves de cache.

use sha2::{Digest, Sha256};

/// Chave de cache derivada de uma sequência de argumentos.
///
/// Imutável, comparável e hasheável. Sequências de argumentos iguais sempre
/// produzem chaves iguais; sequências distintas só colidem com a
/// probabilidade de colisão do SHA-256.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Retorna a representação hexadecimal da chave.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Tags de domínio: cada campo escrito é prefixado com o tipo, e campos de
// tamanho variável também com o comprimento, para que ("ab", "c") e
// ("a", "bc") nunca produzam o mesmo digest.
const TAG_NAMESPACE: u8 = 0x00;
const TAG_UNIT: u8 = 0x01;
const TAG_BOOL: u8 = 0x02;
const TAG_UINT: u8 = 0x03;
const TAG_INT: u8 = 0x04;
const TAG_FLOAT: u8 = 0x05;
const TAG_CHAR: u8 = 0x06;
const TAG_STR: u8 = 0x07;
const TAG_BYTES: u8 = 0x08;
const TAG_NONE: u8 = 0x09;
const TAG_SOME: u8 = 0x0a;
const TAG_SEQ: u8 = 0x0b;

/// Construtor incremental de [`CacheKey`].
///
/// Determinístico e sem efeitos colaterais: a mesma sequência de escritas
/// produz sempre a mesma chave.
pub struct KeyBuilder {
    hasher: Sha256,
}

impl KeyBuilder {
    /// Cria um novo construtor vazio.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Cria um construtor semeado com um namespace.
    ///
    /// Memoizers com namespaces diferentes nunca compartilham chaves,
    /// mesmo para argumentos idênticos.
    pub fn with_namespace(namespace: &str) -> Self {
        let mut builder = Self::new();
        if !namespace.is_empty() {
            builder.write_tagged(TAG_NAMESPACE, namespace.as_bytes());
        }
        builder
    }

    fn write_tagged(&mut self, tag: u8, payload: &[u8]) {
        self.hasher.update([tag]);
        self.hasher.update((payload.len() as u64).to_le_bytes());
        self.hasher.update(payload);
    }

    /// Escreve o marcador de unidade (`()`).
    pub fn write_unit(&mut self) {
        self.hasher.update([TAG_UNIT]);
    }

    /// Escreve um booleano.
    pub fn write_bool(&mut self, value: bool) {
        self.hasher.update([TAG_BOOL, value as u8]);
    }

    /// Escreve um inteiro sem sinal.
    pub fn write_uint(&mut self, value: u128) {
        self.hasher.update([TAG_UINT]);
        self.hasher.update(value.to_le_bytes());
    }

    /// Escreve um inteiro com sinal.
    pub fn write_int(&mut self, value: i128) {
        self.hasher.update([TAG_INT]);
        self.hasher.update(value.to_le_bytes());
    }

    /// Escreve um float finito.
    ///
    /// O chamador garante a finitude; zeros com sinal são normalizados para
    /// que `-0.0` e `0.0`, que comparam iguais, derivem a mesma chave.
    pub fn write_float(&mut self, value: f64) {
        let normalized = if value == 0.0 { 0.0 } else { value };
        self.hasher.update([TAG_FLOAT]);
        self.hasher.update(normalized.to_bits().to_le_bytes());
    }

    /// Escreve um caractere.
    pub fn write_char(&mut self, value: char) {
        self.hasher.update([TAG_CHAR]);
        self.hasher.update((value as u32).to_le_bytes());
    }

    /// Escreve uma string.
    pub fn write_str(&mut self, value: &str) {
        self.write_tagged(TAG_STR, value.as_bytes());
    }

    /// Escreve bytes crus.
    pub fn write_bytes(&mut self, value: &[u8]) {
        self.write_tagged(TAG_BYTES, value);
    }

    /// Escreve o marcador de `None`.
    pub fn write_none(&mut self) {
        self.hasher.update([TAG_NONE]);
    }

    /// Escreve o marcador de `Some`; o valor interno é escrito em seguida
    /// pelo chamador.
    pub fn write_some(&mut self) {
        self.hasher.update([TAG_SOME]);
    }

    /// Escreve o cabeçalho de uma sequência de `len` elementos.
    pub fn write_seq_len(&mut self, len: usize) {
        self.hasher.update([TAG_SEQ]);
        self.hasher.update((len as u64).to_le_bytes());
    }

    /// Finaliza e produz a chave.
    pub fn finish(self) -> CacheKey {
        CacheKey(hex::encode(self.hasher.finalize()))
    }
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_is_deterministic() {
        let mut a = KeyBuilder::new();
        a.write_str("fibonacci");
        a.write_uint(40);

        let mut b = KeyBuilder::new();
        b.write_str("fibonacci");
        b.write_uint(40);

        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn test_field_boundaries_are_preserved() {
        // ("ab", "c") e ("a", "bc") concatenam nos mesmos bytes
        let mut a = KeyBuilder::new();
        a.write_str("ab");
        a.write_str("c");

        let mut b = KeyBuilder::new();
        b.write_str("a");
        b.write_str("bc");

        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_namespace_separates_keys() {
        let mut a = KeyBuilder::with_namespace("left");
        a.write_uint(7);

        let mut b = KeyBuilder::with_namespace("right");
        b.write_uint(7);

        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_empty_namespace_is_no_namespace() {
        let mut a = KeyBuilder::with_namespace("");
        a.write_uint(7);

        let mut b = KeyBuilder::new();
        b.write_uint(7);

        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn test_signed_zero_is_normalized() {
        let mut a = KeyBuilder::new();
        a.write_float(0.0);

        let mut b = KeyBuilder::new();
        b.write_float(-0.0);

        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn test_key_display_is_hex() {
        let key = KeyBuilder::new().finish();
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(format!("{}", key), key.as_str());
    }
}
