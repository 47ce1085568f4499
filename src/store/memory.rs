//! Cache LRU em memória para resultados memoizados.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use lru::LruCache;

use crate::key::CacheKey;

use super::CacheStore;

/// Entrada do cache: valor computado e metadados para decisões de expiração.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Valor computado.
    pub value: V,

    /// Momento em que foi cacheado.
    pub cached_at: DateTime<Utc>,

    /// Momento do último acesso.
    pub last_accessed: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Cria uma nova entrada.
    pub fn new(value: V) -> Self {
        let now = Utc::now();
        Self {
            value,
            cached_at: now,
            last_accessed: now,
        }
    }

    /// Verifica se a entrada expirou. Sem TTL configurado, nunca expira.
    pub fn is_expired(&self, ttl: Option<Duration>) -> bool {
        let Some(ttl) = ttl else {
            return false;
        };
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);
        elapsed > ttl
    }

    fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }
}

/// Estatísticas do cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Capacidade máxima.
    pub capacity: usize,

    /// Número de acertos (cache hits).
    pub hits: u64,

    /// Número de erros (cache misses).
    pub misses: u64,

    /// Número de entradas removidas por pressão de capacidade ou expiração.
    pub evictions: u64,
}

impl CacheStats {
    /// Calcula a taxa de acerto.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache LRU em memória com TTL opcional.
pub struct MemoryStore<V> {
    cache: LruCache<CacheKey, CacheEntry<V>>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<V> MemoryStore<V> {
    /// Cria um novo store.
    ///
    /// # Argumentos
    /// - `capacity`: Número máximo de entradas
    /// - `ttl`: Tempo de vida das entradas (`None` = sem expiração)
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1024).unwrap());
        Self {
            cache: LruCache::new(cap),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Cria um store com configuração padrão.
    pub fn default_config() -> Self {
        Self::new(1024, None)
    }

    /// Remove entradas expiradas.
    pub fn cleanup_expired(&mut self) {
        let expired_keys: Vec<CacheKey> = self
            .cache
            .iter()
            .filter(|(_, v)| v.is_expired(self.ttl))
            .map(|(k, _)| k.clone())
            .collect();

        for key in expired_keys {
            self.cache.pop(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl<V: Clone + Send> CacheStore<V> for MemoryStore<V> {
    /// Busca no store.
    ///
    /// Retorna `None` se não encontrado ou se expirado. A verificação de
    /// expiração usa `peek` para não promover uma entrada morta na ordem LRU.
    fn get(&mut self, key: &CacheKey) -> Option<V> {
        let is_expired = self.cache.peek(key).map(|e| e.is_expired(self.ttl));

        match is_expired {
            Some(true) => {
                self.cache.pop(key);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key = %key, "Entrada expirada removida");
                None
            }
            Some(false) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                let entry = self.cache.get_mut(key)?;
                entry.touch();
                Some(entry.value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insere no store. Há no máximo uma entrada por chave; inserir de novo
    /// substitui a anterior.
    fn put(&mut self, key: CacheKey, value: V) {
        let evicted = self.cache.push(key.clone(), CacheEntry::new(value));
        if let Some((evicted_key, _)) = evicted {
            if evicted_key != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key = %evicted_key, "Entrada evictada por capacidade");
            }
        }
    }

    /// Remove uma entrada específica.
    fn evict(&mut self, key: &CacheKey) -> bool {
        self.cache.pop(key).is_some()
    }

    /// Limpa todo o store.
    fn clear(&mut self) {
        self.cache.clear();
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    /// Retorna estatísticas do store.
    fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of;

    fn store() -> MemoryStore<String> {
        MemoryStore::new(10, Some(Duration::from_secs(60)))
    }

    fn key(n: u32) -> CacheKey {
        key_of(&n).unwrap()
    }

    #[test]
    fn test_store_hit() {
        let mut store = store();
        store.put(key(1), "um".to_string());

        let cached = store.get(&key(1));
        assert_eq!(cached.as_deref(), Some("um"));

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_store_miss() {
        let mut store = store();

        let cached = store.get(&key(99));
        assert!(cached.is_none());

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_store_expiration() {
        // TTL de 0 segundos = sempre expirado
        let mut store = MemoryStore::new(10, Some(Duration::from_secs(0)));
        store.put(key(1), "um".to_string());

        assert!(store.get(&key(1)).is_none());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_without_ttl_never_expires() {
        let mut store = MemoryStore::new(10, None);
        store.put(key(1), "um".to_string());

        assert!(store.get(&key(1)).is_some());
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = MemoryStore::new(2, None);

        store.put(key(1), "um".to_string());
        store.put(key(2), "dois".to_string());
        store.put(key(3), "três".to_string()); // deve evictar key(1)

        assert!(store.get(&key(1)).is_none());
        assert!(store.get(&key(2)).is_some());
        assert!(store.get(&key(3)).is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_at_most_one_entry_per_key() {
        let mut store = store();

        store.put(key(1), "antigo".to_string());
        store.put(key(1), "novo".to_string());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key(1)).as_deref(), Some("novo"));
        // substituição da mesma chave não conta como eviction
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_evict() {
        let mut store = store();
        store.put(key(1), "um".to_string());

        assert!(store.evict(&key(1)));
        assert!(!store.evict(&key(1)));
        assert!(store.get(&key(1)).is_none());
    }

    #[test]
    fn test_store_clear() {
        let mut store = store();
        store.put(key(1), "um".to_string());
        store.put(key(2), "dois".to_string());

        store.clear();

        assert!(store.get(&key(1)).is_none());
        assert!(store.get(&key(2)).is_none());
        assert_eq!(store.stats().size, 0);
    }

    #[test]
    fn test_store_stats() {
        let mut store = store();
        store.put(key(1), "um".to_string());

        store.get(&key(1)); // hit
        store.get(&key(2)); // miss
        store.get(&key(1)); // hit

        let stats = store.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 10);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.666).abs() < 0.01);
    }

    #[test]
    fn test_cleanup_expired() {
        let mut store = MemoryStore::new(10, Some(Duration::from_secs(0)));
        store.put(key(1), "um".to_string());
        store.put(key(2), "dois".to_string());

        store.cleanup_expired();

        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().evictions, 2);
    }

    #[test]
    fn test_entry_is_expired() {
        let entry = CacheEntry::new("valor".to_string());

        assert!(!entry.is_expired(Some(Duration::from_secs(3600))));
        assert!(entry.is_expired(Some(Duration::from_secs(0))));
        assert!(!entry.is_expired(None));
    }
}
