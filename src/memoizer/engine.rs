//! Motor de memoização.
//!
//! Orquestra a derivação de chave, a consulta ao store e a deduplicação de
//! computações concorrentes, aplicando os hooks nos pontos do ciclo de vida.

use std::future::Future;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::hooks::{Hook, HookResult, HookSystem};
use crate::key::{key_of, key_of_with_namespace, CacheKey, KeySource};
use crate::store::{CacheStats, CacheStore, MemoryStore};
use crate::types::config::MemoizeConfig;
use crate::types::errors::{MemoizeError, MemoizeResult};

use super::flight::{Admission, FlightState, FlightTable};

/// Motor de memoização para computações que produzem `V`.
///
/// Responsável por:
/// - Derivar a chave da sequência de argumentos
/// - Consultar o store antes de invocar a computação
/// - Garantir no máximo uma computação concorrente por chave
/// - Armazenar resultados bem-sucedidos (falhas nunca são cacheadas)
pub struct Memoizer<V> {
    config: MemoizeConfig,
    store: RwLock<Box<dyn CacheStore<V> + Send + Sync>>,
    flights: FlightTable<V>,
    hooks: HookSystem,
}

impl<V: Clone + Send + Sync + 'static> Memoizer<V> {
    /// Cria um novo memoizer com o store em memória padrão.
    pub fn new(config: MemoizeConfig) -> Self {
        let store = MemoryStore::new(config.cache.capacity, config.cache.ttl());
        Self::with_store(config, Box::new(store))
    }

    /// Cria um memoizer com um store customizado.
    pub fn with_store(config: MemoizeConfig, store: Box<dyn CacheStore<V> + Send + Sync>) -> Self {
        Self {
            config,
            store: RwLock::new(store),
            flights: FlightTable::new(),
            hooks: HookSystem::with_defaults(),
        }
    }

    /// Registra um hook adicional.
    pub fn register_hook(&mut self, hook: Box<dyn Hook>) {
        self.hooks.register(hook);
    }

    /// Retorna a configuração em uso.
    pub fn config(&self) -> &MemoizeConfig {
        &self.config
    }

    /// Deriva a chave de uma sequência de argumentos, aplicando o namespace
    /// configurado.
    pub fn key_for<A: KeySource + ?Sized>(&self, args: &A) -> MemoizeResult<CacheKey> {
        if self.config.key.namespace.is_empty() {
            key_of(args)
        } else {
            key_of_with_namespace(&self.config.key.namespace, args)
        }
    }

    /// Retorna o valor memoizado para os argumentos, ou invoca a computação
    /// e memoiza o resultado.
    ///
    /// Chamadores concorrentes com a mesma chave não executam a computação
    /// em duplicata: o primeiro lidera e os demais aguardam o desfecho.
    /// Chaves distintas prosseguem de forma independente.
    pub async fn get_or_compute<A, F, Fut>(&self, args: &A, compute: F) -> MemoizeResult<V>
    where
        A: KeySource + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = MemoizeResult<V>>,
    {
        let key = self.key_for(args)?;
        self.get_or_compute_with_key(key, compute).await
    }

    /// Variante de [`get_or_compute`](Self::get_or_compute) para chamadores
    /// que já derivaram a própria chave.
    pub async fn get_or_compute_with_key<F, Fut>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> MemoizeResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = MemoizeResult<V>>,
    {
        // Cache desabilitado: computa direto, sem store nem deduplicação
        if !self.config.cache.enabled {
            return compute().await;
        }

        if self.hooks.run_pre_lookup(&key).await? == HookResult::Bypass {
            tracing::debug!(key = %key, "Cache ignorado por hook pre_lookup");
            return self.compute_and_store(&key, compute).await;
        }

        // Consulta o cache
        {
            let mut store = self.store.write().await;
            if let Some(value) = store.get(&key) {
                drop(store);
                tracing::debug!(key = %key, "Cache hit");
                self.hooks.run_on_hit(&key).await?;
                return Ok(value);
            }
        }

        match self.flights.admit(&key) {
            Admission::Leader(guard) => {
                // Dupla verificação: um voo anterior pode ter armazenado o
                // valor entre a consulta e a admissão
                let cached = {
                    let mut store = self.store.write().await;
                    store.get(&key)
                };
                if let Some(value) = cached {
                    guard.publish(FlightState::Done(value.clone()));
                    self.hooks.run_on_hit(&key).await?;
                    return Ok(value);
                }

                tracing::debug!(key = %key, "Cache miss, computação iniciada");
                let started = Instant::now();

                match compute().await {
                    Ok(value) => {
                        self.store.write().await.put(key.clone(), value.clone());
                        guard.publish(FlightState::Done(value.clone()));
                        self.hooks.run_on_miss(&key, started.elapsed()).await?;
                        Ok(value)
                    }
                    Err(err) => {
                        // Falhas propagam ao chamador sem envenenar o cache
                        tracing::debug!(key = %key, error = %err, "Computação falhou");
                        guard.publish(FlightState::Failed(err.to_string()));
                        Err(err)
                    }
                }
            }
            Admission::Follower(rx) => {
                tracing::trace!(key = %key, "Aguardando computação em voo");
                await_flight(rx).await
            }
        }
    }

    async fn compute_and_store<F, Fut>(&self, key: &CacheKey, compute: F) -> MemoizeResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = MemoizeResult<V>>,
    {
        let started = Instant::now();
        let value = compute().await?;
        self.store.write().await.put(key.clone(), value.clone());
        self.hooks.run_on_miss(key, started.elapsed()).await?;
        Ok(value)
    }

    /// Busca o valor memoizado sem computar.
    pub async fn get<A: KeySource + ?Sized>(&self, args: &A) -> MemoizeResult<Option<V>> {
        let key = self.key_for(args)?;
        Ok(self.store.write().await.get(&key))
    }

    /// Invalida a entrada dos argumentos. A próxima chamada recomputa.
    pub async fn invalidate<A: KeySource + ?Sized>(&self, args: &A) -> MemoizeResult<bool> {
        let key = self.key_for(args)?;
        let removed = self.store.write().await.evict(&key);

        if removed {
            tracing::debug!(key = %key, "Entrada invalidada");
            self.hooks.run_on_evict(&key).await?;
        }

        Ok(removed)
    }

    /// Remove todas as entradas memoizadas.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Número de entradas memoizadas.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Se não há entradas memoizadas.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Estatísticas do store subjacente.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Número de computações atualmente em voo.
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }
}

impl<V: Clone + Send + Sync + 'static> Default for Memoizer<V> {
    fn default() -> Self {
        Self::new(MemoizeConfig::default())
    }
}

/// Aguarda o desfecho publicado pelo líder do voo.
async fn await_flight<V: Clone>(
    mut rx: tokio::sync::watch::Receiver<FlightState<V>>,
) -> MemoizeResult<V> {
    loop {
        {
            let state = rx.borrow_and_update();
            match &*state {
                FlightState::Pending => {}
                FlightState::Done(value) => return Ok(value.clone()),
                FlightState::Failed(msg) => {
                    return Err(MemoizeError::ComputationFailed(msg.clone()))
                }
            }
        }

        if rx.changed().await.is_err() {
            // líder caiu sem publicar um desfecho
            return Err(MemoizeError::ComputationCancelled);
        }
    }
}
