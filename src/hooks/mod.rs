//! Sistema de hooks da memoização.
//!
//! Hooks permitem observar e customizar o comportamento do memoizer em
//! pontos específicos do ciclo de vida do cache:
//!
//! - `pre_lookup`: Antes de consultar o cache
//! - `on_hit`: Quando um valor cacheado é reutilizado
//! - `on_miss`: Quando a computação subjacente foi executada
//! - `on_evict`: Quando uma entrada é invalidada explicitamente

mod builtin;

pub use builtin::{LoggingHook, Metrics, MetricsHook};

use std::time::Duration;

use async_trait::async_trait;

use crate::key::CacheKey;
use crate::MemoizeResult;

// ═══════════════════════════════════════════════════════════════════════════
// Tipos de eventos
// ═══════════════════════════════════════════════════════════════════════════

/// Evento que dispara um hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    /// Antes de consultar o cache.
    PreLookup,

    /// Quando a chave foi encontrada no cache.
    OnHit,

    /// Quando a chave não estava no cache e a computação rodou.
    OnMiss,

    /// Quando uma entrada foi invalidada.
    OnEvict,
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookEvent::PreLookup => write!(f, "pre_lookup"),
            HookEvent::OnHit => write!(f, "on_hit"),
            HookEvent::OnMiss => write!(f, "on_miss"),
            HookEvent::OnEvict => write!(f, "on_evict"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Contexto de hooks
// ═══════════════════════════════════════════════════════════════════════════

/// Contexto passado para hooks.
pub enum HookContext<'a> {
    /// Contexto para pre_lookup.
    PreLookup {
        /// Chave derivada dos argumentos.
        key: &'a CacheKey,
    },

    /// Contexto para on_hit.
    OnHit {
        /// Chave encontrada.
        key: &'a CacheKey,
    },

    /// Contexto para on_miss.
    OnMiss {
        /// Chave computada.
        key: &'a CacheKey,
        /// Duração da computação subjacente.
        elapsed: Duration,
    },

    /// Contexto para on_evict.
    OnEvict {
        /// Chave invalidada.
        key: &'a CacheKey,
    },
}

impl<'a> HookContext<'a> {
    /// Retorna o evento correspondente ao contexto.
    pub fn event(&self) -> HookEvent {
        match self {
            HookContext::PreLookup { .. } => HookEvent::PreLookup,
            HookContext::OnHit { .. } => HookEvent::OnHit,
            HookContext::OnMiss { .. } => HookEvent::OnMiss,
            HookContext::OnEvict { .. } => HookEvent::OnEvict,
        }
    }

    /// Retorna a chave do contexto.
    pub fn key(&self) -> &CacheKey {
        match self {
            HookContext::PreLookup { key }
            | HookContext::OnHit { key }
            | HookContext::OnMiss { key, .. }
            | HookContext::OnEvict { key } => key,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Resultado de hooks
// ═══════════════════════════════════════════════════════════════════════════

/// Resultado da execução de um hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookResult {
    /// Continua normalmente.
    #[default]
    Continue,

    /// Ignora o cache nesta chamada e recomputa (apenas válido para
    /// pre_lookup). O resultado fresco ainda é armazenado.
    Bypass,
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait Hook
// ═══════════════════════════════════════════════════════════════════════════

/// Trait para hooks customizáveis.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Nome do hook.
    fn name(&self) -> &str;

    /// Evento que dispara este hook.
    fn event(&self) -> HookEvent;

    /// Executa o hook.
    async fn execute(&self, context: &HookContext<'_>) -> MemoizeResult<HookResult>;
}

// ═══════════════════════════════════════════════════════════════════════════
// Sistema de hooks
// ═══════════════════════════════════════════════════════════════════════════

/// Gerenciador de hooks.
pub struct HookSystem {
    pre_lookup: Vec<Box<dyn Hook>>,
    on_hit: Vec<Box<dyn Hook>>,
    on_miss: Vec<Box<dyn Hook>>,
    on_evict: Vec<Box<dyn Hook>>,
}

impl HookSystem {
    /// Cria um novo sistema de hooks vazio.
    pub fn new() -> Self {
        Self {
            pre_lookup: Vec::new(),
            on_hit: Vec::new(),
            on_miss: Vec::new(),
            on_evict: Vec::new(),
        }
    }

    /// Cria um sistema com hooks padrão (logging).
    pub fn with_defaults() -> Self {
        let mut system = Self::new();
        system.register(Box::new(LoggingHook));
        system
    }

    /// Registra um hook.
    pub fn register(&mut self, hook: Box<dyn Hook>) {
        let event = hook.event();
        tracing::debug!(
            hook_name = hook.name(),
            event = %event,
            "Registrando hook"
        );

        match event {
            HookEvent::PreLookup => self.pre_lookup.push(hook),
            HookEvent::OnHit => self.on_hit.push(hook),
            HookEvent::OnMiss => self.on_miss.push(hook),
            HookEvent::OnEvict => self.on_evict.push(hook),
        }
    }

    /// Executa hooks de pre_lookup.
    ///
    /// Retorna o resultado final (Continue ou Bypass).
    pub async fn run_pre_lookup(&self, key: &CacheKey) -> MemoizeResult<HookResult> {
        let context = HookContext::PreLookup { key };

        for hook in &self.pre_lookup {
            let result = hook.execute(&context).await?;
            if result == HookResult::Bypass {
                return Ok(HookResult::Bypass);
            }
        }

        Ok(HookResult::Continue)
    }

    /// Executa hooks de on_hit.
    pub async fn run_on_hit(&self, key: &CacheKey) -> MemoizeResult<()> {
        let context = HookContext::OnHit { key };

        for hook in &self.on_hit {
            hook.execute(&context).await?;
        }

        Ok(())
    }

    /// Executa hooks de on_miss.
    pub async fn run_on_miss(&self, key: &CacheKey, elapsed: Duration) -> MemoizeResult<()> {
        let context = HookContext::OnMiss { key, elapsed };

        for hook in &self.on_miss {
            hook.execute(&context).await?;
        }

        Ok(())
    }

    /// Executa hooks de on_evict.
    pub async fn run_on_evict(&self, key: &CacheKey) -> MemoizeResult<()> {
        let context = HookContext::OnEvict { key };

        for hook in &self.on_evict {
            hook.execute(&context).await?;
        }

        Ok(())
    }

    /// Retorna o número total de hooks registrados.
    pub fn count(&self) -> usize {
        self.pre_lookup.len() + self.on_hit.len() + self.on_miss.len() + self.on_evict.len()
    }

    /// Retorna o número de hooks para um evento específico.
    pub fn count_for_event(&self, event: HookEvent) -> usize {
        match event {
            HookEvent::PreLookup => self.pre_lookup.len(),
            HookEvent::OnHit => self.on_hit.len(),
            HookEvent::OnMiss => self.on_miss.len(),
            HookEvent::OnEvict => self.on_evict.len(),
        }
    }
}

impl Default for HookSystem {
    fn default() -> Self {
        Self::new()
    }
}
