//! Hooks padrão da biblioteca.
//!
//! Este módulo contém hooks que vêm pré-configurados:
//! - `LoggingHook`: Registra computações no log
//! - `MetricsHook`: Coleta métricas das computações

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::MemoizeResult;

use super::{Hook, HookContext, HookEvent, HookResult};

// ═══════════════════════════════════════════════════════════════════════════
// LoggingHook
// ═══════════════════════════════════════════════════════════════════════════

/// Hook que registra computações no log.
///
/// Executado em cada miss (on_miss), registra a chave e a duração da
/// computação subjacente usando o sistema de logging (tracing).
#[derive(Debug, Default)]
pub struct LoggingHook;

impl LoggingHook {
    /// Cria um novo LoggingHook.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Hook for LoggingHook {
    fn name(&self) -> &str {
        "logging"
    }

    fn event(&self) -> HookEvent {
        HookEvent::OnMiss
    }

    async fn execute(&self, context: &HookContext<'_>) -> MemoizeResult<HookResult> {
        if let HookContext::OnMiss { key, elapsed } = context {
            tracing::info!(
                key = %key,
                elapsed_ms = elapsed.as_millis() as u64,
                "Computação memoizada"
            );
        }

        Ok(HookResult::Continue)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MetricsHook
// ═══════════════════════════════════════════════════════════════════════════

/// Hook que coleta métricas das computações.
///
/// Mantém contadores de computações e a soma dos tempos para calcular a
/// duração média.
#[derive(Debug, Default)]
pub struct MetricsHook {
    /// Total de computações executadas.
    computations: AtomicU64,

    /// Soma das durações em microssegundos (para calcular média).
    elapsed_sum_us: AtomicU64,

    /// Maior duração observada em microssegundos.
    max_elapsed_us: AtomicU64,
}

impl MetricsHook {
    /// Cria um novo MetricsHook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna o total de computações.
    pub fn total_computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Retorna a duração média em microssegundos.
    pub fn average_elapsed_us(&self) -> f64 {
        let total = self.total_computations();
        if total == 0 {
            0.0
        } else {
            self.elapsed_sum_us.load(Ordering::Relaxed) as f64 / total as f64
        }
    }

    /// Retorna a maior duração observada em microssegundos.
    pub fn max_elapsed_us(&self) -> u64 {
        self.max_elapsed_us.load(Ordering::Relaxed)
    }

    /// Retorna as métricas em formato estruturado.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            total_computations: self.total_computations(),
            average_elapsed_us: self.average_elapsed_us(),
            max_elapsed_us: self.max_elapsed_us(),
        }
    }
}

/// Métricas coletadas pelo MetricsHook.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub total_computations: u64,
    pub average_elapsed_us: f64,
    pub max_elapsed_us: u64,
}

#[async_trait]
impl Hook for MetricsHook {
    fn name(&self) -> &str {
        "metrics"
    }

    fn event(&self) -> HookEvent {
        HookEvent::OnMiss
    }

    async fn execute(&self, context: &HookContext<'_>) -> MemoizeResult<HookResult> {
        if let HookContext::OnMiss { elapsed, .. } = context {
            let elapsed_us = elapsed.as_micros() as u64;

            self.computations.fetch_add(1, Ordering::Relaxed);
            self.elapsed_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
            self.max_elapsed_us.fetch_max(elapsed_us, Ordering::Relaxed);
        }

        Ok(HookResult::Continue)
    }
}
