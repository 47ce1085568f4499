//! Tabela de computações em voo.
//!
//! Garante no máximo uma computação concorrente por chave: o primeiro
//! chamador vira líder e executa a computação; os demais aguardam o
//! desfecho publicado em um canal `watch`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::key::CacheKey;

/// Estado publicado de uma computação em voo.
#[derive(Debug, Clone)]
pub(crate) enum FlightState<V> {
    /// Computação ainda em execução.
    Pending,

    /// Computação concluída com sucesso.
    Done(V),

    /// Computação falhou; o texto do erro é repassado aos seguidores.
    Failed(String),
}

/// Desfecho da admissão de um chamador.
pub(crate) enum Admission<V> {
    /// Este chamador executa a computação e publica o desfecho.
    Leader(FlightGuard<V>),

    /// Outro chamador já computa esta chave; aguardar pelo receiver.
    Follower(watch::Receiver<FlightState<V>>),
}

type FlightMap<V> = Arc<Mutex<HashMap<CacheKey, watch::Receiver<FlightState<V>>>>>;

/// Tabela de voos por chave.
///
/// O lock interno nunca é mantido através de um `await`; apenas protege a
/// inserção e remoção de entradas no mapa.
pub(crate) struct FlightTable<V> {
    flights: FlightMap<V>,
}

impl<V: Clone> FlightTable<V> {
    pub(crate) fn new() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Admite um chamador para a chave.
    ///
    /// O primeiro chamador recebe um [`FlightGuard`] e vira líder; chamadores
    /// subsequentes recebem um receiver do estado do voo existente.
    pub(crate) fn admit(&self, key: &CacheKey) -> Admission<V> {
        let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(rx) = flights.get(key) {
            return Admission::Follower(rx.clone());
        }

        let (tx, rx) = watch::channel(FlightState::Pending);
        flights.insert(key.clone(), rx);

        Admission::Leader(FlightGuard {
            key: key.clone(),
            flights: Arc::clone(&self.flights),
            tx,
        })
    }

    /// Número de computações atualmente em voo.
    pub(crate) fn len(&self) -> usize {
        self.flights
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

/// Guarda do líder de um voo.
///
/// Ao cair, remove o voo da tabela e fecha o canal. Se o futuro do líder for
/// dropado antes de publicar um desfecho, os seguidores observam o canal
/// fechado e recebem um cancelamento em vez de esperar indefinidamente.
pub(crate) struct FlightGuard<V> {
    key: CacheKey,
    flights: FlightMap<V>,
    tx: watch::Sender<FlightState<V>>,
}

impl<V: Clone> FlightGuard<V> {
    /// Publica o desfecho da computação para os seguidores.
    pub(crate) fn publish(&self, state: FlightState<V>) {
        // a tabela mantém um receiver até o guard cair, então o envio
        // não falha por falta de assinantes
        let _ = self.tx.send(state);
    }
}

impl<V> Drop for FlightGuard<V> {
    fn drop(&mut self) {
        let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());
        flights.remove(&self.key);
    }
}
