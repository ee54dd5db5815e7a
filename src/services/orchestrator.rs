//! Request lifecycle for one dashboard view.
//!
//! Every parameter change starts a new cycle tagged with the next generation
//! number. A cycle only publishes if its generation is still the current one,
//! so a slow, superseded request can never overwrite a newer result. The
//! underlying fetches are not aborted; their output is simply dropped.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::errors::FetchError;
use crate::models::RequestParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Published view of an orchestrator. Replaced wholesale on every transition
/// and never mutated once handed out.
///
/// `data` is only set in `Ready`, `error` only in `Failed`.
#[derive(Debug, Serialize)]
pub struct Snapshot<T> {
    pub generation: u64,
    pub state: LoadState,
    pub params: Option<RequestParameters>,
    pub data: Option<T>,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    fn idle() -> Self {
        Self {
            generation: 0,
            state: LoadState::Idle,
            params: None,
            data: None,
            error: None,
            updated_at: Utc::now(),
        }
    }

    fn loading(generation: u64, params: RequestParameters) -> Self {
        Self {
            generation,
            state: LoadState::Loading,
            params: Some(params),
            data: None,
            error: None,
            updated_at: Utc::now(),
        }
    }

    fn settled(generation: u64, params: RequestParameters, outcome: Result<T, String>) -> Self {
        let (state, data, error) = match outcome {
            Ok(data) => (LoadState::Ready, Some(data), None),
            Err(msg) => (LoadState::Failed, None, Some(msg)),
        };
        Self {
            generation,
            state,
            params: Some(params),
            data,
            error,
            updated_at: Utc::now(),
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, LoadState::Ready | LoadState::Failed)
    }
}

/// Work performed by one fetch cycle: fetch everything for `params`, then
/// merge it into the view's output.
#[async_trait]
pub trait CycleLoader: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    fn name(&self) -> &'static str;

    async fn load(&self, params: &RequestParameters) -> Result<Self::Output, FetchError>;
}

pub struct Orchestrator<L: CycleLoader> {
    loader: Arc<L>,
    tx: Arc<watch::Sender<Arc<Snapshot<L::Output>>>>,
}

impl<L: CycleLoader> Orchestrator<L> {
    pub fn new(loader: L) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot::idle()));
        Self {
            loader: Arc::new(loader),
            tx: Arc::new(tx),
        }
    }

    /// Current published snapshot.
    pub fn current(&self) -> Arc<Snapshot<L::Output>> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every published transition.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<L::Output>>> {
        self.tx.subscribe()
    }

    /// Start a new cycle for `params` and return its generation.
    ///
    /// Must be called from within a Tokio runtime; the cycle runs as a
    /// spawned task.
    pub fn set_params(&self, params: RequestParameters) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|current| {
            generation = current.generation + 1;
            *current = Arc::new(Snapshot::loading(generation, params.clone()));
        });

        info!(
            "🔄 [{}] cycle {} started for {} series ({}, {:?})",
            self.loader.name(),
            generation,
            params.series_ids.len(),
            params.frequency,
            params.limit
        );

        if let Err(msg) = params.validate() {
            Self::publish(&self.tx, self.loader.name(), generation, params, Err(msg));
            return generation;
        }

        let loader = self.loader.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = loader.load(&params).await.map_err(|e| e.to_string());
            Self::publish(&tx, loader.name(), generation, params, outcome);
        });

        generation
    }

    /// Wait until the latest cycle is `Ready` or `Failed`.
    ///
    /// Only ever resolves with the newest generation's outcome: a cycle
    /// started while waiting resets the wait.
    pub async fn settled(&self) -> Arc<Snapshot<L::Output>> {
        let mut rx = self.subscribe();
        let result = rx.wait_for(|snap| snap.is_settled()).await.map(|snap| snap.clone());
        match result {
            Ok(snap) => snap,
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.current(),
        }
    }

    fn publish(
        tx: &watch::Sender<Arc<Snapshot<L::Output>>>,
        name: &str,
        generation: u64,
        params: RequestParameters,
        outcome: Result<L::Output, String>,
    ) {
        if let Err(msg) = &outcome {
            error!("✗ [{}] cycle {} failed: {}", name, generation, msg);
        }
        let ok = outcome.is_ok();

        // Generation check and replacement happen under the channel's lock.
        let published = tx.send_if_modified(|current| {
            if current.generation != generation {
                return false;
            }
            *current = Arc::new(Snapshot::settled(generation, params, outcome));
            true
        });

        if !published {
            warn!(
                "[{}] discarding result of superseded cycle {} (current is {})",
                name,
                generation,
                tx.borrow().generation
            );
        } else if ok {
            info!("✓ [{}] cycle {} ready", name, generation);
        }
    }
}
