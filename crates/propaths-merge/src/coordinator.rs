//! Single-owner coordinator for fragments produced by parallel workers

use crate::{MergeEngine, MergeError, MergeReport};
use propaths_domain::{PayloadDocument, PayloadUpdate};
use tokio::sync::mpsc;

/// Handle used by workers to submit fragments
///
/// Cloneable; the coordinator finishes once every handle is dropped.
#[derive(Debug, Clone)]
pub struct FragmentSender {
    tx: mpsc::Sender<PayloadUpdate>,
}

impl FragmentSender {
    /// Submit a fragment, waiting if the coordinator's buffer is full
    pub async fn send(&self, update: PayloadUpdate) -> Result<(), MergeError> {
        self.tx.send(update).await.map_err(|_| MergeError::Closed)
    }
}

/// Final state after all fragments were applied
#[derive(Debug, Clone)]
pub struct CoordinatorOutcome {
    /// The merged document
    pub document: PayloadDocument,

    /// Totals over every fragment
    pub report: MergeReport,

    /// Number of fragments applied
    pub fragments: usize,
}

/// Owns a payload document and applies fragments one at a time
///
/// Workers run concurrently and send fragments through a bounded channel;
/// the coordinator is the only writer to the document.
///
/// # Examples
///
/// ```
/// use propaths_domain::{Interactor, PayloadDocument, PayloadUpdate};
/// use propaths_merge::{FragmentCoordinator, MergeEngine};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (coordinator, sender) =
///     FragmentCoordinator::new(MergeEngine::default_config(), PayloadDocument::new("ATXN3"));
///
/// let worker = tokio::spawn(async move {
///     sender.send(PayloadUpdate::new(vec![Interactor::new("VCP")])).await
/// });
///
/// let outcome = coordinator.run().await;
/// worker.await??;
/// assert_eq!(outcome.fragments, 1);
/// # Ok(())
/// # }
/// ```
pub struct FragmentCoordinator {
    engine: MergeEngine,
    document: PayloadDocument,
    rx: mpsc::Receiver<PayloadUpdate>,
}

impl FragmentCoordinator {
    /// Create a coordinator and the first sender handle
    pub fn new(engine: MergeEngine, document: PayloadDocument) -> (Self, FragmentSender) {
        let capacity = engine.config().channel_capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                engine,
                document,
                rx,
            },
            FragmentSender { tx },
        )
    }

    /// Apply fragments in arrival order until every sender is dropped
    pub async fn run(mut self) -> CoordinatorOutcome {
        let mut report = MergeReport::default();
        let mut fragments = 0;

        tracing::debug!("Fragment coordinator started for {}", self.document.main());

        while let Some(update) = self.rx.recv().await {
            let fragment_report = self.engine.merge_in_place(&mut self.document, &update);
            report.absorb(&fragment_report);
            fragments += 1;
        }

        tracing::info!(
            "Applied {} fragment(s): {} added, {} updated",
            fragments,
            report.added,
            report.updated
        );

        CoordinatorOutcome {
            document: self.document,
            report,
            fragments,
        }
    }
}
