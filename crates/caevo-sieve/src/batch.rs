//! Parallel corpus driver

use crate::pipeline::SievePipeline;
use crate::stats::PipelineMetrics;
use crate::{ErrorPolicy, PipelineConfig, PipelineError};
use caevo_domain::Document;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// A document the batch gave up on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Document name
    pub document: String,
    /// Why it failed
    pub reason: String,
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Annotated documents, in input order
    pub documents: Vec<Document>,

    /// Documents skipped after a failure
    pub failures: Vec<BatchFailure>,

    /// Counters merged across documents
    pub metrics: PipelineMetrics,

    /// True when shutdown stopped the batch early
    pub cancelled: bool,
}

struct Finished {
    position: usize,
    document: Document,
    result: Result<PipelineMetrics, PipelineError>,
}

/// Runs a pipeline over many documents at once
///
/// Documents are independent, so each runs on the blocking pool with its own
/// link graph. A semaphore bounds how many run together.
///
/// # Examples
///
/// ```
/// use caevo_sieve::{BatchRunner, PipelineConfig, SievePipeline, SieveRegistry};
/// use caevo_domain::Document;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PipelineConfig::default();
/// let pipeline = SievePipeline::from_config(&config, &SieveRegistry::new())?;
/// let runner = BatchRunner::new(pipeline, &config);
///
/// let result = runner.run(vec![Document::new("a", 1), Document::new("b", 1)]).await?;
/// assert_eq!(result.documents.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    pipeline: Arc<SievePipeline>,
    concurrency: usize,
    policy: ErrorPolicy,
}

impl BatchRunner {
    /// Runner using the batch settings of `config`
    pub fn new(pipeline: SievePipeline, config: &PipelineConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            concurrency: config.concurrency.max(1),
            policy: config.error_policy,
        }
    }

    /// Override the failure policy
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process every document
    pub async fn run(&self, docs: Vec<Document>) -> Result<BatchResult, PipelineError> {
        self.run_until(docs, std::future::pending::<()>()).await
    }

    /// Process documents until `shutdown` completes
    ///
    /// On shutdown, documents still running are discarded and the result is
    /// marked cancelled.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::AbortAll`] the first failed document ends the
    /// batch with its error.
    pub async fn run_until<F>(&self, docs: Vec<Document>, shutdown: F) -> Result<BatchResult, PipelineError>
    where
        F: Future,
    {
        let total = docs.len();
        info!(documents = total, concurrency = self.concurrency, "Batch started");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        for (position, mut doc) in docs.into_iter().enumerate() {
            let pipeline = Arc::clone(&self.pipeline);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::Worker(e.to_string()))?;
                let name = doc.name.clone();
                tokio::task::spawn_blocking(move || {
                    let result = pipeline.annotate(&mut doc);
                    Finished {
                        position,
                        document: doc,
                        result,
                    }
                })
                .await
                .map_err(|e| PipelineError::Worker(format!("{name}: {e}")))
            });
        }

        let mut slots: Vec<Option<Document>> = (0..total).map(|_| None).collect();
        let mut outcome = BatchResult::default();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                joined = tasks.join_next() => {
                    let Some(joined) = joined else { break };
                    let finished = joined
                        .map_err(|e| PipelineError::Worker(e.to_string()))
                        .and_then(|task| task);
                    match finished {
                        Ok(Finished { position, document, result: Ok(metrics) }) => {
                            outcome.metrics.merge(&metrics);
                            slots[position] = Some(document);
                        }
                        Ok(Finished { document, result: Err(e), .. }) => {
                            self.on_failure(&mut outcome, document.name, e)?;
                        }
                        Err(e) => {
                            self.on_failure(&mut outcome, "unknown".to_string(), e)?;
                        }
                    }
                }
                _ = &mut shutdown => {
                    warn!(pending = tasks.len(), "Shutdown requested, discarding unfinished documents");
                    tasks.abort_all();
                    outcome.cancelled = true;
                    break;
                }
            }
        }

        outcome.documents = slots.into_iter().flatten().collect();
        info!(
            completed = outcome.documents.len(),
            failed = outcome.failures.len(),
            cancelled = outcome.cancelled,
            "Batch finished"
        );
        Ok(outcome)
    }

    fn on_failure(&self, outcome: &mut BatchResult, document: String, error: PipelineError) -> Result<(), PipelineError> {
        match self.policy {
            ErrorPolicy::AbortAll => Err(match error {
                PipelineError::Document { .. } => error,
                other => PipelineError::Document {
                    document,
                    reason: other.to_string(),
                },
            }),
            ErrorPolicy::SkipDocument => {
                warn!(document = %document, error = %error, "Document failed, skipping");
                outcome.failures.push(BatchFailure {
                    document,
                    reason: error.to_string(),
                });
                outcome.metrics.record_failure();
                Ok(())
            }
        }
    }
}
