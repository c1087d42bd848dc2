use super::{display_text, Pipeline};
use crate::capture::{CaptureRegion, ScreenCapture};
use crate::ocr::TextRecognizer;
use crate::translate::Translator;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A finished run's text, tagged with the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineUpdate {
    pub run_id: u64,
    pub text: String,
}

/// Receiving end of a worker's result channel.
pub type UpdateReceiver = mpsc::UnboundedReceiver<PipelineUpdate>;

struct ActiveRun {
    id: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs at most one pipeline at a time.
///
/// Starting a run cancels the previous one and waits for it to wind down
/// (its subprocesses are killed) before the new run begins.
pub struct PipelineWorker<C, R, T> {
    pipeline: Arc<Pipeline<C, R, T>>,
    active: Mutex<Option<ActiveRun>>,
    next_id: AtomicU64,
    latest: AtomicU64,
    updates: mpsc::UnboundedSender<PipelineUpdate>,
}

impl<C, R, T> PipelineWorker<C, R, T>
where
    C: ScreenCapture,
    R: TextRecognizer,
    T: Translator,
{
    /// The receiver must be drained by the task that owns the output area.
    pub fn new(pipeline: Pipeline<C, R, T>) -> (Self, UpdateReceiver) {
        let (updates, rx) = mpsc::unbounded_channel();
        let worker = Self {
            pipeline: Arc::new(pipeline),
            active: Mutex::new(None),
            next_id: AtomicU64::new(0),
            latest: AtomicU64::new(0),
            updates,
        };
        (worker, rx)
    }

    /// Cancel and join any active run, then start a new one.
    pub async fn start(&self, region: CaptureRegion) -> u64 {
        let mut active = self.active.lock().await;

        if let Some(previous) = active.take() {
            stop(previous).await;
        }

        let run_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest.store(run_id, Ordering::SeqCst);

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let updates = self.updates.clone();

        log::info!("[PIPELINE] Run {} started", run_id);
        let handle = tokio::spawn(async move {
            let result = pipeline.run(region, &token).await;
            if token.is_cancelled() {
                log::info!("[PIPELINE] Run {} cancelled", run_id);
                return;
            }
            if let Err(e) = &result {
                log::error!("[PIPELINE] Run {} failed: {}", run_id, e);
            }
            if let Some(text) = display_text(result) {
                // Receiver gone means the app is shutting down.
                let _ = updates.send(PipelineUpdate { run_id, text });
            }
        });

        *active = Some(ActiveRun {
            id: run_id,
            cancel,
            handle,
        });
        run_id
    }

    /// Whether `run_id` is the most recently started run.
    pub fn is_current(&self, run_id: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == run_id
    }

    /// Cancel and join the active run, if any.
    pub async fn shutdown(&self) {
        if let Some(run) = self.active.lock().await.take() {
            stop(run).await;
        }
    }
}

async fn stop(run: ActiveRun) {
    if run.handle.is_finished() {
        return;
    }
    run.cancel.cancel();
    match run.handle.await {
        Ok(()) => log::info!("[PIPELINE] Run {} stopped", run.id),
        Err(e) => log::warn!("[PIPELINE] Run {} ended abnormally: {}", run.id, e),
    }
}
