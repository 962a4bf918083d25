//! BoardSession: ties an item source, the board view and an item sink together
//!
//! The session owns the source subscription for its whole lifetime. A
//! background task regroups the board on every snapshot. Moves are applied
//! synchronously and answered on the caller's stack, while the change set is
//! handed to the sink in the background.

use crate::allocate::PositionAllocator;
use crate::config::OrderConfig;
use crate::error::{OrderError, Result};
use crate::sink::ItemSink;
use crate::source::ItemSource;
use crate::types::{Board, Item, MoveEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

/// Live board driven by an item source.
///
/// # Example
///
/// ```ignore
/// let source = MemorySource::default();
/// let sink = Arc::new(MemorySink::new());
/// let mut session = BoardSession::start(&source, sink, &OrderConfig::default());
///
/// source.publish(items);
/// session.wait_for_generation(1).await?;
///
/// let changed = session.handle_move(&MoveEvent::new("todo", "done", 0, 0))?;
/// session.shutdown().await?;
/// ```
pub struct BoardSession {
    board: Arc<Mutex<Board>>,
    allocator: PositionAllocator,
    sink: Arc<dyn ItemSink>,
    cancel: CancellationToken,
    refresh_task: Option<JoinHandle<()>>,
    generation: watch::Receiver<u64>,
    pending: JoinSet<Result<()>>,
    first_failure: Option<OrderError>,
}

impl BoardSession {
    /// Subscribe to `source` and start keeping the board current.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S>(source: &S, sink: Arc<dyn ItemSink>, config: &OrderConfig) -> Self
    where
        S: ItemSource + ?Sized,
    {
        let receiver = source.subscribe();
        let board = Arc::new(Mutex::new(Board::group(
            Vec::new(),
            config.group_by.clone(),
        )));
        let (generation_tx, generation) = watch::channel(0);
        let cancel = CancellationToken::new();

        let refresh_task = tokio::spawn(refresh_loop(
            receiver,
            Arc::clone(&board),
            generation_tx,
            cancel.clone(),
        ));
        info!(group_by = %config.group_by, "board session started");

        Self {
            board,
            allocator: config.allocator(),
            sink,
            cancel,
            refresh_task: Some(refresh_task),
            generation,
            pending: JoinSet::new(),
            first_failure: None,
        }
    }

    /// Snapshot of the current board
    pub fn board(&self) -> Board {
        self.lock_board().clone()
    }

    /// Number of snapshots applied so far
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Wait until at least `generation` snapshots have been applied.
    ///
    /// Fails with [`OrderError::SourceClosed`] if the source stops before
    /// that happens.
    pub async fn wait_for_generation(&mut self, generation: u64) -> Result<u64> {
        let reached = self
            .generation
            .wait_for(|current| *current >= generation)
            .await
            .map_err(|_| OrderError::SourceClosed)?;
        Ok(*reached)
    }

    /// The attribute lists are currently keyed by
    pub fn group_by(&self) -> String {
        self.lock_board().group_by().to_string()
    }

    /// Regroup the board under a different attribute.
    ///
    /// Later snapshots are grouped under the new attribute too.
    pub fn set_group_by(&self, attribute: impl Into<String>) {
        let attribute = attribute.into();
        let mut board = self.lock_board();
        board.regroup(attribute.clone());
        board.sort_by_position();
        info!(group_by = %attribute, lists = board.len(), "board regrouped");
    }

    /// Apply a move and hand the change set to the sink.
    ///
    /// Returns the changed items immediately. Persisting happens in the
    /// background; use [`BoardSession::flush`] to observe its outcome.
    pub fn handle_move(&mut self, event: &MoveEvent) -> Result<Vec<Item>> {
        let changed = self
            .lock_board()
            .apply_move(event, &self.allocator)?
            .into_changed();

        if changed.is_empty() {
            return Ok(changed);
        }

        while let Some(joined) = self.pending.try_join_next() {
            self.record_persist(joined);
        }

        debug!(count = changed.len(), "handing change set to sink");
        let sink = Arc::clone(&self.sink);
        let batch = changed.clone();
        self.pending.spawn(
            async move {
                let count = batch.len();
                let result = sink.persist(batch).await;
                if let Err(e) = &result {
                    error!(count, "failed to persist change set: {}", e);
                }
                result
            }
            .in_current_span(),
        );

        Ok(changed)
    }

    /// Wait for every pending persist, returning the first failure since the
    /// last flush
    pub async fn flush(&mut self) -> Result<()> {
        while let Some(joined) = self.pending.join_next().await {
            self.record_persist(joined);
        }
        self.first_failure.take().map_or(Ok(()), Err)
    }

    /// Number of persists not yet collected
    pub fn pending_persists(&self) -> usize {
        self.pending.len()
    }

    fn record_persist(&mut self, joined: std::result::Result<Result<()>, JoinError>) {
        let result = joined.unwrap_or_else(|e| {
            error!("persist task failed: {}", e);
            Err(OrderError::sink(0, e.to_string()))
        });
        if let Err(e) = result {
            self.first_failure.get_or_insert(e);
        }
    }

    /// Release the source subscription and flush pending persists
    pub async fn shutdown(&mut self) -> Result<()> {
        self.cancel.cancel();
        if let Some(handle) = self.refresh_task.take() {
            if let Err(e) = handle.await {
                warn!("refresh task ended abnormally: {}", e);
            }
        }
        info!("board session stopped");
        self.flush().await
    }

    /// Check if the refresh task is still consuming the source
    pub fn is_running(&self) -> bool {
        self.refresh_task
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock_board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for BoardSession {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.refresh_task.take() {
            handle.abort();
        }
        // Persists outlive the session; they still log their own failures
        if !self.pending.is_empty() {
            debug!(
                count = self.pending.len(),
                "session dropped with persists in flight"
            );
            self.pending.detach_all();
        }
    }
}

/// Regroup the board for every snapshot until cancelled or the source closes
async fn refresh_loop(
    mut receiver: broadcast::Receiver<Vec<Item>>,
    board: Arc<Mutex<Board>>,
    generation: watch::Sender<u64>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("refresh task cancelled");
                break;
            }
            received = receiver.recv() => {
                match received {
                    Ok(items) => {
                        let count = items.len();
                        let lists = {
                            let mut board = board.lock().unwrap_or_else(PoisonError::into_inner);
                            let mut refreshed = Board::group(items, board.group_by().to_string());
                            refreshed.sort_by_position();
                            *board = refreshed;
                            board.len()
                        };
                        generation.send_modify(|g| *g += 1);
                        info!(items = count, lists, "board refreshed");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "skipped superseded snapshots");
                    }
                    Err(RecvError::Closed) => {
                        info!("item source closed");
                        break;
                    }
                }
            }
        }
    }
}
