//! Single-owner tokio task that drives an [`Engine`].
//!
//! The task owns the engine outright. Callers talk to it through a cloneable
//! [`EngineHandle`]: commands travel over an mpsc queue and are applied in
//! arrival order, the latest snapshot is published on a `watch` channel, and
//! transition events fan out over `broadcast`. Only the task holds a strong
//! event sender, so subscribers see `Closed` once it stops.
//!
//! Between commands the task sleeps until the engine's next deadline, so
//! every timer lives inside this one task and dies with it.

use std::time::Instant;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time;

use synaptic_types::{EmotionalState, EngineSettings, EngineSnapshot, ModuleId};

use crate::{DrawSource, EVENT_QUEUE_CAPACITY, Engine, EngineCommand, EngineEvent};

const COMMAND_QUEUE_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("engine task is no longer running")]
    Closed,
}

#[derive(Debug)]
enum Request {
    Apply {
        command: EngineCommand,
        reply: oneshot::Sender<EngineSnapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<EngineSnapshot>,
    },
}

/// Engine clock. Goes through tokio so paused test time applies.
fn now() -> Instant {
    time::Instant::now().into_std()
}

// ============================================================================
// EngineRuntime - owns the task
// ============================================================================

/// Guard for the engine task. Dropping it aborts the task.
#[derive(Debug)]
pub struct EngineRuntime {
    handle: EngineHandle,
    task: Option<JoinHandle<()>>,
}

impl EngineRuntime {
    /// Start the engine task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(settings: &EngineSettings, draws: Box<dyn DrawSource>) -> Self {
        let engine = Engine::new(settings, draws, now());
        Self::start(engine)
    }

    /// Like [`EngineRuntime::spawn`], drawing from the configured seed.
    #[must_use]
    pub fn from_settings(settings: &EngineSettings) -> Self {
        let engine = Engine::from_settings(settings, now());
        Self::start(engine)
    }

    fn start(engine: Engine) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot(now()));
        let (events_tx, _) = broadcast::channel(EVENT_QUEUE_CAPACITY);

        let events = events_tx.downgrade();

        let task = tokio::spawn(run(engine, commands_rx, snapshot_tx, events_tx));
        Self {
            handle: EngineHandle {
                commands: commands_tx,
                snapshots: snapshot_rx,
                events,
            },
            task: Some(task),
        }
    }

    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Abort the task and wait until it is gone. No state changes afterwards.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        tracing::debug!("Engine runtime shut down");
    }
}

impl Drop for EngineRuntime {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    mut engine: Engine,
    mut commands: mpsc::Receiver<Request>,
    snapshots: watch::Sender<EngineSnapshot>,
    events: broadcast::Sender<EngineEvent>,
) {
    loop {
        let deadline = time::Instant::from_std(engine.next_deadline());
        tokio::select! {
            () = time::sleep_until(deadline) => {
                let now = now();
                engine.advance_clock(now);
                publish(&mut engine, now, &snapshots, &events);
            }
            request = commands.recv() => {
                let Some(request) = request else {
                    tracing::debug!("All engine handles dropped");
                    return;
                };
                let now = now();
                engine.advance_clock(now);
                let reply = match request {
                    Request::Apply { command, reply } => {
                        engine.apply(command, now);
                        reply
                    }
                    Request::Snapshot { reply } => reply,
                };
                let snapshot = publish(&mut engine, now, &snapshots, &events);
                // The caller may have stopped waiting.
                let _ = reply.send(snapshot);
            }
        }
    }
}

fn publish(
    engine: &mut Engine,
    now: Instant,
    snapshots: &watch::Sender<EngineSnapshot>,
    events: &broadcast::Sender<EngineEvent>,
) -> EngineSnapshot {
    for event in engine.drain_events() {
        tracing::trace!(event = %event.format(), "Publishing event");
        // No subscribers is not an error.
        let _ = events.send(event);
    }
    let snapshot = engine.snapshot(now);
    snapshots.send_if_modified(|current| {
        if *current == snapshot {
            false
        } else {
            *current = snapshot.clone();
            true
        }
    });
    snapshot
}

// ============================================================================
// EngineHandle - cloneable client
// ============================================================================

#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Request>,
    snapshots: watch::Receiver<EngineSnapshot>,
    events: broadcast::WeakSender<EngineEvent>,
}

impl EngineHandle {
    /// Queue `command` and wait for the snapshot taken right after it applied.
    pub async fn send(&self, command: EngineCommand) -> Result<EngineSnapshot, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request::Apply { command, reply })
            .await
            .map_err(|_| RuntimeError::Closed)?;
        response.await.map_err(|_| RuntimeError::Closed)
    }

    /// Snapshot with every timer caught up to the present.
    pub async fn snapshot(&self) -> Result<EngineSnapshot, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request::Snapshot { reply })
            .await
            .map_err(|_| RuntimeError::Closed)?;
        response.await.map_err(|_| RuntimeError::Closed)
    }

    /// Last published snapshot, without a round trip to the task.
    ///
    /// `highlight_progress` in it is only as fresh as the last publish.
    #[must_use]
    pub fn latest(&self) -> EngineSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes whenever a different snapshot is published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshots.clone()
    }

    /// Event receiver. Once the task is gone it reports `Closed` immediately.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        match self.events.upgrade() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    pub async fn record_interaction(
        &self,
        module: ModuleId,
    ) -> Result<EngineSnapshot, RuntimeError> {
        self.send(EngineCommand::Interact(module)).await
    }

    pub async fn interact(&self, raw: &str) -> Result<EngineSnapshot, RuntimeError> {
        self.record_interaction(ModuleId::new(raw)).await
    }

    pub async fn set_emotional_state(
        &self,
        state: EmotionalState,
    ) -> Result<EngineSnapshot, RuntimeError> {
        self.send(EngineCommand::SetEmotion(state)).await
    }

    pub async fn record_emotion_scan(
        &self,
        state: EmotionalState,
        intensity: f32,
    ) -> Result<EngineSnapshot, RuntimeError> {
        self.send(EngineCommand::ScanEmotion { state, intensity }).await
    }

    pub async fn advance_stage(&self) -> Result<EngineSnapshot, RuntimeError> {
        self.send(EngineCommand::AdvanceStage).await
    }

    pub async fn retreat_stage(&self) -> Result<EngineSnapshot, RuntimeError> {
        self.send(EngineCommand::RetreatStage).await
    }

    pub async fn finish_session(&self) -> Result<EngineSnapshot, RuntimeError> {
        self.send(EngineCommand::FinishSession).await
    }

    pub async fn start_new_session(&self) -> Result<EngineSnapshot, RuntimeError> {
        self.send(EngineCommand::StartNewSession).await
    }
}
