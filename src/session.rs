//! Async orchestration of the AI actions
//!
//! Each action snapshots what it needs from the designer, releases the
//! borrow, awaits the bridge and only then writes the result back. Pointer
//! input therefore keeps working on the current layout while a request is
//! outstanding. Requests are not queued or cancelled: whichever response
//! arrives last is applied.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use tracing::{info, warn};

use crate::bridge::{BridgeError, LayoutBridge, RenderRequest};
use crate::designer::VenueDesigner;
use crate::notify::Toast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpStatus {
    #[default]
    Idle,
    Running,
    Error,
}

#[derive(Debug, Default)]
struct OpState {
    status: OpStatus,
    error: Option<String>,
    /// Runs started and not yet finished
    running: usize,
}

/// Busy flag plus last error for the AI actions.
///
/// Clones share the same state, so the host can keep a handle to drive a
/// spinner and disable buttons while [`AsyncOp::run`] is pending. Runs may
/// overlap: the operation stays busy until the last of them settles.
#[derive(Debug, Clone, Default)]
pub struct AsyncOp {
    state: Rc<RefCell<OpState>>,
}

impl AsyncOp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> OpStatus {
        self.state.borrow().status
    }

    /// Message of the last failure, until cleared or a new run starts
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.status() == OpStatus::Running
    }

    pub fn clear_error(&self) {
        let mut state = self.state.borrow_mut();
        state.error = None;
        if state.status == OpStatus::Error {
            state.status = OpStatus::Idle;
        }
    }

    fn start(&self) -> InFlight<'_> {
        let mut state = self.state.borrow_mut();
        state.running += 1;
        state.status = OpStatus::Running;
        state.error = None;
        InFlight {
            op: self,
            failure: None,
        }
    }

    fn finish(&self, failure: Option<String>) {
        let mut state = self.state.borrow_mut();
        state.running = state.running.saturating_sub(1);
        if failure.is_some() {
            state.error = failure;
        }
        state.status = if state.running > 0 {
            OpStatus::Running
        } else if state.error.is_some() {
            OpStatus::Error
        } else {
            OpStatus::Idle
        };
    }

    /// Await `task`, marking the operation running meanwhile and recording a failure.
    ///
    /// Dropping the returned future before it completes counts as a silent finish.
    pub async fn run<T, F>(&self, task: F) -> Result<T, BridgeError>
    where
        F: Future<Output = Result<T, BridgeError>>,
    {
        let mut in_flight = self.start();
        let result = task.await;
        if let Err(err) = &result {
            in_flight.failure = Some(err.user_message());
        }
        result
    }
}

/// One pending [`AsyncOp::run`]; settles the operation when dropped
struct InFlight<'a> {
    op: &'a AsyncOp,
    failure: Option<String>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.op.finish(self.failure.take());
    }
}

/// Report a failed action as an error toast and pass the error on
fn report(designer: &RefCell<VenueDesigner>, action: &str, err: BridgeError) -> BridgeError {
    warn!(%err, action, "AI action failed");
    designer.borrow().notify(Toast::error(err.user_message()));
    err
}

/// Generate a layout from the current prompt (and venue photo, if any) and replace the canvas
pub async fn generate_layout(
    designer: &RefCell<VenueDesigner>,
    bridge: &dyn LayoutBridge,
) -> Result<(), BridgeError> {
    let (request, op) = {
        let d = designer.borrow();
        (d.layout_request(), d.busy().clone())
    };
    let from_photo = request.reference_photo.is_some();
    op.clear_error();

    match op.run(bridge.request_layout(&request)).await {
        Ok(layout) => {
            info!(items = layout.len(), from_photo, "applying generated layout");
            let mut d = designer.borrow_mut();
            d.replace_layout(layout);
            d.notify(Toast::success(if from_photo {
                "Layout generated from the venue photo."
            } else {
                "Layout generated."
            }));
            Ok(())
        }
        Err(err) => Err(report(designer, "generate layout", err)),
    }
}

/// Generate an ambience background; it replaces any venue photo
pub async fn generate_ambience(
    designer: &RefCell<VenueDesigner>,
    bridge: &dyn LayoutBridge,
) -> Result<(), BridgeError> {
    let (description, op) = {
        let d = designer.borrow();
        (d.ambience_prompt().to_string(), d.busy().clone())
    };
    op.clear_error();

    match op.run(bridge.request_ambience(&description)).await {
        Ok(url) => {
            let mut d = designer.borrow_mut();
            d.set_ambience(url);
            d.notify(Toast::success("Ambience generated."));
            Ok(())
        }
        Err(err) => Err(report(designer, "generate ambience", err)),
    }
}

/// Compose the layout into the venue photo and show the result as a preview
pub async fn render_realistic_view(
    designer: &RefCell<VenueDesigner>,
    bridge: &dyn LayoutBridge,
) -> Result<(), BridgeError> {
    let (request, op) = {
        let d = designer.borrow();
        let photo = d.reference_photo().cloned();
        match photo {
            Some(photo) if !d.layout().is_empty() => (
                RenderRequest {
                    reference_photo: photo,
                    layout: d.layout().clone(),
                    ambience: d.ambience_prompt().to_string(),
                },
                d.busy().clone(),
            ),
            _ => {
                let err = BridgeError::Precondition(
                    "A venue photo and a layout are needed for the realistic view.".to_string(),
                );
                d.notify(Toast::error(err.user_message()));
                return Err(err);
            }
        }
    };
    op.clear_error();

    match op.run(bridge.request_photorealistic_render(&request)).await {
        Ok(url) => {
            let mut d = designer.borrow_mut();
            d.set_preview_url(url);
            d.notify(Toast::success("Realistic view rendered."));
            Ok(())
        }
        Err(err) => Err(report(designer, "render realistic view", err)),
    }
}

/// Clean up the dictated layout prompt in place. An empty prompt is left alone.
pub async fn correct_prompt(
    designer: &RefCell<VenueDesigner>,
    bridge: &dyn LayoutBridge,
) -> Result<(), BridgeError> {
    let (text, op) = {
        let d = designer.borrow();
        (d.layout_prompt().to_string(), d.busy().clone())
    };
    if text.trim().is_empty() {
        return Ok(());
    }

    match op.run(bridge.correct_text(&text)).await {
        Ok(corrected) => {
            if !corrected.trim().is_empty() {
                let mut d = designer.borrow_mut();
                d.set_layout_prompt(corrected);
                d.notify(Toast::success("Text corrected."));
            }
            Ok(())
        }
        Err(err) => Err(report(designer, "correct text", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    type Reply = Result<(), BridgeError>;

    /// Spawn one run per receiver; each settles with whatever its sender sends
    fn spawn_runs(pool: &LocalPool, op: &AsyncOp, replies: Vec<oneshot::Receiver<Reply>>) {
        for reply in replies {
            let op = op.clone();
            pool.spawner()
                .spawn_local(async move {
                    let _ = op.run(async move { reply.await.unwrap_or(Ok(())) }).await;
                })
                .unwrap();
        }
    }

    #[test]
    fn test_run_success() {
        let op = AsyncOp::new();
        let value = block_on(op.run(async { Ok::<_, BridgeError>(7) })).unwrap();
        assert_eq!(value, 7);
        assert_eq!(op.status(), OpStatus::Idle);
        assert_eq!(op.error(), None);
    }

    #[test]
    fn test_run_failure_records_message() {
        let op = AsyncOp::new();
        let handle = op.clone();
        let result = block_on(op.run(async { Err::<(), _>(BridgeError::empty("nothing")) }));
        assert!(result.is_err());
        assert_eq!(handle.status(), OpStatus::Error);
        assert_eq!(handle.error().as_deref(), Some("The AI returned no result."));
        handle.clear_error();
        assert_eq!(op.status(), OpStatus::Idle);
        assert_eq!(op.error(), None);
    }

    #[test]
    fn test_busy_while_pending() {
        let op = AsyncOp::new();
        let observer = op.clone();
        let result = block_on(op.run(async move {
            assert!(observer.is_busy());
            Ok::<_, BridgeError>(())
        }));
        assert!(result.is_ok());
        assert!(!op.is_busy());
    }

    #[test]
    fn test_overlapping_runs_stay_busy_until_the_last_settles() {
        let op = AsyncOp::new();
        let mut pool = LocalPool::new();
        let (first, first_reply) = oneshot::channel::<Reply>();
        let (second, second_reply) = oneshot::channel::<Reply>();
        spawn_runs(&pool, &op, vec![first_reply, second_reply]);

        pool.run_until_stalled();
        assert!(op.is_busy());

        first.send(Ok(())).unwrap();
        pool.run_until_stalled();
        assert!(op.is_busy());

        second.send(Ok(())).unwrap();
        pool.run_until_stalled();
        assert_eq!(op.status(), OpStatus::Idle);
    }

    #[test]
    fn test_failure_during_overlap_surfaces_when_all_settle() {
        let op = AsyncOp::new();
        let mut pool = LocalPool::new();
        let (first, first_reply) = oneshot::channel::<Reply>();
        let (second, second_reply) = oneshot::channel::<Reply>();
        spawn_runs(&pool, &op, vec![first_reply, second_reply]);
        pool.run_until_stalled();

        first.send(Err(BridgeError::empty("layout"))).unwrap();
        pool.run_until_stalled();
        assert_eq!(op.status(), OpStatus::Running);
        assert_eq!(op.error().as_deref(), Some("The AI returned no result."));

        second.send(Ok(())).unwrap();
        pool.run_until_stalled();
        assert_eq!(op.status(), OpStatus::Error);
    }

    #[test]
    fn test_dropped_run_releases_busy() {
        let op = AsyncOp::new();
        let (_sender, reply) = oneshot::channel::<Reply>();
        {
            let mut pool = LocalPool::new();
            spawn_runs(&pool, &op, vec![reply]);
            pool.run_until_stalled();
            assert!(op.is_busy());
        }
        assert_eq!(op.status(), OpStatus::Idle);
    }
}
