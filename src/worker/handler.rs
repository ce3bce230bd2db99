//! Request execution against the item source and action service.

use crate::domain::error::{Result, TabsiftError};
use crate::services::{ActionService, ItemSource};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Executes worker requests.
///
/// Cheap to clone; the collaborators are shared.
#[derive(Clone)]
pub struct ItemWorker {
    source: Arc<dyn ItemSource>,
    actions: Arc<dyn ActionService>,
}

impl ItemWorker {
    #[must_use]
    pub fn new(source: Arc<dyn ItemSource>, actions: Arc<dyn ActionService>) -> Self {
        Self { source, actions }
    }

    /// Turns a collaborator result into a response with consistent logging.
    fn handle_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "worker operation failed");
                WorkerResponse::Error {
                    operation: operation.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Runs one request to completion.
    ///
    /// The request's trace context, when present, becomes the remote parent
    /// of the `worker_handle_message` span. Failures are returned as
    /// [`WorkerResponse::Error`], never raised.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let operation = message.operation();
        let span = tracing::debug_span!("worker_handle_message", operation = operation);
        if let Some(parent) = message.trace_context().and_then(|tc| tc.to_otel_context()) {
            span.set_parent(parent);
        }

        self.dispatch(message).instrument(span).await
    }

    async fn dispatch(&self, message: WorkerMessage) -> WorkerResponse {
        let operation = message.operation();

        match message {
            WorkerMessage::FetchItems { context, .. } => {
                let started = Instant::now();
                let result = self.source.fetch(context).await;
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                Self::handle_result(operation, result, |items| {
                    tracing::debug!(context = ?context, item_count = items.len(), elapsed_ms, "items fetched");
                    WorkerResponse::ItemsLoaded {
                        context,
                        items,
                        elapsed_ms,
                    }
                })
            }

            WorkerMessage::OpenUrl { url, browser, .. } => {
                let result = self.actions.open_url(&url, &browser).await;
                Self::handle_result(operation, result, |()| WorkerResponse::UrlOpened { url })
            }

            WorkerMessage::SwitchToTab { id, browser, .. } => {
                let result = self.actions.switch_to_item(&id, &browser).await;
                Self::handle_result(operation, result, |()| WorkerResponse::TabSwitched { id })
            }

            WorkerMessage::CloseTab { id, .. } => {
                let result = self.actions.close_item(&id).await;
                Self::handle_result(operation, result, |()| WorkerResponse::TabClosed { id })
            }

            WorkerMessage::DeleteBookmark { id, .. } => {
                let result = self.actions.delete_bookmark(&id).await;
                Self::handle_result(operation, result, |()| WorkerResponse::BookmarkDeleted { id })
            }

            WorkerMessage::CopyToClipboard { text, .. } => {
                let result = self.actions.copy_to_clipboard(&text).await;
                Self::handle_result(operation, result, |()| WorkerResponse::Copied)
            }

            WorkerMessage::CreateBookmark { form, .. } => {
                let result = self.actions.create_bookmark(&form).await;
                Self::handle_result(operation, result, |()| WorkerResponse::BookmarkSaved { id: None })
            }

            WorkerMessage::UpdateBookmark { id, form, .. } => {
                let result = self.actions.update_bookmark(&id, &form).await;
                Self::handle_result(operation, result, |()| WorkerResponse::BookmarkSaved { id: Some(id) })
            }
        }
    }

    /// Starts the request loop on the current tokio runtime.
    ///
    /// Every request runs on its own task, so a slow fetch does not hold up
    /// an action posted after it. Responses arrive in completion order.
    #[must_use]
    pub fn spawn(self) -> WorkerHandle {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<WorkerMessage>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<WorkerResponse>();

        tokio::spawn(async move {
            while let Some(message) = request_rx.recv().await {
                let worker = self.clone();
                let response_tx = response_tx.clone();
                tokio::spawn(async move {
                    let response = worker.handle_message(message).await;
                    if response_tx.send(response).is_err() {
                        tracing::debug!("response receiver dropped");
                    }
                });
            }
            tracing::debug!("worker request channel closed");
        });

        WorkerHandle {
            requests: request_tx,
            responses: response_rx,
        }
    }
}

impl std::fmt::Debug for ItemWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemWorker").finish_non_exhaustive()
    }
}

/// Both ends of a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    requests: mpsc::UnboundedSender<WorkerMessage>,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
}

impl WorkerHandle {
    /// Queues a request.
    ///
    /// # Errors
    ///
    /// Returns [`TabsiftError::Worker`] if the worker loop has stopped.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        self.requests
            .send(message)
            .map_err(|e| TabsiftError::Worker(format!("worker stopped: {e}")))
    }

    /// Waits for the next response. `None` once the worker has stopped.
    pub async fn recv(&mut self) -> Option<WorkerResponse> {
        self.responses.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Context, Item, TabItem};
    use crate::services::{RecordedAction, RecordingActions, StaticItems};

    fn tab(id: &str) -> Item {
        Item::Tab(TabItem {
            id: id.to_string(),
            window_id: "1".to_string(),
            url: format!("https://{id}.test"),
            ..TabItem::default()
        })
    }

    #[tokio::test]
    async fn fetch_returns_items_of_the_context() {
        let source = StaticItems::new().with(Context::Tabs, vec![tab("a"), tab("b")]);
        let worker = ItemWorker::new(Arc::new(source), Arc::new(RecordingActions::new()));

        let response = worker.handle_message(WorkerMessage::fetch_items(Context::Tabs)).await;
        match response {
            WorkerResponse::ItemsLoaded { context, items, .. } => {
                assert_eq!(context, Context::Tabs);
                assert_eq!(items.len(), 2);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn source_failure_becomes_error_response() {
        let worker = ItemWorker::new(
            Arc::new(StaticItems::failing("bridge offline")),
            Arc::new(RecordingActions::new()),
        );

        let response = worker
            .handle_message(WorkerMessage::fetch_items(Context::History))
            .await;
        assert_eq!(
            response,
            WorkerResponse::Error {
                operation: "fetch items".to_string(),
                message: "Item source error: bridge offline".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn close_tab_calls_action_service() {
        let actions = Arc::new(RecordingActions::new());
        let worker = ItemWorker::new(Arc::new(StaticItems::new()), actions.clone());

        let response = worker
            .handle_message(WorkerMessage::close_tab("1:a".to_string()))
            .await;

        assert_eq!(response, WorkerResponse::TabClosed { id: "1:a".to_string() });
        assert_eq!(
            actions.calls(),
            vec![RecordedAction::CloseItem { id: "1:a".to_string() }]
        );
    }

    #[tokio::test]
    async fn spawned_worker_answers_requests() {
        let actions = Arc::new(RecordingActions::new());
        let mut handle = ItemWorker::new(Arc::new(StaticItems::new()), actions.clone()).spawn();

        handle
            .post(WorkerMessage::copy_to_clipboard("https://a.test".to_string()))
            .unwrap();

        assert_eq!(handle.recv().await, Some(WorkerResponse::Copied));
        assert_eq!(
            actions.calls(),
            vec![RecordedAction::CopyToClipboard {
                text: "https://a.test".to_string()
            }]
        );
    }
}
