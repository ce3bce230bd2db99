//! Asynchronous execution of item fetches and item actions.
//!
//! The event handler never awaits a collaborator. It returns
//! `Action::PostToWorker(request)`; the driver hands the request to the
//! worker, which runs it on its own task and sends a [`WorkerResponse`]
//! back, fed into the handler as `Event::WorkerResponse`.
//!
//! # Architecture
//!
//! - `messages`: request/response types with trace context propagation
//! - `handler`: [`ItemWorker`] and its request loop

pub mod handler;
pub mod messages;

pub use handler::{ItemWorker, WorkerHandle};
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
