//! Tracing with file-based OTLP export.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK (simple processor)
//!                                           → FileSpanExporter → tabsift-otlp.json
//! ```
//!
//! Every batch is written as one OTLP JSON line. The file rotates at 10 MiB
//! and the three newest rotated files are kept.
//!
//! Worker messages carry a [`crate::worker::TraceContext`] so spans opened by
//! the worker join the trace of the event that posted them.

mod exporter;
mod init;
mod otlp;
mod rotating;

pub use init::{init_tracing, SERVICE_NAME};
