//! Worker request and response types.
//!
//! Requests are built on the event-handling side and carry the caller's
//! trace context, so the worker's span for a request joins the trace of the
//! event that caused it even though it runs on another task.

use crate::domain::{Context, Item};
use crate::settings::BookmarkForm;
use serde::{Deserialize, Serialize};

/// Trace and span id of the span that posted a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the context of the current `tracing` span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// context is invalid.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds a remote OpenTelemetry parent context.
    ///
    /// Returns `None` if either id is not valid hex.
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_items(FetchItems { context: Context }),
    open_url(OpenUrl { url: String, browser: String }),
    switch_to_tab(SwitchToTab { id: String, browser: String }),
    close_tab(CloseTab { id: String }),
    delete_bookmark(DeleteBookmark { id: String }),
    copy_to_clipboard(CopyToClipboard { text: String }),
    create_bookmark(CreateBookmark { form: BookmarkForm }),
    update_bookmark(UpdateBookmark { id: String, form: BookmarkForm }),
}

/// Requests from the event handler to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WorkerMessage {
    /// Load every item of a context from the item source.
    FetchItems {
        context: Context,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Open a URL in the configured browser.
    OpenUrl {
        url: String,
        browser: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Focus a tab by composite id and raise the browser.
    SwitchToTab {
        id: String,
        browser: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Close a tab by composite id.
    CloseTab {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    DeleteBookmark {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    CopyToClipboard {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Bookmark a tab.
    CreateBookmark {
        form: BookmarkForm,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Edit an existing bookmark.
    UpdateBookmark {
        id: String,
        form: BookmarkForm,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Short operation name for logs and error responses.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::FetchItems { .. } => "fetch items",
            Self::OpenUrl { .. } => "open url",
            Self::SwitchToTab { .. } => "switch to tab",
            Self::CloseTab { .. } => "close tab",
            Self::DeleteBookmark { .. } => "delete bookmark",
            Self::CopyToClipboard { .. } => "copy to clipboard",
            Self::CreateBookmark { .. } => "create bookmark",
            Self::UpdateBookmark { .. } => "update bookmark",
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchItems { trace_context, .. }
            | Self::OpenUrl { trace_context, .. }
            | Self::SwitchToTab { trace_context, .. }
            | Self::CloseTab { trace_context, .. }
            | Self::DeleteBookmark { trace_context, .. }
            | Self::CopyToClipboard { trace_context, .. }
            | Self::CreateBookmark { trace_context, .. }
            | Self::UpdateBookmark { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Completions sent back from the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WorkerResponse {
    /// Items of `context` were fetched.
    ItemsLoaded {
        context: Context,
        items: Vec<Item>,
        /// Wall time of the fetch in milliseconds.
        elapsed_ms: u64,
    },

    UrlOpened { url: String },

    TabSwitched { id: String },

    TabClosed { id: String },

    BookmarkDeleted { id: String },

    Copied,

    /// A bookmark was created (`id` is `None`) or updated.
    BookmarkSaved { id: Option<String> },

    /// The request failed; the session keeps running.
    Error {
        operation: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_without_subscriber_have_no_trace_context() {
        let message = WorkerMessage::close_tab("1:2".to_string());
        assert_eq!(message.trace_context(), None);
        assert_eq!(message.operation(), "close tab");
    }

    #[test]
    fn trace_context_round_trips_through_otel() {
        use opentelemetry::trace::TraceContextExt;

        let trace_context = TraceContext {
            trace_id: "0af7651916cd43dd8448eb211c80319c".to_string(),
            parent_span_id: "b7ad6b7169203331".to_string(),
        };
        let cx = trace_context.to_otel_context().unwrap();
        let span = cx.span();
        let span_context = span.span_context();

        assert!(span_context.is_remote());
        assert_eq!(format!("{:016x}", span_context.span_id()), "b7ad6b7169203331");
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let trace_context = TraceContext {
            trace_id: "nope".to_string(),
            parent_span_id: "b7ad6b7169203331".to_string(),
        };
        assert!(trace_context.to_otel_context().is_none());
    }
}
