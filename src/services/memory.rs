//! In-process collaborators.
//!
//! [`StaticItems`] serves fixed item lists; [`RecordingActions`] records
//! every action instead of performing it. Both can be told to fail, which
//! is how the failure paths of the worker and dispatcher are exercised.

use super::{ActionService, ItemSource};
use crate::domain::{Context, Item, Result, TabsiftError};
use crate::settings::BookmarkForm;
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Item source backed by a map of context to items.
#[derive(Debug, Default)]
pub struct StaticItems {
    items: HashMap<Context, Vec<Item>>,
    failure: Option<String>,
}

impl StaticItems {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, context: Context, items: Vec<Item>) -> Self {
        self.items.insert(context, items);
        self
    }

    /// Every fetch fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            items: HashMap::new(),
            failure: Some(message.into()),
        }
    }
}

impl ItemSource for StaticItems {
    fn fetch(&self, context: Context) -> BoxFuture<'_, Result<Vec<Item>>> {
        let result = match &self.failure {
            Some(message) => Err(TabsiftError::ItemSource(message.clone())),
            None => Ok(self.items.get(&context).cloned().unwrap_or_default()),
        };
        Box::pin(std::future::ready(result))
    }
}

/// One call made to [`RecordingActions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAction {
    OpenUrl { url: String, browser: String },
    SwitchToItem { id: String, browser: String },
    CloseItem { id: String },
    DeleteBookmark { id: String },
    CopyToClipboard { text: String },
    CreateBookmark { form: BookmarkForm },
    UpdateBookmark { id: String, form: BookmarkForm },
}

/// Action service that only records calls.
#[derive(Debug, Default)]
pub struct RecordingActions {
    calls: Mutex<Vec<RecordedAction>>,
    failure: Option<String>,
}

impl RecordingActions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls, then fails each with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedAction> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: RecordedAction) -> BoxFuture<'static, Result<()>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        let result = match &self.failure {
            Some(message) => Err(TabsiftError::Action(message.clone())),
            None => Ok(()),
        };
        Box::pin(std::future::ready(result))
    }
}

impl ActionService for RecordingActions {
    fn open_url<'a>(&'a self, url: &'a str, browser: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(RecordedAction::OpenUrl {
            url: url.to_string(),
            browser: browser.to_string(),
        })
    }

    fn switch_to_item<'a>(&'a self, composite_id: &'a str, browser: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(RecordedAction::SwitchToItem {
            id: composite_id.to_string(),
            browser: browser.to_string(),
        })
    }

    fn close_item<'a>(&'a self, composite_id: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(RecordedAction::CloseItem {
            id: composite_id.to_string(),
        })
    }

    fn delete_bookmark<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(RecordedAction::DeleteBookmark { id: id.to_string() })
    }

    fn copy_to_clipboard<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(RecordedAction::CopyToClipboard {
            text: text.to_string(),
        })
    }

    fn create_bookmark<'a>(&'a self, form: &'a BookmarkForm) -> BoxFuture<'a, Result<()>> {
        self.record(RecordedAction::CreateBookmark { form: form.clone() })
    }

    fn update_bookmark<'a>(&'a self, id: &'a str, form: &'a BookmarkForm) -> BoxFuture<'a, Result<()>> {
        self.record(RecordedAction::UpdateBookmark {
            id: id.to_string(),
            form: form.clone(),
        })
    }
}
