//! Command-backed item source and action service.
//!
//! Items and tab/bookmark actions go through one external command (default
//! `mozeidon`) that talks to the browser extension. Listing subcommands
//! print one JSON chunk per line:
//!
//! ```text
//! {"data":[{"id":12,"windowId":1,"title":"…","url":"…","domain":"…"}]}
//! {"data":[…]}
//! ```
//!
//! Opening URLs and raising the browser use the platform launcher (`open -a`
//! on macOS, the browser binary elsewhere). Clipboard writes pipe the text
//! into a clipboard command.

use super::{ActionService, ItemSource};
use crate::domain::{BookmarkItem, Context, HistoryItem, Item, Result, TabItem, TabsiftError};
use crate::settings::{BookmarkForm, Platform};
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default name of the browser bridge command.
pub const DEFAULT_PROGRAM: &str = "mozeidon";

#[derive(Deserialize)]
struct Chunk<T> {
    data: Vec<T>,
}

/// Parses the stdout of a listing subcommand.
///
/// Blank lines are skipped; every other line must be a `{"data":[...]}`
/// chunk of the shape matching `context`. Recently closed tabs use the tab
/// shape. Contexts without a list yield no items.
///
/// # Errors
///
/// Returns [`TabsiftError::ItemSource`] naming the first malformed line.
///
/// # Example
///
/// ```rust
/// use tabsift::domain::Context;
/// use tabsift::services::parse_chunks;
///
/// let out = "{\"data\":[{\"id\":\"b1\",\"title\":\"Rust\",\"url\":\"https://rust-lang.org\",\"parent\":\"/dev/\"}]}\n";
/// let items = parse_chunks(Context::Bookmarks, out).unwrap();
/// assert_eq!(items[0].id(), "b1");
/// ```
pub fn parse_chunks(context: Context, stdout: &str) -> Result<Vec<Item>> {
    match context {
        Context::Tabs | Context::RecentlyClosed => parse_lines::<TabItem>(stdout, Item::Tab),
        Context::Bookmarks => parse_lines::<BookmarkItem>(stdout, Item::Bookmark),
        Context::History => parse_lines::<HistoryItem>(stdout, Item::History),
        Context::None | Context::Settings => Ok(Vec::new()),
    }
}

fn parse_lines<T: DeserializeOwned>(stdout: &str, wrap: fn(T) -> Item) -> Result<Vec<Item>> {
    let mut items = Vec::new();

    for (number, line) in stdout.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let chunk: Chunk<T> = serde_json::from_str(line).map_err(|e| {
            TabsiftError::ItemSource(format!("line {}: invalid chunk: {e}", number + 1))
        })?;
        items.extend(chunk.data.into_iter().map(wrap));
    }

    Ok(items)
}

/// Listing arguments per context.
const fn fetch_args(context: Context) -> Option<&'static [&'static str]> {
    match context {
        Context::Tabs => Some(&["tabs", "get"]),
        Context::RecentlyClosed => Some(&["tabs", "get", "--closed"]),
        Context::Bookmarks => Some(&["bookmarks"]),
        Context::History => Some(&["history"]),
        Context::None | Context::Settings => None,
    }
}

fn bookmark_args(form: &BookmarkForm) -> [&str; 6] {
    ["-t", &form.title, "-u", &form.url, "-f", &form.folder_path]
}

/// Runs the browser bridge and the platform launcher.
#[derive(Debug, Clone)]
pub struct CommandBridge {
    program: String,
    clipboard: Vec<String>,
    platform: Platform,
}

impl CommandBridge {
    /// Bridge invoking `program`, with the platform's default clipboard command.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        let platform = Platform::current();
        Self {
            program: program.into(),
            clipboard: default_clipboard(platform),
            platform,
        }
    }

    /// Replaces the clipboard command (program followed by its arguments).
    #[must_use]
    pub fn with_clipboard(mut self, command: Vec<String>) -> Self {
        self.clipboard = command;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn bridge(&self, args: &[&str]) -> Result<String> {
        run(&self.program, args).await.map_err(TabsiftError::Action)
    }

    async fn launch(&self, browser: &str, url: Option<&str>) -> Result<()> {
        let outcome = match (self.platform, url) {
            (Platform::MacOs, Some(url)) => run("open", &["-a", browser, url]).await,
            (Platform::MacOs, None) => run("open", &["-a", browser]).await,
            (Platform::Other, Some(url)) => run(browser, &[url]).await,
            // the bridge already focused the tab
            (Platform::Other, None) => return Ok(()),
        };
        outcome.map(drop).map_err(TabsiftError::Action)
    }
}

impl Default for CommandBridge {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

fn default_clipboard(platform: Platform) -> Vec<String> {
    match platform {
        Platform::MacOs => vec!["pbcopy".to_string()],
        Platform::Other => vec![
            "xclip".to_string(),
            "-selection".to_string(),
            "clipboard".to_string(),
        ],
    }
}

/// Runs `program args…` to completion and returns its stdout.
async fn run(program: &str, args: &[&str]) -> std::result::Result<String, String> {
    tracing::debug!(program = %program, args = ?args, "running command");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| format!("{program}: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{program} exited with {}: {}", output.status, stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Runs `command` with `input` written to its stdin.
async fn run_with_input(command: &[String], input: &str) -> std::result::Result<(), String> {
    let Some((program, args)) = command.split_first() else {
        return Err("no command configured".to_string());
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("{program}: {e}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .await
            .map_err(|e| format!("{program}: {e}"))?;
    }

    let status = child.wait().await.map_err(|e| format!("{program}: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{program} exited with {status}"))
    }
}

impl ItemSource for CommandBridge {
    fn fetch(&self, context: Context) -> BoxFuture<'_, Result<Vec<Item>>> {
        Box::pin(async move {
            let Some(args) = fetch_args(context) else {
                return Ok(Vec::new());
            };
            let stdout = run(&self.program, args)
                .await
                .map_err(TabsiftError::ItemSource)?;
            parse_chunks(context, &stdout)
        })
    }
}

impl ActionService for CommandBridge {
    fn open_url<'a>(&'a self, url: &'a str, browser: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.launch(browser, Some(url)))
    }

    fn switch_to_item<'a>(&'a self, composite_id: &'a str, browser: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.bridge(&["tabs", "switch", composite_id]).await?;
            self.launch(browser, None).await
        })
    }

    fn close_item<'a>(&'a self, composite_id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.bridge(&["tabs", "close", composite_id]).await.map(drop) })
    }

    fn delete_bookmark<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move { self.bridge(&["bookmark", "delete", id]).await.map(drop) })
    }

    fn copy_to_clipboard<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            run_with_input(&self.clipboard, text)
                .await
                .map_err(TabsiftError::Action)
        })
    }

    fn create_bookmark<'a>(&'a self, form: &'a BookmarkForm) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut args = vec!["bookmark", "new"];
            args.extend(bookmark_args(form));
            self.bridge(&args).await.map(drop)
        })
    }

    fn update_bookmark<'a>(&'a self, id: &'a str, form: &'a BookmarkForm) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut args = vec!["bookmark", "update", id];
            args.extend(bookmark_args(form));
            self.bridge(&args).await.map(drop)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_chunks_concatenate_in_order() {
        let out = concat!(
            r#"{"data":[{"id":1,"windowId":3,"title":"One","url":"https://one.test","domain":"one.test"}]}"#,
            "\n\n",
            r#"{"data":[{"id":2,"windowId":3,"title":"Two","url":"https://two.test","domain":"two.test"}]}"#,
            "\n",
        );

        let items = parse_chunks(Context::Tabs, out).unwrap();
        let ids: Vec<String> = items.iter().map(Item::action_id).collect();
        assert_eq!(ids, vec!["3:1", "3:2"]);
    }

    #[test]
    fn recently_closed_uses_tab_shape() {
        let out = r#"{"data":[{"id":7,"windowId":1,"title":"Gone","url":"https://gone.test"}]}"#;
        let items = parse_chunks(Context::RecentlyClosed, out).unwrap();
        assert!(matches!(&items[0], Item::Tab(tab) if tab.domain.is_empty()));
    }

    #[test]
    fn history_numbers_parse() {
        let out = r#"{"data":[{"id":"h1","title":"Docs","url":"https://docs.rs","t":1700000000000,"vc":4,"tc":1}]}"#;
        let items = parse_chunks(Context::History, out).unwrap();
        match &items[0] {
            Item::History(entry) => {
                assert_eq!(entry.vc, 4);
                assert_eq!(entry.t, 1_700_000_000_000);
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn malformed_line_is_reported() {
        let out = "{\"data\":[]}\nnot json\n";
        let err = parse_chunks(Context::Bookmarks, out).unwrap_err();
        assert!(matches!(&err, TabsiftError::ItemSource(msg) if msg.starts_with("line 2")));
    }

    #[test]
    fn non_list_contexts_have_no_command() {
        assert_eq!(fetch_args(Context::Settings), None);
        assert_eq!(fetch_args(Context::RecentlyClosed), Some(&["tabs", "get", "--closed"][..]));
        assert!(parse_chunks(Context::None, "garbage").unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_program_is_an_item_source_error() {
        let bridge = CommandBridge::new("tabsift-no-such-program");
        let err = bridge.fetch(Context::Tabs).await.unwrap_err();
        assert!(matches!(err, TabsiftError::ItemSource(_)));
    }

    #[tokio::test]
    async fn missing_clipboard_is_an_action_error() {
        let bridge = CommandBridge::default().with_clipboard(vec![]);
        let err = bridge.copy_to_clipboard("x").await.unwrap_err();
        assert!(matches!(err, TabsiftError::Action(msg) if msg.contains("no command")));
    }
}
