//! The interactive tree viewer: state, key handling, drawing.

use std::io::{self, Write};
use std::sync::Arc;

use arbor::{
    BoxError, ExpandEventArgs, Expansion, Key, KeyCombo, LevelConfig, Tree, TreeConfig, TreeError,
    TreeEventArgs, TreeHandler, TreeNode, TreeRow,
};
use arbor_data::{
    CacheConfig, CachingProvider, DataProvider, Item, JsonProvider, ProviderHandler, SampleProvider,
};
use async_trait::async_trait;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType},
};
use log::{debug, warn};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::ViewerConfig;
use crate::error::CliError;

const HELP: &str = "↑/↓ move  →/← expand/collapse  enter select  q quit";

/// What the event loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn with_kind(node: &TreeNode<Item>) -> String {
    match &node.value().kind {
        Some(kind) => format!("{} [{}]", node.text(), kind),
        None => node.text().to_string(),
    }
}

/// Loads children through the provider and reports activity to the status line.
struct ViewerHandler<P> {
    inner: ProviderHandler<P>,
    status: Arc<watch::Sender<String>>,
}

#[async_trait]
impl<P: DataProvider> TreeHandler<Item> for ViewerHandler<P> {
    async fn on_expand(&self, args: &mut ExpandEventArgs<Item>) -> Result<(), BoxError> {
        self.inner.on_expand(args).await?;
        if args.children.data.is_some() {
            let children = std::mem::take(&mut args.children);
            args.children = children.with_template(with_kind);
        }
        Ok(())
    }

    async fn on_change(&self, args: &TreeEventArgs<Item>) {
        self.status.send_replace(format!("Selected {}", args.text));
    }

    async fn on_collapse(&self, args: &TreeEventArgs<Item>) {
        self.status.send_replace(format!("Collapsed {}", args.text));
    }
}

pub struct Viewer {
    tree: Tree<Item>,
    status: Arc<watch::Sender<String>>,
    /// Tracks status updates not drawn yet.
    seen: watch::Receiver<String>,
}

impl Viewer {
    /// Build the provider stack from `config` and load the roots.
    pub async fn new(config: &ViewerConfig, cancel: CancellationToken) -> Result<Self, CliError> {
        let source: Arc<dyn DataProvider> = match &config.data_file {
            Some(path) => Arc::new(JsonProvider::load(path).await?),
            None => Arc::new(SampleProvider::new().with_latency(config.latency())),
        };
        let cache = CacheConfig::new().with_children_ttl(config.cache_ttl());
        let provider = ProviderHandler::with_cancellation(CachingProvider::new(source, cache), cancel);
        let roots = provider.roots().await?;
        debug!("Loaded {} roots", roots.len());

        let (status, seen) = watch::channel(String::new());
        let status = Arc::new(status);
        let handler = ViewerHandler {
            inner: provider,
            status: status.clone(),
        };

        let tree_config = match config.max_depth {
            Some(depth) => TreeConfig::new().with_max_depth(depth),
            None => TreeConfig::new(),
        };
        let mut tree = Tree::with_config(handler, tree_config);
        tree.add_level(
            LevelConfig::new()
                .with_text_property("name")
                .with_has_children(|item: &Item| !item.is_leaf())
                .with_template(with_kind),
        );
        tree.set_data(roots).await?;
        tree.set_focused_index(Some(0));

        Ok(Self { tree, status, seen })
    }

    pub fn tree(&self) -> &Tree<Item> {
        &self.tree
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.tree.is_dirty() || self.seen.has_changed().unwrap_or(false)
    }

    /// Dispatch a key. Handler failures are shown in the status line.
    pub async fn handle_key(&mut self, key: &KeyCombo) -> Result<Flow, CliError> {
        match key.key {
            Key::Char('q') | Key::Escape => return Ok(Flow::Quit),
            Key::Char('c') if key.modifiers.ctrl => return Ok(Flow::Quit),
            Key::Home => {
                self.tree.set_focused_index(Some(0));
                return Ok(Flow::Continue);
            }
            Key::End => {
                let last = self.tree.current_items().len().checked_sub(1);
                self.tree.set_focused_index(last);
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        match self.tree.on_key(key).await {
            Ok(_) => {}
            Err(TreeError::Handler(e)) => {
                warn!("Expand failed: {}", e);
                self.status.send_replace(format!("Error: {}", e));
            }
            Err(e) => return Err(e.into()),
        }
        Ok(Flow::Continue)
    }

    /// Draw the header, the visible rows around the focus, and the status line.
    pub fn render(&mut self, out: &mut impl Write) -> io::Result<()> {
        let (width, height) = terminal::size().unwrap_or((80, 24));
        self.seen.borrow_and_update();
        self.draw(out, width, height)?;
        self.tree.clear_dirty();
        Ok(())
    }

    fn draw(&self, out: &mut impl Write, width: u16, height: u16) -> io::Result<()> {
        let width = usize::from(width);
        let body = usize::from(height.saturating_sub(3)).max(1);
        let rows = self.tree.rows();
        let offset = self
            .tree
            .focused_index()
            .map_or(0, |focused| (focused + 1).saturating_sub(body));

        queue!(
            out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            Print("arbor"),
            SetAttribute(Attribute::Reset),
            Print("  "),
            Print(truncate_to_width(HELP, width.saturating_sub(7))),
        )?;

        for (line, row) in rows.iter().skip(offset).take(body).enumerate() {
            queue!(out, MoveTo(0, line as u16 + 2))?;
            draw_row(out, row, width)?;
        }

        queue!(
            out,
            MoveTo(0, height.saturating_sub(1)),
            Print(truncate_to_width(&self.status(), width))
        )?;
        out.flush()
    }
}

fn draw_row(out: &mut impl Write, row: &TreeRow, width: usize) -> io::Result<()> {
    let marker = match row.expansion {
        _ if !row.has_children => "  ",
        Expansion::ExpandedVisible => "▾ ",
        _ => "▸ ",
    };
    let mut line = format!("{}{}{}", "  ".repeat(row.depth), marker, row.text);
    if row.loading {
        line.push_str(" …");
    }

    if row.focused {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if row.selected {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(
        out,
        Print(truncate_to_width(&line, width)),
        SetAttribute(Attribute::Reset)
    )
}

/// Cut `s` to at most `max_width` columns, ending in `…` when shortened.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ViewerConfig {
        ViewerConfig {
            latency_ms: 0,
            ..ViewerConfig::default()
        }
    }

    async fn viewer() -> Viewer {
        Viewer::new(&config(), CancellationToken::new()).await.unwrap()
    }

    fn texts(viewer: &Viewer) -> Vec<String> {
        viewer.tree().rows().into_iter().map(|r| r.text).collect()
    }

    #[tokio::test]
    async fn test_starts_on_first_root() {
        let viewer = viewer().await;
        assert_eq!(texts(&viewer), ["item1", "item8", "item9", "item10"]);
        assert_eq!(viewer.tree().focused_index(), Some(0));
    }

    #[tokio::test]
    async fn test_expand_and_select() {
        let mut viewer = viewer().await;

        viewer.handle_key(&KeyCombo::key(Key::Right)).await.unwrap();
        assert_eq!(texts(&viewer).len(), 7);

        viewer.handle_key(&KeyCombo::key(Key::Down)).await.unwrap();
        viewer.handle_key(&KeyCombo::key(Key::Enter)).await.unwrap();
        assert_eq!(viewer.status(), "Selected item2");

        viewer.handle_key(&KeyCombo::key(Key::End)).await.unwrap();
        assert_eq!(viewer.tree().focused_index(), Some(6));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut viewer = viewer().await;
        for key in [
            KeyCombo::key(Key::Char('q')),
            KeyCombo::key(Key::Escape),
            KeyCombo::key(Key::Char('c')).ctrl(),
        ] {
            assert_eq!(viewer.handle_key(&key).await.unwrap(), Flow::Quit);
        }
        assert_eq!(
            viewer.handle_key(&KeyCombo::key(Key::Char('c'))).await.unwrap(),
            Flow::Continue
        );
    }

    #[tokio::test]
    async fn test_cancelled_expand_shows_error() {
        let cancel = CancellationToken::new();
        let mut viewer = Viewer::new(&config(), cancel.clone()).await.unwrap();
        cancel.cancel();

        let flow = viewer.handle_key(&KeyCombo::key(Key::Right)).await.unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(viewer.status().starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_draw_rows() {
        let mut viewer = viewer().await;
        viewer.handle_key(&KeyCombo::key(Key::Right)).await.unwrap();

        let mut out = Vec::new();
        viewer.draw(&mut out, 80, 24).unwrap();
        let screen = String::from_utf8_lossy(&out);
        assert!(screen.contains("▾ item1"));
        assert!(screen.contains("▸ item2"));
        assert!(screen.contains("item10"));
    }

    #[tokio::test]
    async fn test_long_rows_are_cut_to_width() {
        let mut viewer = viewer().await;
        viewer.handle_key(&KeyCombo::key(Key::Right)).await.unwrap();

        let mut out = Vec::new();
        viewer.draw(&mut out, 6, 24).unwrap();
        let screen = String::from_utf8_lossy(&out);
        assert!(screen.contains("▾ ite…"));
        assert!(!screen.contains("item1"));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("item10", 10), "item10");
        assert_eq!(truncate_to_width("item10", 4), "ite…");
        assert_eq!(truncate_to_width("日本語", 4), "日…");
        assert_eq!(truncate_to_width("item10", 0), "");
    }
}
