//! The tab control.
//!
//! A tab is a container whose [`TabAdapter`] owns a strip of custom-drawn [`TabItem`] views, one
//! per page, and shows the content view of the selected page below them.

use crate::backend::Backend;
use crate::config::TabMetrics;
use crate::container::Adapter;
use crate::events::{MouseEvent, MouseEventType, Signal};
use crate::memo::Memo;
use crate::painter::{Painter, TextAlign, TextAttributes, ThemePart, ThemeParams};
use crate::rect::Rect;
use crate::tree::ViewTree;
use crate::view::{ControlState, ViewId, ViewImpl, Widget};
use cgmath::{Vector2, Zero};
use core::any::Any;
use tracing::{debug, trace};

/// A clickable label in the tab strip.
#[derive(Debug)]
pub struct TabItem {
    title: String,
    selected: bool,
    /// Title size plus padding, in pixels.
    size: Memo<Vector2<f64>>,
    metrics: TabMetrics,
}

impl TabItem {
    pub fn new(title: impl Into<String>, metrics: TabMetrics) -> TabItem {
        TabItem {
            title: title.into(),
            selected: false,
            size: Memo::new(),
            metrics,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, view: &mut ViewImpl, selected: bool) {
        self.selected = selected;
        view.set_state(if selected {
            ControlState::Pressed
        } else {
            ControlState::Normal
        });
    }

    /// The measured size, recomputed after font or scale factor changes.
    fn size(&mut self, view: &ViewImpl, backend: &dyn Backend) -> Vector2<f64> {
        let TabItem {
            title,
            size,
            metrics,
            ..
        } = self;
        size.get_or_update(|| {
            let scale = view.scale_factor();
            let text = backend.measure_text(title, view.font());
            Vector2::new(
                (text.x * scale).ceil() + 2. * metrics.h_padding * scale,
                (text.y * scale).ceil() + 2. * metrics.v_padding * scale,
            )
        })
    }
}

impl Widget for TabItem {
    fn draw(&self, view: &ViewImpl, painter: &mut dyn Painter, _: Rect) {
        // the selected item overflows the strip by one pixel to hide the panel border
        let mut rect = Rect::from_size(view.size_allocation().size);
        if !self.selected {
            rect = rect.inset_edges(0., 0., 0., 1.);
        }
        painter.draw_theme_part(ThemePart::TabItem, view.state(), rect, &ThemeParams::default());
        let attributes = TextAttributes::new(
            view.font().clone(),
            view.color(),
            TextAlign::Center,
            TextAlign::Center,
        );
        painter.draw_text(&self.title, rect, &attributes);
    }

    fn on_font_changed(&mut self, _: &mut ViewImpl) {
        self.size.invalidate();
    }

    fn on_dpi_changed(&mut self, _: &mut ViewImpl) {
        self.size.invalidate();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One page: its strip item and its content view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TabPage {
    item: ViewId,
    content: ViewId,
}

/// Layout, drawing and selection state of a tab.
///
/// Exactly one page is selected whenever there are pages. Only the selected page’s content view is
/// visible.
#[derive(Debug)]
pub struct TabAdapter {
    pages: Vec<TabPage>,
    selected: Option<usize>,
    /// Height of the item strip, in pixels.
    items_height: Memo<f64>,
    metrics: TabMetrics,
    on_selection_changed: Signal<Option<usize>>,
}

impl TabAdapter {
    pub fn new(metrics: TabMetrics) -> TabAdapter {
        TabAdapter {
            pages: Vec::new(),
            selected: None,
            items_height: Memo::new(),
            metrics,
            on_selection_changed: Signal::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// `None` iff there are no pages.
    pub fn selected_item_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn page_at(&self, index: usize) -> Option<ViewId> {
        self.pages.get(index).map(|page| page.content)
    }

    pub fn item_at(&self, index: usize) -> Option<ViewId> {
        self.pages.get(index).map(|page| page.item)
    }

    pub fn index_of(&self, content: ViewId) -> Option<usize> {
        self.pages.iter().position(|page| page.content == content)
    }

    /// Emitted with the selected index after the selection was set or re-targeted.
    pub fn on_selection_changed(&self) -> &Signal<Option<usize>> {
        &self.on_selection_changed
    }

    fn selected_page(&self) -> Option<TabPage> {
        self.pages.get(self.selected?).copied()
    }

    fn items_height(&mut self, tree: &ViewTree, tab: ViewId) -> f64 {
        let view = match tree.get(tab) {
            Some(view) => view,
            None => return 0.,
        };
        let metrics = self.metrics;
        self.items_height.get_or_update(|| {
            let scale = view.scale_factor();
            let text = tree.backend().measure_text("bp", view.font());
            // plus one pixel the selected item can overflow into
            (text.y * scale).ceil() + (2. * metrics.v_padding + metrics.top_padding) * scale + 1.
        })
    }

    fn item_size(tree: &mut ViewTree, item: ViewId) -> Vector2<f64> {
        tree.with_widget(item, |item: &mut TabItem, view, backend| item.size(view, backend))
            .unwrap_or_else(Vector2::zero)
    }

    /// Adds a page showing `content`. The first page is selected automatically; later pages start
    /// out hidden.
    pub fn add_page(&mut self, tree: &mut ViewTree, tab: ViewId, title: &str, content: ViewId) {
        let (font, color) = match (tree.get(tab), tree.contains(content)) {
            (Some(view), true) => (view.font().clone(), view.color()),
            _ => {
                trace!(?tab, ?content, "add_page: no such view");
                return;
            }
        };
        if self.index_of(content).is_some() {
            trace!(?tab, ?content, "add_page: already a page");
            return;
        }
        let cycle = content == tab || tree.is_ancestor(content, tab);
        debug_assert!(!cycle, "adding {:?} to tab {:?} would create a cycle", content, tab);
        if cycle {
            trace!(?tab, ?content, "add_page: content contains the tab");
            return;
        }
        let previous_parent = tree.get(content).and_then(|view| view.parent());
        if previous_parent.is_some() && tree.detach(content).is_err() {
            return;
        }

        let item = tree.create_widget_view(Box::new(TabItem::new(title, self.metrics)));
        tree.set_font(item, font);
        tree.set_color(item, color);
        tree.set_parent(item, Some(tab));
        tree.set_parent(content, Some(tab));
        if !self.pages.is_empty() {
            tree.set_visible(content, false);
        }
        self.pages.push(TabPage { item, content });
        debug!(?tab, title, index = self.pages.len() - 1, "added tab page");

        if self.pages.len() == 1 {
            self.set_selected(tree, 0);
            self.layout(tree, tab);
            self.on_selection_changed.emit(&self.selected);
        } else {
            self.layout(tree, tab);
        }
    }

    /// Removes a page and returns its content view, which is detached and made visible again.
    ///
    /// Out-of-range indices are ignored. Removing the selected page selects the page after it,
    /// wrapping around to the first page.
    pub fn remove_page_at(
        &mut self,
        tree: &mut ViewTree,
        tab: ViewId,
        index: usize,
    ) -> Option<ViewId> {
        if index >= self.pages.len() {
            trace!(?tab, index, count = self.pages.len(), "remove_page_at: out of range");
            return None;
        }

        let count = self.pages.len();
        let was_selected = self.selected == Some(index);
        if was_selected {
            if count == 1 {
                self.selected = None;
            } else {
                self.set_selected(tree, (index + 1) % count);
            }
        }

        let removed = self.pages.remove(index);
        if let Some(selected) = self.selected {
            if selected > index {
                self.selected = Some(selected - 1);
            }
        }

        tree.set_parent(removed.item, None);
        let _ = tree.destroy_view(removed.item);
        tree.set_parent(removed.content, None);
        tree.set_visible(removed.content, true);
        debug!(?tab, index, selected = ?self.selected, "removed tab page");

        self.layout(tree, tab);
        if was_selected {
            self.on_selection_changed.emit(&self.selected);
        }
        Some(removed.content)
    }

    /// Selects a page. Out-of-range indices are ignored.
    ///
    /// Notifies selection handlers even if the page was already selected.
    pub fn select_item_at(&mut self, tree: &mut ViewTree, tab: ViewId, index: usize) {
        if index >= self.pages.len() {
            trace!(?tab, index, count = self.pages.len(), "select_item_at: out of range");
            return;
        }
        self.set_selected(tree, index);
        self.layout(tree, tab);
        debug!(?tab, index, "selected tab page");
        self.on_selection_changed.emit(&self.selected);
    }

    /// Moves the selection without laying out or notifying.
    fn set_selected(&mut self, tree: &mut ViewTree, index: usize) {
        let page = match self.pages.get(index) {
            Some(page) => *page,
            None => return,
        };
        if let Some(old) = self.selected_page() {
            if old != page {
                tree.with_widget(old.item, |item: &mut TabItem, view, _| {
                    item.set_selected(view, false)
                });
                tree.invalidate(old.item);
                tree.set_visible(old.content, false);
            }
        }

        self.selected = Some(index);
        tree.with_widget(page.item, |item: &mut TabItem, view, _| {
            item.set_selected(view, true)
        });
        tree.invalidate(page.item);
        tree.set_visible(page.content, true);
    }
}

impl Adapter for TabAdapter {
    fn layout(&mut self, tree: &mut ViewTree, tab: ViewId) {
        let (bounds, scale) = match tree.get(tab) {
            Some(view) => (view.size_allocation(), view.scale_factor()),
            None => return,
        };
        let items_height = self.items_height(tree, tab);

        let mut x = 0.;
        for (index, page) in self.pages.iter().enumerate() {
            let size = TabAdapter::item_size(tree, page.item);
            let mut rect = Rect::new(bounds.origin, size)
                .offset(Vector2::new(x, 0.))
                .with_height(items_height);
            if self.selected != Some(index) {
                rect = rect.inset_edges(0., self.metrics.top_padding * scale, 0., 0.);
            }
            tree.size_allocate(page.item, rect);
            x += rect.width();
        }

        if let Some(page) = self.selected_page() {
            let padding = self.metrics.content_padding * scale;
            let rect = bounds
                .inset(padding, padding)
                .inset_edges(0., items_height - scale, 0., 0.);
            tree.size_allocate(page.content, rect);
        }

        tree.invalidate(tab);
    }

    /// Yields each page’s item followed by its content view; reversed, content comes first.
    fn for_each(
        &self,
        _: &ViewTree,
        _: ViewId,
        reverse: bool,
        callback: &mut dyn FnMut(ViewId) -> bool,
    ) {
        if reverse {
            for page in self.pages.iter().rev() {
                if !callback(page.content) || !callback(page.item) {
                    break;
                }
            }
        } else {
            for page in &self.pages {
                if !callback(page.item) || !callback(page.content) {
                    break;
                }
            }
        }
    }

    fn has_child(&self, _: &ViewTree, _: ViewId, child: ViewId) -> bool {
        self.selected_page().map_or(false, |page| page.content == child)
            || self.pages.iter().any(|page| page.item == child)
    }

    fn minimum_size(&mut self, tree: &mut ViewTree, tab: ViewId) -> Vector2<f64> {
        let scale = tree.scale_factor(tab);
        let items_height = self.items_height(tree, tab);

        let mut items_width = 0.;
        let mut content = Vector2::zero();
        for page in &self.pages {
            items_width += TabAdapter::item_size(tree, page.item).x;
            let size = tree.minimum_size(page.content);
            content.x = f64::max(content.x, size.x);
            content.y = f64::max(content.y, size.y);
        }

        let padding = 2. * self.metrics.content_padding * scale;
        Vector2::new(
            f64::max(items_width, content.x) + padding,
            items_height + content.y + padding,
        )
    }

    fn draw(&self, tree: &ViewTree, tab: ViewId, painter: &mut dyn Painter, dirty: Rect) {
        let view = match tree.get(tab) {
            Some(view) => view,
            None => return,
        };

        let mut rect = Rect::from_size(view.size_allocation().size);
        if !self.pages.is_empty() {
            let items_height = self.items_height.last().unwrap_or(0.);
            rect = rect.inset_edges(0., items_height - 1., 0., 0.);
        }
        painter.draw_theme_part(ThemePart::TabPanel, view.state(), rect, &ThemeParams::default());

        for page in &self.pages {
            tree.draw_child(tab, page.item, painter, dirty);
        }
        if let Some(page) = self.selected_page() {
            tree.draw_child(tab, page.content, painter, dirty);
        }
    }

    fn accepts_children(&self) -> bool {
        false
    }

    fn remove_child(&mut self, tree: &mut ViewTree, tab: ViewId, child: ViewId) -> bool {
        match self
            .pages
            .iter()
            .position(|page| page.content == child || page.item == child)
        {
            Some(index) => {
                self.remove_page_at(tree, tab, index);
                true
            }
            None => false,
        }
    }

    /// Clicks on items select their page.
    fn on_child_click(
        &mut self,
        tree: &mut ViewTree,
        tab: ViewId,
        child: ViewId,
        event: &MouseEvent,
    ) -> bool {
        let index = match self.pages.iter().position(|page| page.item == child) {
            Some(index) => index,
            None => return false,
        };
        if event.kind == MouseEventType::Down {
            self.select_item_at(tree, tab, index);
        }
        true
    }

    fn font_changed(&mut self, tree: &mut ViewTree, tab: ViewId) {
        if let Some(font) = tree.get(tab).map(|view| view.font().clone()) {
            for page in &self.pages {
                tree.set_font(page.item, font.clone());
            }
        }
        self.items_height.invalidate();
        self.layout(tree, tab);
    }

    fn color_changed(&mut self, tree: &mut ViewTree, tab: ViewId) {
        if let Some(color) = tree.get(tab).map(|view| view.color()) {
            for page in &self.pages {
                tree.set_color(page.item, color);
            }
        }
        tree.invalidate(tab);
    }

    fn dpi_changed(&mut self, tree: &mut ViewTree, tab: ViewId) {
        self.items_height.invalidate();
        self.layout(tree, tab);
    }

    fn destroy(&mut self, tree: &mut ViewTree, _: ViewId) {
        self.selected = None;
        for page in core::mem::take(&mut self.pages) {
            tree.set_parent(page.item, None);
            tree.set_parent(page.content, None);
            let _ = tree.destroy_view(page.item);
            let _ = tree.destroy_view(page.content);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The logical tab widget.
///
/// A thin handle that forwards page operations to the [`TabAdapter`] of its container view.
#[derive(Debug, Clone)]
pub struct Tab {
    view: ViewId,
    /// Emitted with the selected page index (`None` once the last page is removed).
    pub on_selected_page_change: Signal<Option<usize>>,
}

impl Tab {
    pub fn new(tree: &mut ViewTree) -> Tab {
        let adapter = TabAdapter::new(tree.theme().tab);
        let on_selected_page_change = adapter.on_selection_changed().clone();
        let view = tree.create_container(Box::new(adapter));
        Tab {
            view,
            on_selected_page_change,
        }
    }

    /// The container view implementing this tab.
    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn add_page(&self, tree: &mut ViewTree, title: &str, content: ViewId) {
        let tab = self.view;
        tree.with_adapter(tab, |adapter: &mut TabAdapter, tree| {
            adapter.add_page(tree, tab, title, content)
        });
    }

    /// Removes the page showing `content`, if there is one.
    pub fn remove_page(&self, tree: &mut ViewTree, content: ViewId) {
        let index = tree
            .adapter::<TabAdapter>(self.view)
            .and_then(|adapter| adapter.index_of(content));
        if let Some(index) = index {
            self.remove_page_at(tree, index);
        }
    }

    pub fn remove_page_at(&self, tree: &mut ViewTree, index: usize) -> Option<ViewId> {
        let tab = self.view;
        tree.with_adapter(tab, |adapter: &mut TabAdapter, tree| {
            adapter.remove_page_at(tree, tab, index)
        })
        .flatten()
    }

    pub fn select_page_at(&self, tree: &mut ViewTree, index: usize) {
        let tab = self.view;
        tree.with_adapter(tab, |adapter: &mut TabAdapter, tree| {
            adapter.select_item_at(tree, tab, index)
        });
    }

    pub fn selected_page_index(&self, tree: &ViewTree) -> Option<usize> {
        tree.adapter::<TabAdapter>(self.view)?.selected_item_index()
    }

    pub fn page_count(&self, tree: &ViewTree) -> usize {
        tree.adapter::<TabAdapter>(self.view)
            .map_or(0, |adapter| adapter.page_count())
    }

    pub fn page_at(&self, tree: &ViewTree, index: usize) -> Option<ViewId> {
        tree.adapter::<TabAdapter>(self.view)?.page_at(index)
    }

    /// Minimum size in logical units.
    pub fn minimum_size(&self, tree: &mut ViewTree) -> Vector2<f64> {
        tree.minimum_size(self.view) / tree.scale_factor(self.view)
    }
}
