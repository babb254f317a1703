use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::action::{Action, Tab};
use crate::client::{Collection, FetchParams};
use crate::config::Config;
use crate::countdown::{Countdown, CountdownConfig, CountdownHandle, TimerState};
use crate::error::AtriumError;
use crate::event::Event;
use crate::pagination::should_fetch_next;
use crate::query::{FetchTicket, InfiniteQuery, QueryKey, Resolution, SingleQuery};
use crate::types::{Artwork, Exhibition};

/// Rows one exhibition occupies in the list: title, description, image, link
pub const EXHIBITION_ROWS: u16 = 4;
/// Rows one artwork occupies: title, description, image
pub const ARTWORK_ROWS: u16 = 3;
/// Rows around the exhibitions list: bars, titles, timer, borders, caption
pub const EXHIBITION_CHROME_ROWS: u16 = 8;
/// Rows around the artworks list: bars, titles, borders
pub const ARTWORK_CHROME_ROWS: u16 = 6;

/// Selection and scroll position of a list, counted in items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    pub index: usize,
    pub offset: usize,
}

impl ListCursor {
    fn up(&mut self, n: usize) {
        self.index = self.index.saturating_sub(n);
        if self.index < self.offset {
            self.offset = self.index;
        }
    }

    fn down(&mut self, n: usize, len: usize, visible: usize) {
        if len == 0 {
            return;
        }
        self.index = self.index.saturating_add(n).min(len - 1);
        self.follow(visible);
    }

    /// Keep the selection inside the visible window
    fn follow(&mut self, visible: usize) {
        let visible = visible.max(1);
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + visible {
            self.offset = self.index + 1 - visible;
        }
    }

    /// Move the window, dragging the selection along when it falls out of view
    fn scroll_by(&mut self, delta: isize, len: usize, visible: usize) {
        if len == 0 {
            return;
        }
        let visible = visible.max(1);
        let max_offset = len.saturating_sub(visible);
        self.offset = self.offset.saturating_add_signed(delta).min(max_offset);
        let last_visible = (self.offset + visible - 1).min(len - 1);
        self.index = self.index.clamp(self.offset, last_visible);
    }
}

pub struct App {
    pub tab: Tab,

    // Exhibitions screen
    pub exhibitions: InfiniteQuery<Exhibition>,
    /// Flattened pages, recomputed whenever the page sequence changes
    pub exhibition_list: Option<Vec<Exhibition>>,
    pub exhibition_cursor: ListCursor,
    pub timer: TimerState,
    countdown: Option<CountdownHandle>,
    countdown_config: CountdownConfig,
    countdown_generation: u64,

    // Artworks screen
    pub artworks: SingleQuery<Artwork>,
    pub artwork_cursor: ListCursor,

    pub terminal_rows: u16,
    pub error: Option<String>,
    pub should_quit: bool,
    mounted: bool,
    limit: String,
    scroll_threshold: u16,
    collection: Arc<dyn Collection>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        collection: Arc<dyn Collection>,
        config: &Config,
        tab: Tab,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let limit = config.api.limit.clone();
        let exhibitions_key =
            QueryKey::new(config.api.exhibitions_path.clone()).param("limit", limit.clone());
        let artworks_key =
            QueryKey::new(config.api.artworks_path.clone()).param("limit", limit.clone());

        Self {
            tab,

            exhibitions: InfiniteQuery::new(exhibitions_key, config.list.policy()),
            exhibition_list: None,
            exhibition_cursor: ListCursor::default(),
            timer: TimerState::default(),
            countdown: None,
            countdown_config: config.countdown.countdown(),
            countdown_generation: 0,

            artworks: SingleQuery::new(artworks_key),
            artwork_cursor: ListCursor::default(),

            terminal_rows: 0,
            error: None,
            should_quit: false,
            mounted: false,
            limit,
            scroll_threshold: config.list.scroll_threshold,
            collection,
            action_tx,
        }
    }

    pub fn source_name(&self) -> &str {
        self.collection.name()
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown
            .as_ref()
            .is_some_and(CountdownHandle::is_running)
    }

    pub fn is_loading(&self) -> bool {
        match self.tab {
            Tab::Exhibitions => self.exhibitions.is_loading(),
            Tab::Artworks => self.artworks.is_loading(),
        }
    }

    pub fn selected_exhibition(&self) -> Option<&Exhibition> {
        self.exhibition_list.as_ref()?.get(self.exhibition_cursor.index)
    }

    pub fn selected_artwork(&self) -> Option<&Artwork> {
        self.artworks.data()?.get(self.artwork_cursor.index)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Init,
            Event::Key(key) => self.handle_key(key),
            Event::Scroll(rows) => Action::ScrollRows(rows),
            Event::Resize(_, height) => Action::Resize(height),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Char('h')
            | KeyCode::Char('l')
            | KeyCode::Left
            | KeyCode::Right => Action::NextTab,
            KeyCode::Char('1') => Action::SwitchTab(Tab::Exhibitions),
            KeyCode::Char('2') => Action::SwitchTab(Tab::Artworks),
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('o') | KeyCode::Enter => Action::OpenInBrowser,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.error.is_some()
            && matches!(
                action,
                Action::ScrollUp
                    | Action::ScrollDown
                    | Action::PageUp
                    | Action::PageDown
                    | Action::GoToTop
                    | Action::GoToBottom
                    | Action::SwitchTab(_)
                    | Action::NextTab
                    | Action::Refresh
                    | Action::OpenInBrowser
            )
        {
            self.error = None;
        }

        match action {
            Action::Init => {
                if !self.mounted {
                    self.mounted = true;
                    self.mount(self.tab);
                }
            }
            Action::Quit => {
                self.unmount(self.tab);
                self.should_quit = true;
            }
            Action::ScrollUp => {
                self.cursor_mut().up(1);
            }
            Action::ScrollDown => {
                let (len, visible) = self.list_metrics();
                self.cursor_mut().down(1, len, visible);
                self.maybe_fetch_next();
            }
            Action::PageUp => {
                let (_, visible) = self.list_metrics();
                self.cursor_mut().up(visible);
            }
            Action::PageDown => {
                let (len, visible) = self.list_metrics();
                self.cursor_mut().down(visible, len, visible);
                self.maybe_fetch_next();
            }
            Action::GoToTop => {
                let cursor = self.cursor_mut();
                cursor.index = 0;
                cursor.offset = 0;
            }
            Action::GoToBottom => {
                let (len, visible) = self.list_metrics();
                self.cursor_mut().down(len, len, visible);
                self.maybe_fetch_next();
            }
            Action::ScrollRows(rows) => {
                let (len, visible) = self.list_metrics();
                let per_item = self.rows_per_item() as i16;
                let items = (rows.abs() / per_item).max(1) as isize;
                let delta = if rows < 0 { -items } else { items };
                self.cursor_mut().scroll_by(delta, len, visible);
                self.maybe_fetch_next();
            }
            Action::Resize(height) => {
                self.terminal_rows = height;
                let visible = self.visible_items(Tab::Exhibitions);
                self.exhibition_cursor.follow(visible);
                let visible = self.visible_items(Tab::Artworks);
                self.artwork_cursor.follow(visible);
                self.maybe_fetch_next();
            }

            // Navigation
            Action::SwitchTab(tab) => {
                if tab != self.tab {
                    self.unmount(self.tab);
                    self.tab = tab;
                    self.mounted = true;
                    self.mount(tab);
                }
            }
            Action::NextTab => {
                self.update(Action::SwitchTab(self.tab.next()));
            }

            Action::Refresh => match self.tab {
                Tab::Exhibitions => {
                    let key = self.exhibitions.key().clone();
                    self.exhibitions.reset(key);
                    self.exhibition_list = None;
                    self.exhibition_cursor = ListCursor::default();
                    if let Some(ticket) = self.exhibitions.fetch_next_page() {
                        self.spawn_fetch_exhibitions(ticket);
                    }
                }
                Tab::Artworks => {
                    self.artworks.reset();
                    self.artwork_cursor = ListCursor::default();
                    if let Some(ticket) = self.artworks.start() {
                        self.spawn_fetch_artworks(ticket);
                    }
                }
            },
            Action::OpenInBrowser => {
                let url = match self.tab {
                    Tab::Exhibitions => self
                        .selected_exhibition()
                        .and_then(|e| e.link())
                        .map(str::to_string),
                    Tab::Artworks => self.selected_artwork().and_then(|a| a.image_url()),
                };
                if let Some(url) = url {
                    self.spawn_open(url);
                }
            }

            Action::ExhibitionsPage { ticket, result } => {
                match self.exhibitions.resolve(ticket, result) {
                    Resolution::Applied => {
                        self.exhibition_list = self.exhibitions.items();
                        self.maybe_fetch_next();
                    }
                    Resolution::Failed => {
                        self.error = self.exhibitions.error().map(str::to_string);
                    }
                    Resolution::Stale => {}
                }
            }
            Action::ArtworksLoaded { ticket, result } => {
                if self.artworks.resolve(ticket, result) == Resolution::Failed {
                    self.error = self.artworks.error().map(str::to_string);
                }
            }

            Action::CountdownTick { generation, label } => match &self.countdown {
                Some(handle) if handle.generation() == generation => {
                    self.timer.label = Some(label);
                }
                _ => debug!(generation, "stale countdown tick ignored"),
            },

            Action::Error(msg) => {
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    fn mount(&mut self, tab: Tab) {
        debug!(tab = tab.title(), "mount");
        match tab {
            Tab::Exhibitions => {
                self.exhibition_cursor = ListCursor::default();
                self.timer = TimerState::default();
                self.countdown_generation = self.countdown_generation.wrapping_add(1);
                self.countdown = Some(Countdown::start(
                    self.countdown_config,
                    self.countdown_generation,
                    self.action_tx.clone(),
                ));
                if let Some(ticket) = self.exhibitions.fetch_next_page() {
                    self.spawn_fetch_exhibitions(ticket);
                }
            }
            Tab::Artworks => {
                if let Some(ticket) = self.artworks.start() {
                    self.spawn_fetch_artworks(ticket);
                }
            }
        }
    }

    fn unmount(&mut self, tab: Tab) {
        debug!(tab = tab.title(), "unmount");
        if tab == Tab::Exhibitions {
            if let Some(handle) = self.countdown.take() {
                handle.stop();
            }
            self.timer = TimerState::default();
            let key = self.exhibitions.key().clone();
            self.exhibitions.reset(key);
            self.exhibition_list = None;
        }
    }

    fn rows_per_item(&self) -> u16 {
        match self.tab {
            Tab::Exhibitions => EXHIBITION_ROWS,
            Tab::Artworks => ARTWORK_ROWS,
        }
    }

    /// Rows left for the list of `tab` once its surrounding UI is drawn
    pub fn viewport_rows(&self, tab: Tab) -> u16 {
        let chrome = match tab {
            Tab::Exhibitions => EXHIBITION_CHROME_ROWS,
            Tab::Artworks => ARTWORK_CHROME_ROWS,
        };
        self.terminal_rows.saturating_sub(chrome)
    }

    fn visible_items(&self, tab: Tab) -> usize {
        let rows_per_item = match tab {
            Tab::Exhibitions => EXHIBITION_ROWS,
            Tab::Artworks => ARTWORK_ROWS,
        };
        (self.viewport_rows(tab) / rows_per_item).max(1) as usize
    }

    fn list_metrics(&self) -> (usize, usize) {
        let len = match self.tab {
            Tab::Exhibitions => self.exhibition_list.as_ref().map_or(0, Vec::len),
            Tab::Artworks => self.artworks.data().map_or(0, |data| data.len()),
        };
        (len, self.visible_items(self.tab))
    }

    fn cursor_mut(&mut self) -> &mut ListCursor {
        match self.tab {
            Tab::Exhibitions => &mut self.exhibition_cursor,
            Tab::Artworks => &mut self.artwork_cursor,
        }
    }

    /// Request the next exhibitions page once the list is scrolled near its end.
    ///
    /// With no pages yet the list is empty, so this also retries a failed first page.
    fn maybe_fetch_next(&mut self) {
        if !self.mounted || self.tab != Tab::Exhibitions {
            return;
        }
        let len = self.exhibition_list.as_ref().map_or(0, Vec::len);
        let rows = i64::from(EXHIBITION_ROWS);
        let scroll_offset = self.exhibition_cursor.offset as i64 * rows;
        let content_height = len as i64 * rows;
        if !should_fetch_next(
            scroll_offset,
            content_height,
            i64::from(self.viewport_rows(Tab::Exhibitions)),
            i64::from(self.scroll_threshold),
        ) {
            return;
        }
        if let Some(ticket) = self.exhibitions.fetch_next_page() {
            self.spawn_fetch_exhibitions(ticket);
        }
    }

    fn spawn_fetch_exhibitions(&self, ticket: FetchTicket) {
        let tx = self.action_tx.clone();
        let collection = Arc::clone(&self.collection);
        let params = FetchParams::new(self.limit.clone()).page(ticket.page);
        tokio::spawn(async move {
            let result = collection.exhibitions(&params).await;
            tx.send(Action::ExhibitionsPage { ticket, result }).ok();
        });
    }

    fn spawn_open(&self, url: String) {
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = open::that(&url) {
                warn!(url = %url, error = %e, "could not open link");
                tx.send(AtriumError::from(e).into()).ok();
            }
        });
    }

    fn spawn_fetch_artworks(&self, ticket: FetchTicket) {
        let tx = self.action_tx.clone();
        let collection = Arc::clone(&self.collection);
        let params = FetchParams::new(self.limit.clone());
        tokio::spawn(async move {
            let result = collection.artworks(&params).await;
            tx.send(Action::ArtworksLoaded { ticket, result }).ok();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::Result;
    use crate::pagination::PaginationState;
    use crate::types::{ItemId, Page, Pagination};

    #[derive(Debug, Default)]
    struct MockCollection {
        per_page: u32,
        last_page: u32,
        fail: bool,
        requests: Mutex<Vec<u32>>,
    }

    impl MockCollection {
        fn new(per_page: u32, last_page: u32) -> Self {
            Self {
                per_page,
                last_page,
                ..Self::default()
            }
        }

        fn requests(&self) -> Vec<u32> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn exhibition(id: u64) -> Exhibition {
        Exhibition {
            id: ItemId::Number(id),
            title: format!("Exhibition {}", id),
            short_description: None,
            image_url: None,
            web_url: None,
        }
    }

    #[async_trait]
    impl Collection for MockCollection {
        fn name(&self) -> &str {
            "mock"
        }

        async fn exhibitions(&self, params: &FetchParams) -> Result<Page<Exhibition>> {
            let page = params.page.unwrap_or(1);
            self.requests.lock().unwrap().push(page);
            if self.fail {
                return Err(AtriumError::Network("503 Service Unavailable".into()));
            }
            let data = if page <= self.last_page {
                (0..self.per_page)
                    .map(|i| exhibition(u64::from(page * 100 + i)))
                    .collect()
            } else {
                vec![]
            };
            Ok(Page {
                data,
                pagination: Pagination {
                    current_page: page,
                    total_pages: Some(self.last_page),
                    total: None,
                },
            })
        }

        async fn artworks(&self, _params: &FetchParams) -> Result<Page<Artwork>> {
            let art = |id: u64| Artwork {
                id: ItemId::Number(id),
                title: format!("Artwork {}", id),
                thumbnail: None,
                image_id: Some(format!("img-{}", id)),
            };
            Ok(Page {
                data: vec![art(1), art(2)],
                pagination: Pagination {
                    current_page: 1,
                    total_pages: None,
                    total: None,
                },
            })
        }
    }

    fn setup(
        collection: MockCollection,
        tab: Tab,
    ) -> (App, Arc<MockCollection>, mpsc::UnboundedReceiver<Action>) {
        let collection = Arc::new(collection);
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(collection.clone(), &Config::default(), tab, tx);
        (app, collection, rx)
    }

    /// Next fetch result, skipping countdown ticks
    async fn next_result(rx: &mut mpsc::UnboundedReceiver<Action>) -> Action {
        loop {
            let action = tokio::time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timed out waiting for a fetch")
                .expect("channel closed");
            if !matches!(action, Action::CountdownTick { .. }) {
                return action;
            }
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn key_bindings() {
        let (app, _, _rx) = setup(MockCollection::new(1, 1), Tab::Exhibitions);
        assert!(matches!(app.handle_event(key(KeyCode::Char('j'))), Action::ScrollDown));
        assert!(matches!(app.handle_event(key(KeyCode::Char('G'))), Action::GoToBottom));
        assert!(matches!(app.handle_event(key(KeyCode::Tab)), Action::NextTab));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('2'))),
            Action::SwitchTab(Tab::Artworks)
        ));
        let ctrl_d = Event::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(matches!(app.handle_event(ctrl_d), Action::PageDown));
        assert!(matches!(app.handle_event(Event::Scroll(-3)), Action::ScrollRows(-3)));
        assert!(matches!(app.handle_event(Event::Resize(80, 30)), Action::Resize(30)));
        assert!(matches!(app.handle_event(Event::Tick), Action::None));
    }

    #[test]
    fn cursor_follows_selection() {
        let mut cursor = ListCursor::default();
        cursor.down(7, 10, 5);
        assert_eq!(cursor, ListCursor { index: 7, offset: 3 });
        cursor.up(6);
        assert_eq!(cursor, ListCursor { index: 1, offset: 1 });
        cursor.down(100, 10, 5);
        assert_eq!(cursor, ListCursor { index: 9, offset: 5 });
    }

    #[test]
    fn cursor_scroll_drags_selection() {
        let mut cursor = ListCursor::default();
        cursor.scroll_by(3, 10, 4);
        assert_eq!(cursor, ListCursor { index: 3, offset: 3 });
        cursor.scroll_by(100, 10, 4);
        assert_eq!(cursor, ListCursor { index: 6, offset: 6 });
        cursor.scroll_by(-100, 10, 4);
        assert_eq!(cursor, ListCursor { index: 3, offset: 0 });
    }

    #[tokio::test]
    async fn loads_first_page_on_mount() {
        let (mut app, collection, mut rx) = setup(MockCollection::new(10, 5), Tab::Exhibitions);
        app.update(Action::Resize(28));
        assert!(app.exhibition_list.is_none());

        app.update(Action::Init);
        assert!(app.is_loading());
        assert!(app.countdown_running());
        assert_eq!(app.timer.label, None);

        let action = next_result(&mut rx).await;
        app.update(action);
        assert_eq!(app.exhibitions.state(), PaginationState::Ready { pages: 1 });
        assert_eq!(app.exhibition_list.as_ref().map_or(0, Vec::len), 10);
        assert_eq!(collection.requests(), vec![1]);
    }

    #[tokio::test]
    async fn scrolling_to_the_end_fetches_one_more_page() {
        let (mut app, collection, mut rx) = setup(MockCollection::new(10, 5), Tab::Exhibitions);
        app.update(Action::Resize(28));
        app.update(Action::Init);
        let first = next_result(&mut rx).await;
        app.update(first);

        app.update(Action::GoToBottom);
        assert!(app.exhibitions.is_fetching_next_page());
        app.update(Action::ScrollDown);
        app.update(Action::ScrollRows(9));
        app.update(Action::PageDown);

        let second = next_result(&mut rx).await;
        app.update(second);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(collection.requests(), vec![1, 2]);
        assert_eq!(app.exhibitions.state(), PaginationState::Ready { pages: 2 });
        let ids: Vec<String> = app
            .exhibition_list
            .iter()
            .flatten()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids.first().map(String::as_str), Some("100"));
        assert_eq!(ids[10], "200");
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn short_content_keeps_loading_until_empty_page() {
        let (mut app, collection, mut rx) = setup(MockCollection::new(2, 3), Tab::Exhibitions);
        app.update(Action::Resize(60));
        app.update(Action::Init);
        for _ in 0..4 {
            let action = next_result(&mut rx).await;
            app.update(action);
        }
        assert_eq!(collection.requests(), vec![1, 2, 3, 4]);
        assert!(!app.exhibitions.has_next_page());
        assert_eq!(app.exhibition_list.as_ref().map_or(0, Vec::len), 6);
    }

    #[tokio::test]
    async fn empty_collection_is_distinct_from_loading() {
        let (mut app, collection, mut rx) = setup(MockCollection::new(10, 0), Tab::Exhibitions);
        app.update(Action::Resize(28));
        app.update(Action::Init);
        let action = next_result(&mut rx).await;
        app.update(action);

        assert_eq!(app.exhibition_list, Some(vec![]));
        assert!(!app.is_loading());
        assert_eq!(collection.requests(), vec![1]);
    }

    #[tokio::test]
    async fn unmount_discards_in_flight_page() {
        let (mut app, _, mut rx) = setup(MockCollection::new(10, 5), Tab::Exhibitions);
        app.update(Action::Resize(28));
        app.update(Action::Init);

        app.update(Action::SwitchTab(Tab::Artworks));
        assert!(!app.countdown_running());

        for _ in 0..2 {
            let action = next_result(&mut rx).await;
            app.update(action);
        }
        assert!(app.exhibition_list.is_none());
        assert_eq!(app.exhibitions.state(), PaginationState::Idle);
        assert_eq!(app.artworks.data().map(|d| d.len()), Some(2));

        app.update(Action::SwitchTab(Tab::Exhibitions));
        assert!(app.countdown_running());
        let action = next_result(&mut rx).await;
        app.update(action);
        assert_eq!(app.exhibitions.state(), PaginationState::Ready { pages: 1 });
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_and_pages_untouched() {
        let mock = MockCollection {
            fail: true,
            ..MockCollection::new(10, 5)
        };
        let (mut app, _, mut rx) = setup(mock, Tab::Exhibitions);
        app.update(Action::Init);
        let action = next_result(&mut rx).await;
        app.update(action);

        assert!(app.exhibitions.data().is_none());
        assert!(app.error.as_deref().unwrap().contains("503"));

        app.update(Action::ScrollDown);
        assert_eq!(app.error, None);
    }

    #[tokio::test]
    async fn scrolling_retries_a_failed_first_page() {
        let mock = MockCollection {
            fail: true,
            ..MockCollection::new(10, 5)
        };
        let (mut app, collection, mut rx) = setup(mock, Tab::Exhibitions);
        app.update(Action::Resize(28));
        app.update(Action::Init);
        let action = next_result(&mut rx).await;
        app.update(action);
        assert!(app.exhibition_list.is_none());
        assert!(!app.is_loading());

        app.update(Action::ScrollDown);
        assert!(app.is_loading());
        let action = next_result(&mut rx).await;
        app.update(action);
        assert_eq!(collection.requests(), vec![1, 1]);
        assert!(app.error.is_some());
    }

    #[test]
    fn nothing_is_fetched_before_mount() {
        let (mut app, collection, _rx) = setup(MockCollection::new(10, 5), Tab::Exhibitions);
        app.update(Action::Resize(28));
        app.update(Action::ScrollDown);
        assert!(collection.requests().is_empty());
        assert_eq!(app.exhibitions.state(), PaginationState::Idle);
    }

    #[test]
    fn viewport_depends_on_tab() {
        let (mut app, _, _rx) = setup(MockCollection::new(1, 1), Tab::Artworks);
        app.update(Action::Resize(30));
        assert_eq!(app.viewport_rows(Tab::Exhibitions), 22);
        assert_eq!(app.viewport_rows(Tab::Artworks), 24);
        assert_eq!(app.visible_items(Tab::Exhibitions), 5);
        assert_eq!(app.visible_items(Tab::Artworks), 8);

        app.update(Action::Resize(4));
        assert_eq!(app.viewport_rows(Tab::Artworks), 0);
        assert_eq!(app.visible_items(Tab::Artworks), 1);
    }

    #[test]
    fn open_failures_reach_the_status_bar() {
        let (mut app, _, _rx) = setup(MockCollection::new(1, 1), Tab::Exhibitions);
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no browser found");
        app.update(AtriumError::from(err).into());
        assert_eq!(app.error.as_deref(), Some("IO error: no browser found"));

        app.update(Action::GoToTop);
        assert_eq!(app.error, None);
    }

    #[tokio::test]
    async fn countdown_label_only_while_mounted() {
        let (mut app, _, _rx) = setup(MockCollection::new(1, 1), Tab::Exhibitions);
        app.update(Action::Init);
        let generation = app.countdown_generation;
        app.update(Action::CountdownTick {
            generation,
            label: "1d 2h 3min 4sec".into(),
        });
        assert_eq!(app.timer.label.as_deref(), Some("1d 2h 3min 4sec"));

        app.update(Action::NextTab);
        assert_eq!(app.tab, Tab::Artworks);
        assert_eq!(app.timer.label, None);
        app.update(Action::CountdownTick {
            generation,
            label: "late".into(),
        });
        assert_eq!(app.timer.label, None);
    }

    #[tokio::test]
    async fn remount_ignores_ticks_from_previous_timer() {
        let (mut app, _, _rx) = setup(MockCollection::new(1, 1), Tab::Exhibitions);
        app.update(Action::Init);
        let old = app.countdown_generation;

        app.update(Action::SwitchTab(Tab::Artworks));
        app.update(Action::SwitchTab(Tab::Exhibitions));
        assert!(app.countdown_running());
        assert_ne!(app.countdown_generation, old);

        // Queued by the first timer before it was stopped
        app.update(Action::CountdownTick {
            generation: old,
            label: "88d 15h 35min 17sec".into(),
        });
        assert_eq!(app.timer.label, None);

        let current = app.countdown_generation;
        app.update(Action::CountdownTick {
            generation: current,
            label: "88d 15h 35min 12sec".into(),
        });
        assert_eq!(app.timer.label.as_deref(), Some("88d 15h 35min 12sec"));
    }

    #[tokio::test]
    async fn remount_waits_for_the_new_timer_first_tick() {
        let mut config = Config::default();
        config.countdown.interval_secs = 1;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            Arc::new(MockCollection::new(1, 1)),
            &config,
            Tab::Artworks,
            tx,
        );
        app.update(Action::Init);
        app.update(Action::SwitchTab(Tab::Exhibitions));
        tokio::time::sleep(Duration::from_millis(1100)).await;

        app.update(Action::SwitchTab(Tab::Artworks));
        app.update(Action::SwitchTab(Tab::Exhibitions));
        while let Ok(action) = rx.try_recv() {
            app.update(action);
        }
        assert_eq!(app.timer.label, None);
    }

    #[tokio::test]
    async fn artworks_are_cached_across_tab_switches() {
        let (mut app, _, mut rx) = setup(MockCollection::new(1, 1), Tab::Artworks);
        app.update(Action::Init);
        let action = next_result(&mut rx).await;
        app.update(action);
        assert_eq!(app.artworks.data().map(|d| d.len()), Some(2));

        app.update(Action::SwitchTab(Tab::Exhibitions));
        app.update(Action::SwitchTab(Tab::Artworks));
        assert!(!app.artworks.is_loading());
        assert_eq!(
            app.selected_artwork().and_then(|a| a.image_url()).as_deref(),
            Some("https://www.artic.edu/iiif/2/img-1/full/1680,/0/default.jpg")
        );
    }

    #[tokio::test]
    async fn refresh_restarts_from_page_one() {
        let (mut app, collection, mut rx) = setup(MockCollection::new(10, 5), Tab::Exhibitions);
        app.update(Action::Resize(28));
        app.update(Action::Init);
        let action = next_result(&mut rx).await;
        app.update(action);
        app.update(Action::GoToBottom);
        app.update(Action::Refresh);
        assert_eq!(app.exhibition_cursor, ListCursor::default());

        // Both the orphaned page 2 and the fresh page 1 arrive; only page 1 lands
        for _ in 0..2 {
            let action = next_result(&mut rx).await;
            app.update(action);
        }
        assert_eq!(app.exhibitions.state(), PaginationState::Ready { pages: 1 });
        assert_eq!(app.exhibition_list.as_ref().map_or(0, Vec::len), 10);
        assert_eq!(collection.requests().len(), 3);
    }
}
