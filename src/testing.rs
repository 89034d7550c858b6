//! Recording port doubles shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::chat_type::ChatType;
use crate::config::ChatConfig;
use crate::controller::{ChatController, Ports};
use crate::counter::CounterLevel;
use crate::error::ChatError;
use crate::history::LogEntry;
use crate::position::{KeyValueStore, MemoryStore, Position, Size};
use crate::request::{HostBridge, HostRequest};
use crate::view::{ChatView, Clock, Focus, Scheduler, Timer};

/// Everything the recording view has been told.
#[derive(Debug)]
pub struct ViewRecord {
    pub visible: bool,
    pub fading: bool,
    pub focus: Option<Focus>,
    pub focus_calls: usize,
    pub chat_type: ChatType,
    pub label: String,
    pub counter: (usize, CounterLevel),
    pub main_input_cleared: usize,
    pub whisper_input_cleared: usize,
    pub whisper_target: Option<String>,
    pub entries: Vec<LogEntry>,
    pub scrolls: usize,
    pub panel: Position,
    pub panel_size: Size,
    pub viewport: Size,
    pub moves: Vec<Position>,
    pub grabbing: bool,
}

impl Default for ViewRecord {
    fn default() -> Self {
        Self {
            visible: false,
            fading: false,
            focus: None,
            focus_calls: 0,
            chat_type: ChatType::Local,
            label: "LOCAL".to_owned(),
            counter: (0, CounterLevel::Neutral),
            main_input_cleared: 0,
            whisper_input_cleared: 0,
            whisper_target: None,
            entries: Vec::new(),
            scrolls: 0,
            panel: Position::new(20.0, 20.0),
            panel_size: Size::new(300.0, 400.0),
            viewport: Size::new(1000.0, 800.0),
            moves: Vec::new(),
            grabbing: false,
        }
    }
}

pub struct RecordingView(pub Rc<RefCell<ViewRecord>>);

impl ChatView for RecordingView {
    fn set_visible(&mut self, visible: bool) {
        self.0.borrow_mut().visible = visible;
    }

    fn set_fading(&mut self, fading: bool) {
        self.0.borrow_mut().fading = fading;
    }

    fn focus(&mut self, target: Focus) {
        let mut v = self.0.borrow_mut();
        v.focus = Some(target);
        v.focus_calls += 1;
    }

    fn show_chat_type(&mut self, chat_type: ChatType, label: &str) {
        let mut v = self.0.borrow_mut();
        v.chat_type = chat_type;
        label.clone_into(&mut v.label);
    }

    fn show_counter(&mut self, count: usize, level: CounterLevel) {
        self.0.borrow_mut().counter = (count, level);
    }

    fn clear_main_input(&mut self) {
        self.0.borrow_mut().main_input_cleared += 1;
    }

    fn clear_whisper_input(&mut self) {
        self.0.borrow_mut().whisper_input_cleared += 1;
    }

    fn show_whisper(&mut self, target_name: &str) {
        self.0.borrow_mut().whisper_target = Some(target_name.to_owned());
    }

    fn hide_whisper(&mut self) {
        self.0.borrow_mut().whisper_target = None;
    }

    fn append_entry(&mut self, entry: &LogEntry) {
        self.0.borrow_mut().entries.push(entry.clone());
    }

    fn remove_entry(&mut self, index: usize) {
        self.0.borrow_mut().entries.remove(index);
    }

    fn prerendered_entries(&self) -> Vec<String> {
        self.0.borrow().entries.iter().map(|e| e.message().to_owned()).collect()
    }

    fn scroll_to_bottom(&mut self) {
        self.0.borrow_mut().scrolls += 1;
    }

    fn panel_offset(&self) -> Position {
        self.0.borrow().panel
    }

    fn panel_size(&self) -> Size {
        self.0.borrow().panel_size
    }

    fn viewport_size(&self) -> Size {
        self.0.borrow().viewport
    }

    fn move_panel(&mut self, position: Position) {
        let mut v = self.0.borrow_mut();
        v.panel = position;
        v.moves.push(position);
    }

    fn set_grabbing(&mut self, grabbing: bool) {
        self.0.borrow_mut().grabbing = grabbing;
    }
}

pub struct RecordingBridge(pub Rc<RefCell<Vec<HostRequest>>>);

impl HostBridge for RecordingBridge {
    fn post(&mut self, request: HostRequest) {
        self.0.borrow_mut().push(request);
    }
}

pub struct RecordingScheduler(pub Rc<RefCell<Vec<(u32, Timer)>>>);

impl Scheduler for RecordingScheduler {
    fn schedule(&mut self, delay_ms: u32, timer: Timer) {
        self.0.borrow_mut().push((delay_ms, timer));
    }
}

pub struct SharedStore(pub Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, ChatError> {
        self.0.borrow().get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), ChatError> {
        self.0.borrow_mut().set_item(key, value)
    }
}

/// A store whose every operation fails.
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, ChatError> {
        Err(ChatError::Storage("quota exceeded".to_owned()))
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), ChatError> {
        Err(ChatError::Storage("quota exceeded".to_owned()))
    }
}

pub struct FixedClock(pub u32, pub u32);

impl Clock for FixedClock {
    fn local_time(&self) -> (u32, u32) {
        (self.0, self.1)
    }
}

/// A controller wired to recording ports.
pub struct Harness {
    pub controller: ChatController,
    pub view: Rc<RefCell<ViewRecord>>,
    pub requests: Rc<RefCell<Vec<HostRequest>>>,
    pub timers: Rc<RefCell<Vec<(u32, Timer)>>>,
    pub store: Rc<RefCell<MemoryStore>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self::build(ChatConfig::default(), store)
    }

    pub fn build(config: ChatConfig, store: MemoryStore) -> Self {
        Self::build_on_page(config, store, &[])
    }

    /// Mount over a page whose log already holds `prerendered` nodes.
    pub fn with_prerendered(prerendered: &[&str]) -> Self {
        Self::build_on_page(ChatConfig::default(), MemoryStore::new(), prerendered)
    }

    pub fn build_on_page(config: ChatConfig, store: MemoryStore, prerendered: &[&str]) -> Self {
        let entries = prerendered.iter().map(|text| LogEntry::System { message: (*text).to_owned() }).collect();
        let view = Rc::new(RefCell::new(ViewRecord { entries, ..ViewRecord::default() }));
        let requests = Rc::new(RefCell::new(Vec::new()));
        let timers = Rc::new(RefCell::new(Vec::new()));
        let store = Rc::new(RefCell::new(store));
        let ports = Ports {
            view: Box::new(RecordingView(Rc::clone(&view))),
            bridge: Box::new(RecordingBridge(Rc::clone(&requests))),
            store: Box::new(SharedStore(Rc::clone(&store))),
            scheduler: Box::new(RecordingScheduler(Rc::clone(&timers))),
            clock: Box::new(FixedClock(9, 5)),
        };
        let controller = ChatController::new(config, ports);
        Self { controller, view, requests, timers, store }
    }

    /// Drain recorded requests.
    pub fn take_requests(&self) -> Vec<HostRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    /// Drain pending timers without firing them.
    pub fn take_timers(&self) -> Vec<(u32, Timer)> {
        std::mem::take(&mut *self.timers.borrow_mut())
    }

    /// Fire every pending timer in scheduling order.
    pub fn fire_timers(&mut self) {
        for (_, timer) in self.take_timers() {
            self.controller.on_timer(timer);
        }
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.borrow().get_item(key).unwrap_or_default()
    }
}
