//! The chat panel state machine.
//!
//! `ChatController` owns every piece of overlay state: lifecycle, selected
//! chat type, composition buffers, whisper target, the bounded log, and the
//! drag session. It is driven from a single event loop by host events,
//! keyboard and pointer input, input edits, and timer callbacks. Outbound
//! requests are handed to the [`HostBridge`] and never awaited.
//!
//! LIFECYCLE
//! =========
//! `Closed -> Open -> Closing -> Closed`. Closing starts the fade and
//! notifies the host at once; the panel is hidden when the close timer
//! fires. Each close bumps a generation counter so a stale timer (from a
//! close that was followed by a re-open) never hides the panel.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::chat_type::ChatType;
use crate::config::ChatConfig;
use crate::consts::EMPTY_MESSAGE_NOTICE;
use crate::counter::{self, CounterLevel, CounterThresholds};
use crate::event::{EventSource, InboundEvent, IncomingMessage, TargetId};
use crate::history::{LogEntry, MessageLog};
use crate::position::{self, DragState, KeyValueStore, Point, Position};
use crate::request::{HostBridge, HostRequest};
use crate::view::{self, ChatView, Clock, Focus, Scheduler, Timer};
use crate::whisper::WhisperState;

/// Visibility lifecycle of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Closed,
    Open,
    /// Fading out; becomes `Closed` when the close timer fires.
    Closing,
}

/// Where a key event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    MainInput,
    WhisperInput,
    /// Anywhere else in the document.
    Document,
}

/// External collaborators injected at construction.
pub struct Ports {
    pub view: Box<dyn ChatView>,
    pub bridge: Box<dyn HostBridge>,
    pub store: Box<dyn KeyValueStore>,
    pub scheduler: Box<dyn Scheduler>,
    pub clock: Box<dyn Clock>,
}

/// The overlay controller. See the module docs.
pub struct ChatController {
    config: ChatConfig,
    lifecycle: Lifecycle,
    close_generation: u64,
    chat_type: ChatType,
    main_buffer: String,
    whisper_buffer: String,
    whisper: WhisperState,
    log: MessageLog,
    drag: DragState,
    position: Option<Position>,
    ports: Ports,
}

impl ChatController {
    /// Create a controller and run startup: adopt any log nodes the page
    /// already rendered, request the chat backlog from the host, then
    /// restore the persisted panel position.
    #[must_use]
    pub fn new(config: ChatConfig, ports: Ports) -> Self {
        let log = MessageLog::new(config.max_log_entries, config.eviction);
        let mut controller = Self {
            config,
            lifecycle: Lifecycle::Closed,
            close_generation: 0,
            chat_type: ChatType::default(),
            main_buffer: String::new(),
            whisper_buffer: String::new(),
            whisper: WhisperState::default(),
            log,
            drag: DragState::Idle,
            position: None,
            ports,
        };
        controller.adopt_prerendered();
        controller.post(HostRequest::GetChatHistory);
        controller.restore_position();
        log::debug!("chat controller mounted");
        controller
    }

    /// Mirror nodes already in the log container as system entries so the
    /// log and the page keep the same length and order.
    fn adopt_prerendered(&mut self) {
        let texts = self.ports.view.prerendered_entries();
        if texts.is_empty() {
            return;
        }
        log::debug!("adopting {} pre-rendered log nodes", texts.len());
        for message in texts {
            if let Some(index) = self.log.push(LogEntry::System { message }) {
                self.ports.view.remove_entry(index);
            }
        }
    }

    fn post(&mut self, request: HostRequest) {
        log::debug!("posting {} to host", request.endpoint());
        self.ports.bridge.post(request);
    }

    fn restore_position(&mut self) {
        match position::load_position(self.ports.store.as_ref(), &self.config.position_key) {
            Ok(Some(pos)) => {
                self.ports.view.move_panel(pos);
                self.position = Some(pos);
            }
            Ok(None) => {}
            Err(err) => log::error!("failed to load chat position: {err}"),
        }
    }

    // --- Inbound events ---

    /// Apply one host event.
    pub fn handle_event(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Open => self.open(),
            InboundEvent::Close => self.close(),
            InboundEvent::Message(msg) => self.add_message(msg),
            InboundEvent::System { message } => self.add_system_message(&message),
            InboundEvent::Whisper { target_id, target_name } => self.start_whisper(target_id, target_name),
        }
    }

    /// Apply every pending event from `source`. Returns how many were applied.
    pub fn drain(&mut self, source: &mut dyn EventSource) -> usize {
        let mut applied = 0;
        while let Some(event) = source.next_event() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    // --- Lifecycle ---

    /// Show the panel and focus the main input. No-op while open.
    pub fn open(&mut self) {
        if self.lifecycle == Lifecycle::Open {
            return;
        }
        self.lifecycle = Lifecycle::Open;
        self.ports.view.set_visible(true);
        self.ports.view.set_fading(false);
        self.ports.view.focus(Focus::Main);
        log::debug!("chat opened");
    }

    /// Start the close fade and notify the host. No-op unless open.
    pub fn close(&mut self) {
        if self.lifecycle != Lifecycle::Open {
            return;
        }
        self.lifecycle = Lifecycle::Closing;
        self.close_generation += 1;
        self.ports.view.set_fading(true);
        self.ports
            .scheduler
            .schedule(self.config.close_delay_ms, Timer::FinishClose { generation: self.close_generation });
        self.post(HostRequest::CloseChat);
        log::debug!("chat closing");
    }

    /// Handle a fired timer.
    pub fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::FinishClose { generation } => {
                if self.lifecycle != Lifecycle::Closing || generation != self.close_generation {
                    return;
                }
                self.lifecycle = Lifecycle::Closed;
                self.ports.view.set_visible(false);
                self.ports.view.set_fading(false);
                log::debug!("chat closed");
            }
            Timer::ScrollToBottom => self.ports.view.scroll_to_bottom(),
        }
    }

    // --- Chat type ---

    /// Select the channel attached to outgoing messages.
    pub fn select_chat_type(&mut self, chat_type: ChatType) {
        self.chat_type = chat_type;
        self.ports.view.show_chat_type(chat_type, chat_type.label());
        self.ports.view.focus(Focus::Main);
    }

    /// Select by wire name; unrecognized names select `local`.
    pub fn select_chat_type_name(&mut self, name: Option<&str>) {
        self.select_chat_type(ChatType::from_name_or_local(name));
    }

    // --- Composition ---

    /// Record an edit of the main input and refresh the counter.
    pub fn on_main_input(&mut self, text: &str) {
        text.clone_into(&mut self.main_buffer);
        let count = counter::input_length(text);
        let level = self.thresholds().level(count);
        self.ports.view.show_counter(count, level);
    }

    /// Record an edit of the whisper input.
    pub fn on_whisper_input(&mut self, text: &str) {
        text.clone_into(&mut self.whisper_buffer);
    }

    fn thresholds(&self) -> CounterThresholds {
        CounterThresholds {
            warning_above: self.config.counter_warning_above,
            danger_above: self.config.counter_danger_above,
        }
    }

    /// Send the main buffer on the selected channel.
    pub fn send_message(&mut self) {
        let message = self.main_buffer.trim().to_owned();
        if message.is_empty() {
            self.add_system_message(EMPTY_MESSAGE_NOTICE);
            return;
        }
        self.post(HostRequest::SendMessage { chat_type: self.chat_type, message });
        self.main_buffer.clear();
        self.ports.view.clear_main_input();
        self.ports.view.show_counter(0, CounterLevel::Neutral);
        self.ports.view.focus(Focus::Main);
    }

    // --- Whisper ---

    /// Enter whisper mode for `target_id`. Only reachable from a host event.
    pub fn start_whisper(&mut self, target_id: TargetId, target_name: String) {
        self.ports.view.show_whisper(&target_name);
        self.whisper.start(target_id, target_name);
        self.ports.view.focus(Focus::Whisper);
    }

    /// Send the whisper buffer to the current target and leave whisper mode.
    pub fn send_whisper(&mut self) {
        let message = self.whisper_buffer.trim().to_owned();
        if message.is_empty() {
            self.add_system_message(EMPTY_MESSAGE_NOTICE);
            return;
        }
        if let Some(target_id) = self.whisper.target_id().cloned() {
            self.post(HostRequest::SendWhisper { target_id, message });
        } else {
            log::debug!("whisper send with no target; dropping");
        }
        self.whisper_buffer.clear();
        self.ports.view.clear_whisper_input();
        self.cancel_whisper();
    }

    /// Leave whisper mode without sending.
    pub fn cancel_whisper(&mut self) {
        self.whisper.clear();
        self.ports.view.hide_whisper();
        self.ports.view.focus(Focus::Main);
    }

    // --- Log ---

    /// Append a chat message stamped with the local time.
    pub fn add_message(&mut self, msg: IncomingMessage) {
        let (hour, minute) = self.ports.clock.local_time();
        self.append(LogEntry::Chat {
            sender: msg.sender,
            chat_type: msg.chat_type,
            message: msg.message,
            timestamp: view::format_timestamp(hour, minute),
        });
    }

    /// Append a system notice.
    pub fn add_system_message(&mut self, message: &str) {
        self.append(LogEntry::System { message: message.to_owned() });
    }

    fn append(&mut self, entry: LogEntry) {
        self.ports.view.append_entry(&entry);
        if let Some(index) = self.log.push(entry) {
            self.ports.view.remove_entry(index);
        }
        self.ports.scheduler.schedule(self.config.scroll_delay_ms, Timer::ScrollToBottom);
    }

    // --- Keyboard ---

    /// Handle a key press. Returns `true` when the key was consumed and the
    /// default action should be suppressed.
    pub fn on_key_down(&mut self, target: KeyTarget, key: &str, shift: bool) -> bool {
        match (key, target) {
            ("Enter", KeyTarget::MainInput) if !shift => {
                self.send_message();
                true
            }
            ("Enter", KeyTarget::WhisperInput) => {
                self.send_whisper();
                true
            }
            ("Escape", _) if self.lifecycle == Lifecycle::Open => {
                self.close();
                true
            }
            _ => false,
        }
    }

    // --- Drag ---

    /// Pointer pressed on the drag handle. Presses on a button inside the
    /// handle are ignored. Returns `true` when a drag started.
    pub fn on_pointer_down(&mut self, pointer: Point, on_button: bool) -> bool {
        if on_button {
            return false;
        }
        self.drag = DragState::start(pointer, self.ports.view.panel_offset());
        self.ports.view.set_grabbing(true);
        true
    }

    /// Pointer moved anywhere in the document.
    pub fn on_pointer_move(&mut self, pointer: Point) {
        let viewport = self.ports.view.viewport_size();
        let panel = self.ports.view.panel_size();
        if let Some(pos) = self.drag.update(pointer, viewport, panel) {
            self.ports.view.move_panel(pos);
            self.position = Some(pos);
        }
    }

    /// Pointer released anywhere in the document. Persists the final offset.
    pub fn on_pointer_up(&mut self) {
        let Some(pos) = self.drag.finish() else {
            return;
        };
        self.ports.view.set_grabbing(false);
        self.position = Some(pos);
        if let Err(err) = position::save_position(self.ports.store.as_mut(), &self.config.position_key, pos) {
            log::warn!("failed to save chat position: {err}");
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    #[must_use]
    pub fn chat_type(&self) -> ChatType {
        self.chat_type
    }

    #[must_use]
    pub fn main_buffer(&self) -> &str {
        &self.main_buffer
    }

    #[must_use]
    pub fn whisper_buffer(&self) -> &str {
        &self.whisper_buffer
    }

    #[must_use]
    pub fn whisper(&self) -> &WhisperState {
        &self.whisper
    }

    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    #[must_use]
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Last known panel position: restored, dragged, or `None` for the
    /// stylesheet default.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    #[must_use]
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}
