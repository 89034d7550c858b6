//! Browser binding: DOM view handles, host bridge, storage, timers, and
//! listener wiring.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host application renders the overlay page in an embedded web view
//! and calls [`mount`] once the DOM is ready. Element handles are resolved a
//! single time and handed to the controller as a [`ChatView`]. Outbound
//! requests go out as JSON POSTs to `https://<resource>/<endpoint>`;
//! inbound host messages arrive on the window `message` event and are fed
//! through a [`QueuedEvents`] source.
//!
//! Pointer-move and pointer-up are attached to the document so a drag keeps
//! tracking after the pointer leaves the panel.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, MessageEvent, MouseEvent,
    Storage, Window,
};

use crate::chat_type::ChatType;
use crate::config::ChatConfig;
use crate::controller::{ChatController, KeyTarget, Ports};
use crate::counter::CounterLevel;
use crate::error::ChatError;
use crate::event::QueuedEvents;
use crate::history::LogEntry;
use crate::position::{KeyValueStore, Point, Position, Size};
use crate::request::{HostBridge, HostRequest};
use crate::view::{ChatView, Clock, Focus, Scheduler, Timer};

const CONTAINER_ID: &str = "chatContainer";
const MESSAGES_ID: &str = "chatMessages";
const INPUT_ID: &str = "chatInput";
const SEND_BUTTON_ID: &str = "sendBtn";
const CLOSE_BUTTON_ID: &str = "closeBtn";
const TYPE_DISPLAY_ID: &str = "chatTypeDisplay";
const CHAR_COUNT_ID: &str = "charCount";
const DRAG_HANDLE_ID: &str = "dragHandle";
const WHISPER_SECTION_ID: &str = "whisperSection";
const WHISPER_INPUT_ID: &str = "whisperInput";
const WHISPER_TARGET_ID: &str = "whisperTarget";
const CANCEL_WHISPER_ID: &str = "cancelWhisper";
const CHAR_COUNTER_SELECTOR: &str = ".char-counter";
const TYPE_BUTTON_SELECTOR: &str = ".chat-type-btn";

type SharedController = Rc<RefCell<Option<ChatController>>>;

fn js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn check(context: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("{context}: {}", js_error(&err));
    }
}

fn cast<T: JsCast>(value: impl JsCast) -> Option<T> {
    match value.dyn_into::<T>() {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

fn with_controller(shared: &SharedController, f: impl FnOnce(&mut ChatController)) {
    match shared.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(controller) = slot.as_mut() {
                f(controller);
            }
        }
        Err(_) => log::warn!("chat controller busy; dropping re-entrant event"),
    }
}

// =============================================================
// Element handles
// =============================================================

/// Every element the overlay touches, resolved once at mount.
#[derive(Clone)]
struct Elements {
    window: Window,
    document: Document,
    container: HtmlElement,
    messages: HtmlElement,
    input: HtmlInputElement,
    send_button: HtmlElement,
    close_button: HtmlElement,
    type_display: Element,
    char_count: Element,
    char_counter: Element,
    drag_handle: HtmlElement,
    whisper_section: HtmlElement,
    whisper_input: HtmlInputElement,
    whisper_target: Element,
    cancel_whisper: HtmlElement,
    type_buttons: Vec<HtmlElement>,
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, ChatError> {
    document
        .get_element_by_id(id)
        .and_then(cast::<T>)
        .ok_or_else(|| ChatError::MissingElement(id.to_owned()))
}

fn by_selector(document: &Document, selector: &str) -> Result<Element, ChatError> {
    match document.query_selector(selector) {
        Ok(Some(el)) => Ok(el),
        Ok(None) | Err(_) => Err(ChatError::MissingElement(selector.to_owned())),
    }
}

fn all_by_selector(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(cast::<HtmlElement>)
        .collect()
}

impl Elements {
    fn resolve(window: Window) -> Result<Self, ChatError> {
        let document = window.document().ok_or_else(|| ChatError::MissingElement("document".to_owned()))?;
        Ok(Self {
            container: by_id(&document, CONTAINER_ID)?,
            messages: by_id(&document, MESSAGES_ID)?,
            input: by_id(&document, INPUT_ID)?,
            send_button: by_id(&document, SEND_BUTTON_ID)?,
            close_button: by_id(&document, CLOSE_BUTTON_ID)?,
            type_display: by_id(&document, TYPE_DISPLAY_ID)?,
            char_count: by_id(&document, CHAR_COUNT_ID)?,
            char_counter: by_selector(&document, CHAR_COUNTER_SELECTOR)?,
            drag_handle: by_id(&document, DRAG_HANDLE_ID)?,
            whisper_section: by_id(&document, WHISPER_SECTION_ID)?,
            whisper_input: by_id(&document, WHISPER_INPUT_ID)?,
            whisper_target: by_id(&document, WHISPER_TARGET_ID)?,
            cancel_whisper: by_id(&document, CANCEL_WHISPER_ID)?,
            type_buttons: all_by_selector(&document, TYPE_BUTTON_SELECTOR),
            document,
            window,
        })
    }
}

// =============================================================
// View
// =============================================================

struct DomView {
    el: Elements,
}

impl DomView {
    fn set_class(element: &Element, class: &str, on: bool) {
        let list = element.class_list();
        let result = if on { list.add_1(class) } else { list.remove_1(class) };
        check("toggle class", result);
    }

    fn div(&self, class: &str, text: &str) -> Result<Element, JsValue> {
        let el = self.el.document.create_element("div")?;
        el.set_class_name(class);
        // Plain text only; message bodies are never parsed as markup.
        el.set_text_content(Some(text));
        Ok(el)
    }

    fn render_entry(&self, entry: &LogEntry) -> Result<Element, JsValue> {
        match entry {
            LogEntry::Chat { sender, chat_type, message, timestamp } => {
                let block = self.div("chat-message", "")?;
                block.append_child(&self.div(&format!("message-sender {}", chat_type.as_str()), sender)?.into())?;
                block.append_child(&self.div("message-text", message)?.into())?;
                block.append_child(&self.div("timestamp", timestamp)?.into())?;
                Ok(block)
            }
            LogEntry::System { message } => self.div("system-message", message),
        }
    }

    fn viewport_axis(value: Result<JsValue, JsValue>) -> f64 {
        match value {
            Ok(v) => v.as_f64().unwrap_or(0.0),
            Err(err) => {
                log::warn!("viewport size unavailable: {}", js_error(&err));
                0.0
            }
        }
    }
}

impl ChatView for DomView {
    fn set_visible(&mut self, visible: bool) {
        Self::set_class(&self.el.container, "active", visible);
    }

    fn set_fading(&mut self, fading: bool) {
        Self::set_class(&self.el.container, "fade-out", fading);
    }

    fn focus(&mut self, target: Focus) {
        let result = match target {
            Focus::Main => self.el.input.focus(),
            Focus::Whisper => self.el.whisper_input.focus(),
        };
        check("focus input", result);
    }

    fn show_chat_type(&mut self, chat_type: ChatType, label: &str) {
        for button in &self.el.type_buttons {
            let active = button.get_attribute("data-type").as_deref() == Some(chat_type.as_str());
            Self::set_class(button, "active", active);
        }
        self.el.type_display.set_text_content(Some(label));
    }

    fn show_counter(&mut self, count: usize, level: CounterLevel) {
        self.el.char_count.set_text_content(Some(&count.to_string()));
        check("reset counter", self.el.char_counter.class_list().remove_2("warning", "danger"));
        if let Some(class) = level.class_name() {
            Self::set_class(&self.el.char_counter, class, true);
        }
    }

    fn clear_main_input(&mut self) {
        self.el.input.set_value("");
    }

    fn clear_whisper_input(&mut self) {
        self.el.whisper_input.set_value("");
    }

    fn show_whisper(&mut self, target_name: &str) {
        self.el.whisper_target.set_text_content(Some(target_name));
        check("show whisper", self.el.whisper_section.style().set_property("display", "flex"));
    }

    fn hide_whisper(&mut self) {
        check("hide whisper", self.el.whisper_section.style().set_property("display", "none"));
    }

    fn append_entry(&mut self, entry: &LogEntry) {
        let result = self.render_entry(entry).and_then(|node| self.el.messages.append_child(&node).map(drop));
        check("append log entry", result);
    }

    fn remove_entry(&mut self, index: usize) {
        let Ok(index) = u32::try_from(index) else {
            return;
        };
        if let Some(node) = self.el.messages.children().item(index) {
            node.remove();
        }
    }

    fn prerendered_entries(&self) -> Vec<String> {
        let children = self.el.messages.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|node| node.text_content().unwrap_or_default())
            .collect()
    }

    fn scroll_to_bottom(&mut self) {
        self.el.messages.set_scroll_top(self.el.messages.scroll_height());
    }

    fn panel_offset(&self) -> Position {
        Position::new(f64::from(self.el.container.offset_left()), f64::from(self.el.container.offset_top()))
    }

    fn panel_size(&self) -> Size {
        Size::new(f64::from(self.el.container.offset_width()), f64::from(self.el.container.offset_height()))
    }

    fn viewport_size(&self) -> Size {
        Size::new(
            Self::viewport_axis(self.el.window.inner_width()),
            Self::viewport_axis(self.el.window.inner_height()),
        )
    }

    fn move_panel(&mut self, position: Position) {
        let style = self.el.container.style();
        check("move panel", style.set_property("left", &format!("{}px", position.left)));
        check("move panel", style.set_property("top", &format!("{}px", position.top)));
    }

    fn set_grabbing(&mut self, grabbing: bool) {
        let cursor = if grabbing { "grabbing" } else { "default" };
        let select = if grabbing { "none" } else { "auto" };
        check("set cursor", self.el.container.style().set_property("cursor", cursor));
        check("set user-select", self.el.drag_handle.style().set_property("user-select", select));
    }
}

// =============================================================
// Bridge, storage, timers, clock
// =============================================================

struct FetchBridge {
    resource_name: String,
}

impl HostBridge for FetchBridge {
    fn post(&mut self, request: HostRequest) {
        let url = request.url(&self.resource_name);
        let endpoint = request.endpoint();
        let body = request.body();
        wasm_bindgen_futures::spawn_local(async move {
            let request = match gloo_net::http::Request::post(&url).json(&body) {
                Ok(request) => request,
                Err(err) => {
                    log::warn!("{}", ChatError::Bridge { endpoint, message: err.to_string() });
                    return;
                }
            };
            // Fire-and-forget: the response body is never read.
            if let Err(err) = request.send().await {
                log::debug!("{}", ChatError::Bridge { endpoint, message: err.to_string() });
            }
        });
    }
}

struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    fn new(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(storage) => storage,
            Err(err) => {
                log::warn!("localStorage unavailable: {}", js_error(&err));
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, ChatError> {
        self.storage.as_ref().ok_or_else(|| ChatError::Storage("localStorage unavailable".to_owned()))
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, ChatError> {
        self.storage()?.get_item(key).map_err(|e| ChatError::Storage(js_error(&e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), ChatError> {
        self.storage()?.set_item(key, value).map_err(|e| ChatError::Storage(js_error(&e)))
    }
}

struct TimeoutScheduler {
    controller: Weak<RefCell<Option<ChatController>>>,
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&mut self, delay_ms: u32, timer: Timer) {
        let controller = Weak::clone(&self.controller);
        Timeout::new(delay_ms, move || {
            if let Some(shared) = controller.upgrade() {
                with_controller(&shared, |c| c.on_timer(timer));
            }
        })
        .forget();
    }
}

struct JsClock;

impl Clock for JsClock {
    fn local_time(&self) -> (u32, u32) {
        let now = js_sys::Date::new_0();
        (now.get_hours(), now.get_minutes())
    }
}

// =============================================================
// Listeners
// =============================================================

fn listen<E>(target: &EventTarget, kind: &str, mut handler: impl FnMut(E) + 'static)
where
    E: JsCast + 'static,
{
    let kind_owned = kind.to_owned();
    let cb = Closure::wrap(Box::new(move |event: Event| match event.dyn_into::<E>() {
        Ok(event) => handler(event),
        Err(_) => log::debug!("unexpected event type for `{kind_owned}` listener"),
    }) as Box<dyn FnMut(Event)>);
    check(
        "add event listener",
        target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref()),
    );
    // Listeners live for the lifetime of the page.
    cb.forget();
}

fn key_target(event: &KeyboardEvent) -> KeyTarget {
    let id = event.target().and_then(cast::<Element>).map(|el| el.id());
    match id.as_deref() {
        Some(INPUT_ID) => KeyTarget::MainInput,
        Some(WHISPER_INPUT_ID) => KeyTarget::WhisperInput,
        _ => KeyTarget::Document,
    }
}

fn pressed_on_button(event: &MouseEvent) -> bool {
    let Some(element) = event.target().and_then(cast::<Element>) else {
        return false;
    };
    matches!(element.closest("button"), Ok(Some(_)))
}

fn pointer(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn wire(shared: &SharedController, el: &Elements) {
    let c = Rc::clone(shared);
    listen(&el.send_button, "click", move |_: MouseEvent| with_controller(&c, ChatController::send_message));

    let c = Rc::clone(shared);
    listen(&el.close_button, "click", move |_: MouseEvent| with_controller(&c, ChatController::close));

    let c = Rc::clone(shared);
    listen(&el.cancel_whisper, "click", move |_: MouseEvent| with_controller(&c, ChatController::cancel_whisper));

    for button in &el.type_buttons {
        let c = Rc::clone(shared);
        let name = button.get_attribute("data-type");
        listen(button, "click", move |_: MouseEvent| {
            with_controller(&c, |ctl| ctl.select_chat_type_name(name.as_deref()));
        });
    }

    let c = Rc::clone(shared);
    let input = el.input.clone();
    listen(&el.input, "input", move |_: Event| with_controller(&c, |ctl| ctl.on_main_input(&input.value())));

    let c = Rc::clone(shared);
    let whisper_input = el.whisper_input.clone();
    listen(&el.whisper_input, "input", move |_: Event| {
        with_controller(&c, |ctl| ctl.on_whisper_input(&whisper_input.value()));
    });

    let c = Rc::clone(shared);
    listen(&el.document, "keydown", move |ev: KeyboardEvent| {
        if ev.is_composing() {
            return;
        }
        let target = key_target(&ev);
        let mut handled = false;
        with_controller(&c, |ctl| handled = ctl.on_key_down(target, &ev.key(), ev.shift_key()));
        if handled {
            ev.prevent_default();
        }
    });

    let c = Rc::clone(shared);
    listen(&el.drag_handle, "mousedown", move |ev: MouseEvent| {
        let on_button = pressed_on_button(&ev);
        with_controller(&c, |ctl| {
            ctl.on_pointer_down(pointer(&ev), on_button);
        });
    });

    let c = Rc::clone(shared);
    listen(&el.document, "mousemove", move |ev: MouseEvent| {
        with_controller(&c, |ctl| ctl.on_pointer_move(pointer(&ev)));
    });

    let c = Rc::clone(shared);
    listen(&el.document, "mouseup", move |_: MouseEvent| with_controller(&c, ChatController::on_pointer_up));

    let c = Rc::clone(shared);
    let queue = Rc::new(RefCell::new(QueuedEvents::new()));
    listen(&el.window, "message", move |ev: MessageEvent| {
        let raw = match js_sys::JSON::stringify(&ev.data()) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("unreadable host message: {}", js_error(&err));
                return;
            }
        };
        // `undefined` and functions stringify to `undefined`, not a string.
        let Some(raw) = raw.as_string() else {
            log::warn!("dropping host message with no JSON form");
            return;
        };
        // Decode failures are logged inside push_json.
        if queue.borrow_mut().push_json(&raw).is_err() {
            return;
        }
        with_controller(&c, |ctl| {
            ctl.drain(&mut *queue.borrow_mut());
        });
    });
}

// =============================================================
// Entry point
// =============================================================

/// Handle to a mounted overlay, owned by the embedding page.
#[wasm_bindgen]
pub struct ChatOverlay {
    controller: SharedController,
}

#[wasm_bindgen]
impl ChatOverlay {
    /// Show the panel.
    pub fn open(&self) {
        with_controller(&self.controller, ChatController::open);
    }

    /// Start closing the panel.
    pub fn close(&self) {
        with_controller(&self.controller, ChatController::close);
    }

    #[wasm_bindgen(js_name = isOpen)]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controller.borrow().as_ref().is_some_and(ChatController::is_open)
    }
}

/// Mount the overlay onto the current page.
///
/// `config_json` optionally overrides [`ChatConfig`] fields.
///
/// # Errors
///
/// Returns an error string if a required element is missing from the page.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<ChatOverlay, JsValue> {
    console_error_panic_hook::set_once();
    let config = ChatConfig::from_json_or_default(config_json.as_deref());
    if let Err(err) = console_log::init_with_level(config.level()) {
        log::debug!("logger already installed: {err}");
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let elements = Elements::resolve(window).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let shared: SharedController = Rc::new(RefCell::new(None));
    let ports = Ports {
        view: Box::new(DomView { el: elements.clone() }),
        bridge: Box::new(FetchBridge { resource_name: config.resource_name.clone() }),
        store: Box::new(LocalStore::new(&elements.window)),
        scheduler: Box::new(TimeoutScheduler { controller: Rc::downgrade(&shared) }),
        clock: Box::new(JsClock),
    };

    wire(&shared, &elements);
    *shared.borrow_mut() = Some(ChatController::new(config, ports));
    log::info!("chat overlay mounted");

    Ok(ChatOverlay { controller: shared })
}
