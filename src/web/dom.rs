//! web-sys implementations of the platform ports, plus listener helpers.

use std::rc::Rc;
use std::time::Duration;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use tracing::warn;
use url::Url;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, MediaQueryList,
    ScrollBehavior, ScrollToOptions, Storage, Window,
};

use crate::behaviors::cart;
use crate::error::BehaviorError;
use crate::platform::{
    ColorScheme, Dialogs, FloatingButton, MemoryStore, Navigator, PageElement, PreferenceStore,
    Scheduler, TaskHandle, Viewport,
};

/// An element of the live document
#[derive(Clone)]
pub struct DomElement(HtmlElement);

impl From<HtmlElement> for DomElement {
    fn from(el: HtmlElement) -> Self {
        Self(el)
    }
}

impl DomElement {
    pub fn element(&self) -> &HtmlElement {
        &self.0
    }
}

impl PageElement for DomElement {
    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(e) = self.0.set_attribute(name, value) {
            warn!("setAttribute({}) failed: {}", name, BehaviorError::from(e));
        }
    }

    fn add_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().add_1(class) {
            warn!("classList.add({}) failed: {}", class, BehaviorError::from(e));
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(e) = self.0.class_list().remove_1(class) {
            warn!("classList.remove({}) failed: {}", class, BehaviorError::from(e));
        }
    }

    fn style_property(&self, property: &str) -> String {
        self.0
            .style()
            .get_property_value(property)
            .unwrap_or_default()
    }

    fn set_style_property(&self, property: &str, value: &str) {
        let style = self.0.style();
        // An empty value clears the inline declaration
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(e) = result {
            warn!("style.{} update failed: {}", property, BehaviorError::from(e));
        }
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn set_disabled(&self, disabled: bool) {
        if let Err(e) = self.0.toggle_attribute_with_force("disabled", disabled) {
            warn!("Toggling disabled failed: {}", BehaviorError::from(e));
        }
    }

    fn is_same_element(&self, other: &Self) -> bool {
        let other: &web_sys::Node = &other.0;
        self.0.is_same_node(Some(other))
    }
}

/// localStorage, or an in-memory map when the browser refuses access
/// (storage disabled, sandboxed frames).
pub enum BrowserStore {
    Local(Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open(window: &Window) -> Self {
        match window.local_storage() {
            Ok(Some(storage)) => BrowserStore::Local(storage),
            Ok(None) => {
                warn!("localStorage unavailable, theme preference will not persist");
                BrowserStore::Memory(MemoryStore::new())
            }
            Err(e) => {
                warn!(
                    "localStorage access denied, theme preference will not persist: {}",
                    BehaviorError::from(e)
                );
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, BehaviorError> {
        match self {
            BrowserStore::Local(storage) => storage
                .get_item(key)
                .map_err(|e| BehaviorError::Storage(BehaviorError::from(e).to_string())),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BehaviorError> {
        match self {
            BrowserStore::Local(storage) => storage
                .set_item(key, value)
                .map_err(|e| BehaviorError::Storage(BehaviorError::from(e).to_string())),
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }
}

/// `prefers-color-scheme` media query
pub struct MediaColorScheme(Option<MediaQueryList>);

impl MediaColorScheme {
    pub fn new(window: &Window, query: &str) -> Self {
        Self(window.match_media(query).ok().flatten())
    }
}

impl ColorScheme for MediaColorScheme {
    fn prefers_dark(&self) -> bool {
        self.0.as_ref().is_some_and(MediaQueryList::matches)
    }
}

pub struct BrowserDialogs(Window);

impl BrowserDialogs {
    pub fn new(window: &Window) -> Self {
        Self(window.clone())
    }
}

impl Dialogs for BrowserDialogs {
    fn confirm(&self, message: &str) -> bool {
        // A browser that refuses to show the prompt never confirms
        self.0.confirm_with_message(message).unwrap_or_else(|e| {
            warn!("confirm() unavailable: {}", BehaviorError::from(e));
            false
        })
    }
}

pub struct WindowNavigator(Window);

impl WindowNavigator {
    pub fn new(window: &Window) -> Self {
        Self(window.clone())
    }
}

impl Navigator for WindowNavigator {
    fn navigate(&self, href: &str) {
        if let Err(e) = self.0.location().set_href(href) {
            warn!("Navigation to {} failed: {}", href, BehaviorError::from(e));
        }
    }
}

impl TaskHandle for Timeout {
    fn cancel(self) {
        // Dropping a gloo timeout clears it
        drop(self);
    }
}

/// `setTimeout` on the page's event loop
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    type Handle = Timeout;

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}

pub struct WindowViewport(Window);

impl WindowViewport {
    pub fn new(window: &Window) -> Self {
        Self(window.clone())
    }
}

impl Viewport for WindowViewport {
    fn scroll_offset(&self) -> f64 {
        self.0.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.0.scroll_to_with_scroll_to_options(&options);
    }
}

pub fn body(document: &Document) -> Result<HtmlElement, BehaviorError> {
    document.body().ok_or_else(|| BehaviorError::MissingElement {
        selector: "body".to_string(),
    })
}

/// Create a floating button and append it to `<body>`
pub fn inject_button(document: &Document, spec: &FloatingButton) -> Result<DomElement, BehaviorError> {
    let button = document
        .create_element("button")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| BehaviorError::Dom("created <button> is not an HTMLElement".to_string()))?;
    button.set_id(spec.id);
    button.set_class_name(spec.class);
    button.set_attribute("type", "button")?;
    button.set_attribute("aria-label", spec.aria_label)?;
    button.set_inner_html(spec.icon_html);
    body(document)?.append_child(&button)?;
    Ok(DomElement(button))
}

/// Nearest inclusive ancestor matching `selector`
pub fn closest(el: &Element, selector: &str) -> Option<HtmlElement> {
    match el.closest(selector) {
        Ok(found) => found.and_then(|e| e.dyn_into::<HtmlElement>().ok()),
        Err(e) => {
            warn!("Invalid selector `{}`: {}", selector, BehaviorError::from(e));
            None
        }
    }
}

/// The control's `href`, resolved against the document base URL
pub fn link_target(document: &Document, control: &Element) -> Option<Url> {
    let href = control.get_attribute("href")?;
    let base = document.base_uri().ok().flatten()?;
    match cart::resolve_target(&base, &href) {
        Ok(target) => target,
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Attach a listener that may cancel the event's default action.
///
/// gloo registers passive listeners unless told otherwise, and a passive
/// listener's `preventDefault()` is ignored.
pub fn listen<F>(target: &EventTarget, event: &'static str, handler: F) -> EventListener
where
    F: FnMut(&Event) + 'static,
{
    EventListener::new_with_options(
        target,
        event,
        EventListenerOptions::enable_prevent_default(),
        handler,
    )
}

/// Attach a listener that is removed after its first call
pub fn listen_once<F>(target: &EventTarget, event: &'static str, handler: F) -> EventListener
where
    F: FnOnce(&Event) + 'static,
{
    EventListener::once(target, event, handler)
}

/// Bind-at-init: one listener per element matching `selector` right now.
/// Elements inserted later get nothing.
pub fn bind_each<F>(
    document: &Document,
    selector: &str,
    event: &'static str,
    handler: F,
) -> Result<Vec<EventListener>, BehaviorError>
where
    F: Fn(&Event, &HtmlElement) + 'static,
{
    let handler = Rc::new(handler);
    let nodes = document.query_selector_all(selector)?;
    let mut listeners = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let handler = handler.clone();
        let target = el.clone();
        listeners.push(listen(&el, event, move |e| handler(e, &target)));
    }
    Ok(listeners)
}

/// Delegate-from-ancestor: one listener on `ancestor`, called with the
/// element the event originated from.
pub fn delegate<F>(ancestor: &EventTarget, event: &'static str, mut handler: F) -> EventListener
where
    F: FnMut(&Event, &Element) + 'static,
{
    listen(ancestor, event, move |e| {
        if let Some(origin) = event_origin(e) {
            handler(e, &origin);
        }
    })
}

/// The element an event was dispatched at; text node targets resolve to
/// their containing element.
fn event_origin(event: &Event) -> Option<Element> {
    match event.target()?.dyn_into::<Element>() {
        Ok(el) => Some(el),
        Err(t) => t.dyn_into::<web_sys::Node>().ok()?.parent_element(),
    }
}
