//! Browser entry point: wires every behavior to the live document.
//!
//! Each behavior installs independently; a failure in one is logged and
//! the rest still run.

pub mod dom;
pub mod logging;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, PageTransitionEvent, Window};

use crate::behaviors::{cart, checkout, confirm, scroll, theme};
use crate::behaviors::{CartAnimator, CheckoutGuard, ConfirmationGuard, ScrollToTop, ThemeController};
use crate::config::{
    BehaviorConfig, CartConfig, CheckoutConfig, ConfirmConfig, ScrollConfig, ThemeConfig,
    CONFIG_ELEMENT_ID,
};
use crate::error::BehaviorError;
use crate::platform::Dialogs;

use dom::{
    BrowserDialogs, BrowserStore, DomElement, MediaColorScheme, TimerScheduler, WindowNavigator,
    WindowViewport,
};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init();

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if document.ready_state() == "loading" {
        let target = document.clone();
        dom::listen_once(&target, "DOMContentLoaded", move |_| {
            PageBehaviorController::new(load_config(&document)).install(&window, &document);
        })
        .forget();
    } else {
        PageBehaviorController::new(load_config(&document)).install(&window, &document);
    }
}

/// Read the page-embedded config document, falling back to defaults
pub fn load_config(document: &Document) -> BehaviorConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return BehaviorConfig::default();
    };

    match BehaviorConfig::from_json(&text) {
        Ok(config) => {
            debug!("Loaded page behavior config");
            config
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            BehaviorConfig::default()
        }
    }
}

/// Listeners a behavior attached; dropping them detaches the behavior
type Listeners = Vec<EventListener>;

pub struct PageBehaviorController {
    config: BehaviorConfig,
}

impl PageBehaviorController {
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    pub fn install(&self, window: &Window, document: &Document) {
        let results = [
            ("theme", install_theme(window, document, &self.config.theme)),
            ("cart", install_cart(window, document, &self.config.cart)),
            (
                "confirm",
                install_confirm(document, &self.config.confirm, BrowserDialogs::new(window)),
            ),
            ("checkout", install_checkout(window, document, &self.config.checkout)),
            ("scroll", install_scroll(window, document, &self.config.scroll)),
        ];

        let mut failed = 0;
        for (behavior, result) in results {
            match result {
                // Page-lifetime listeners: never removed
                Ok(listeners) => listeners.into_iter().for_each(EventListener::forget),
                Err(e) => {
                    warn!(behavior, "Behavior not installed: {}", e);
                    failed += 1;
                }
            }
        }
        info!(failed, "Page behaviors installed");
    }
}

fn install_theme(window: &Window, document: &Document, config: &ThemeConfig) -> Result<Listeners, BehaviorError> {
    let root = document
        .document_element()
        .ok_or_else(|| BehaviorError::MissingElement {
            selector: "html".to_string(),
        })?
        .dyn_into::<HtmlElement>()
        .map_err(|_| BehaviorError::Dom("document root is not an HTMLElement".to_string()))?;
    let toggle = dom::inject_button(document, &theme::TOGGLE_BUTTON)?;
    let scheme = MediaColorScheme::new(window, theme::DARK_SCHEME_QUERY);

    let controller = Rc::new(ThemeController::install(
        BrowserStore::open(window),
        DomElement::from(root),
        toggle.clone(),
        &scheme,
        config.clone(),
    ));
    info!(binding = %theme::BINDING, theme = %controller.current(), "Theme controller installed");

    Ok(vec![dom::listen(toggle.element(), "click", move |_| {
        controller.toggle();
    })])
}

fn install_cart(window: &Window, document: &Document, config: &CartConfig) -> Result<Listeners, BehaviorError> {
    let animator = Rc::new(CartAnimator::new(
        TimerScheduler,
        Rc::new(WindowNavigator::new(window)),
        config.clone(),
    ));

    let mut listeners = {
        let animator = animator.clone();
        let card_selector = config.card_selector.clone();
        let doc = document.clone();
        dom::bind_each(document, &config.trigger_selector, "click", move |event, control| {
            let card = dom::closest(control, &card_selector).map(DomElement::from);
            let target = dom::link_target(&doc, control);
            if animator.on_click(card, target).prevents_default() {
                event.prevent_default();
            }
        })?
    };
    let bound = listeners.len();

    // Leaving the page (including into the back/forward cache) drops any
    // navigation still waiting on its animation
    listeners.push(dom::listen(window, "pagehide", move |_| {
        animator.cancel_pending();
    }));

    info!(binding = %cart::BINDING, bound, "Cart animator installed");
    Ok(listeners)
}

fn install_confirm<D>(document: &Document, config: &ConfirmConfig, dialogs: D) -> Result<Listeners, BehaviorError>
where
    D: Dialogs + 'static,
{
    let guard = ConfirmationGuard::new(config.clone());
    let rules = guard.rules().len();
    let body = dom::body(document)?;

    let listener = dom::delegate(&body, "click", move |event, origin| {
        let verdict = guard.evaluate(|selector| dom::closest(origin, selector).is_some(), &dialogs);
        if verdict.prevents_default() {
            event.prevent_default();
        }
    });

    info!(binding = %confirm::BINDING, rules, "Confirmation guard installed");
    Ok(vec![listener])
}

fn install_checkout(window: &Window, document: &Document, config: &CheckoutConfig) -> Result<Listeners, BehaviorError> {
    let Some(form) = document.get_element_by_id(&config.form_id) else {
        debug!(form_id = %config.form_id, "No checkout form on this page");
        return Ok(Vec::new());
    };

    let submit = form
        .query_selector(&config.submit_selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| BehaviorError::MissingElement {
            selector: format!("#{} {}", config.form_id, config.submit_selector),
        })?;
    let busy = submit
        .query_selector(&config.busy_selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(DomElement::from);
    let has_busy = busy.is_some();

    let guard = Rc::new(CheckoutGuard::new(DomElement::from(submit), busy, config));
    let window = window.clone();
    // Owned by the submit listener and dropped with it
    let recovery: RefCell<Option<EventListener>> = RefCell::new(None);
    let listener = dom::listen(&form, "submit", move |_| {
        if !guard.on_submit() {
            return;
        }
        let guard = guard.clone();
        *recovery.borrow_mut() = Some(dom::listen(&window, "pageshow", move |event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted);
            guard.on_page_show(persisted);
        }));
    });

    info!(binding = %checkout::BINDING, has_busy, "Checkout guard installed");
    Ok(vec![listener])
}

fn install_scroll(window: &Window, document: &Document, config: &ScrollConfig) -> Result<Listeners, BehaviorError> {
    let button = dom::inject_button(document, &scroll::SCROLL_BUTTON)?;
    let control = Rc::new(ScrollToTop::install(
        button.clone(),
        WindowViewport::new(window),
        config,
    ));

    let on_click = {
        let control = control.clone();
        dom::listen(button.element(), "click", move |_| control.on_click())
    };
    let on_scroll = dom::listen(window, "scroll", move |_| {
        control.on_scroll();
    });

    info!(binding = %scroll::BINDING, threshold_px = config.threshold_px, "Scroll-to-top installed");
    Ok(vec![on_click, on_scroll])
}
