//! "Add to cart" click animation.
//!
//! A click on an add-to-cart control is held back: the enclosing product
//! card shrinks briefly, then the browser follows the control's link.
//! Handlers are bound per control at install time, so controls rendered
//! later navigate without the animation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::binding::Binding;
use crate::config::CartConfig;
use crate::error::BehaviorError;
use crate::platform::{Navigator, PageElement, Scheduler, TaskHandle};

pub const BINDING: Binding = Binding::AtInit;

const TRANSFORM: &str = "transform";

/// What the caller must do with the click's default action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Default prevented; navigation fires after the animation delay
    Deferred,
    /// Default prevented; navigated at once (no card to animate)
    Immediate,
    /// Not intercepted; the default action proceeds
    PassThrough,
}

impl ClickOutcome {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, ClickOutcome::PassThrough)
    }
}

/// Resolve a control's link target against the document URL.
///
/// Only http(s) targets are followed programmatically; anything else
/// (`javascript:`, `mailto:`) is left to the browser.
pub fn resolve_target(base: &str, href: &str) -> Result<Option<Url>, BehaviorError> {
    let base = Url::parse(base).map_err(|source| BehaviorError::InvalidTarget {
        href: base.to_string(),
        source,
    })?;
    let target = base.join(href).map_err(|source| BehaviorError::InvalidTarget {
        href: href.to_string(),
        source,
    })?;
    Ok(matches!(target.scheme(), "http" | "https").then_some(target))
}

struct PendingNavigation<H, E> {
    handle: H,
    fired: Rc<Cell<bool>>,
    card: E,
    /// Inline transform the card had before its first pending click
    original: String,
}

pub struct CartAnimator<S: Scheduler, N, E> {
    scheduler: S,
    navigator: Rc<N>,
    config: CartConfig,
    pending: RefCell<Vec<PendingNavigation<S::Handle, E>>>,
}

impl<S, N, E> CartAnimator<S, N, E>
where
    S: Scheduler,
    N: Navigator + 'static,
    E: PageElement + Clone + 'static,
{
    pub fn new(scheduler: S, navigator: Rc<N>, config: CartConfig) -> Self {
        Self {
            scheduler,
            navigator,
            config,
            pending: RefCell::new(Vec::new()),
        }
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.config.delay_ms))
    }

    /// Handle a click on an add-to-cart control.
    ///
    /// `card` is the enclosing product card, `target` the control's
    /// resolved link. The shrink is undone right before navigating.
    pub fn on_click(&self, card: Option<E>, target: Option<Url>) -> ClickOutcome {
        let Some(target) = target else {
            debug!("Add-to-cart control has no followable target, not intercepting");
            return ClickOutcome::PassThrough;
        };

        let Some(card) = card else {
            warn!(
                "Add-to-cart control outside `{}`, navigating without animation",
                self.config.card_selector
            );
            self.navigator.navigate(target.as_str());
            return ClickOutcome::Immediate;
        };

        let mut pending = self.pending.borrow_mut();
        pending.retain(|p| !p.fired.get());

        // A card still shrunk by an earlier click keeps that click's original
        let original = pending
            .iter()
            .find(|p| p.card.is_same_element(&card))
            .map(|p| p.original.clone())
            .unwrap_or_else(|| card.style_property(TRANSFORM));
        card.add_class(&self.config.marker_class);
        card.set_style_property(TRANSFORM, &self.config.shrink_transform);

        let fired = Rc::new(Cell::new(false));
        let task = {
            let card = card.clone();
            let original = original.clone();
            let navigator = self.navigator.clone();
            let fired = fired.clone();
            Box::new(move || {
                fired.set(true);
                card.set_style_property(TRANSFORM, &original);
                navigator.navigate(target.as_str());
            })
        };
        let handle = self.scheduler.defer(self.delay(), task);
        pending.push(PendingNavigation {
            handle,
            fired,
            card,
            original,
        });

        debug!(delay_ms = self.config.delay_ms, "Add-to-cart navigation deferred");
        ClickOutcome::Deferred
    }

    /// Cancel every navigation still waiting on its delay and put the cards
    /// back. Called when the page is hidden, so a page restored from the
    /// back/forward cache never fires a stale navigation.
    pub fn cancel_pending(&self) -> usize {
        let drained: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let mut cancelled = 0;
        for p in drained {
            if p.fired.get() {
                continue;
            }
            p.handle.cancel();
            p.card.set_style_property(TRANSFORM, &p.original);
            p.card.remove_class(&self.config.marker_class);
            cancelled += 1;
        }
        if cancelled > 0 {
            debug!(cancelled, "Cancelled pending add-to-cart navigations");
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, FakeNavigator, FakeScheduler};

    const BASE: &str = "https://shop.example/products";

    type TestAnimator = CartAnimator<Rc<FakeScheduler>, FakeNavigator, FakeElement>;

    fn animator() -> (TestAnimator, Rc<FakeScheduler>, Rc<FakeNavigator>) {
        let scheduler = Rc::new(FakeScheduler::default());
        let navigator = Rc::new(FakeNavigator::default());
        let animator = CartAnimator::new(scheduler.clone(), navigator.clone(), CartConfig::default());
        (animator, scheduler, navigator)
    }

    fn target(href: &str) -> Option<Url> {
        resolve_target(BASE, href).unwrap()
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(
            target("/cart/add/7").unwrap().as_str(),
            "https://shop.example/cart/add/7"
        );
        assert_eq!(
            target("https://other.example/x").unwrap().as_str(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_resolve_skips_non_http_schemes() {
        assert_eq!(target("javascript:void(0)"), None);
        assert_eq!(target("mailto:sales@shop.example"), None);
    }

    #[test]
    fn test_resolve_rejects_bad_base() {
        let err = resolve_target("not a url", "/cart").unwrap_err();
        assert!(matches!(err, BehaviorError::InvalidTarget { .. }));
    }

    #[test]
    fn test_navigation_waits_for_delay() {
        let (animator, scheduler, navigator) = animator();
        let card = FakeElement::with_classes(&["product-card"]);
        card.set_style_property("transform", "rotate(1deg)");

        let outcome = animator.on_click(Some(card.clone()), target("/cart/add/7"));
        assert_eq!(outcome, ClickOutcome::Deferred);
        assert!(outcome.prevents_default());

        assert!(card.has_class("adding-to-cart"));
        assert_eq!(card.style_property("transform"), "scale(0.95)");
        assert!(navigator.visited.borrow().is_empty());

        scheduler.advance(Duration::from_millis(299));
        assert!(navigator.visited.borrow().is_empty());
        assert_eq!(card.style_property("transform"), "scale(0.95)");

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(
            navigator.visited.borrow().as_slice(),
            ["https://shop.example/cart/add/7"]
        );
        assert_eq!(card.style_property("transform"), "rotate(1deg)");
    }

    #[test]
    fn test_restores_empty_transform() {
        let (animator, scheduler, _) = animator();
        let card = FakeElement::new();
        animator.on_click(Some(card.clone()), target("/cart/add/1"));
        scheduler.advance(Duration::from_millis(300));
        assert_eq!(card.style_property("transform"), "");
    }

    #[test]
    fn test_missing_card_navigates_immediately() {
        let (animator, scheduler, navigator) = animator();
        let outcome = animator.on_click(None, target("/cart/add/2"));
        assert_eq!(outcome, ClickOutcome::Immediate);
        assert_eq!(navigator.visited.borrow().len(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_missing_target_passes_through() {
        let (animator, scheduler, navigator) = animator();
        let card = FakeElement::new();
        let outcome = animator.on_click(Some(card.clone()), None);
        assert_eq!(outcome, ClickOutcome::PassThrough);
        assert!(!outcome.prevents_default());
        assert!(!card.has_class("adding-to-cart"));
        assert_eq!(scheduler.pending(), 0);
        assert!(navigator.visited.borrow().is_empty());
    }

    #[test]
    fn test_cancel_pending_restores_card() {
        let (animator, scheduler, navigator) = animator();
        let card = FakeElement::new();
        card.set_style_property("transform", "none");
        animator.on_click(Some(card.clone()), target("/cart/add/3"));

        assert_eq!(animator.cancel_pending(), 1);
        assert_eq!(card.style_property("transform"), "none");
        assert!(!card.has_class("adding-to-cart"));

        scheduler.advance(Duration::from_secs(1));
        assert!(navigator.visited.borrow().is_empty());
    }

    #[test]
    fn test_double_click_then_pagehide_restores_original() {
        let (animator, scheduler, navigator) = animator();
        let card = FakeElement::new();

        animator.on_click(Some(card.clone()), target("/cart/add/7"));
        scheduler.advance(Duration::from_millis(100));
        animator.on_click(Some(card.clone()), target("/cart/add/7"));

        // First navigation fires, the second is still waiting
        scheduler.advance(Duration::from_millis(200));
        assert_eq!(navigator.visited.borrow().len(), 1);
        assert_eq!(card.style_property("transform"), "");

        assert_eq!(animator.cancel_pending(), 1);
        assert_eq!(card.style_property("transform"), "");
        assert!(!card.has_class("adding-to-cart"));

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(navigator.visited.borrow().len(), 1);
    }

    #[test]
    fn test_double_click_keeps_first_original() {
        let (animator, scheduler, _) = animator();
        let card = FakeElement::new();
        card.set_style_property("transform", "rotate(2deg)");

        animator.on_click(Some(card.clone()), target("/cart/add/8"));
        animator.on_click(Some(card.clone()), target("/cart/add/8"));
        scheduler.advance(Duration::from_millis(300));
        assert_eq!(card.style_property("transform"), "rotate(2deg)");
    }

    #[test]
    fn test_clicks_on_different_cards_restore_independently() {
        let (animator, _, _) = animator();
        let first = FakeElement::new();
        let second = FakeElement::new();
        second.set_style_property("transform", "none");

        animator.on_click(Some(first.clone()), target("/cart/add/1"));
        animator.on_click(Some(second.clone()), target("/cart/add/2"));
        assert_eq!(animator.cancel_pending(), 2);
        assert_eq!(first.style_property("transform"), "");
        assert_eq!(second.style_property("transform"), "none");
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let (animator, scheduler, navigator) = animator();
        let card = FakeElement::new();
        animator.on_click(Some(card.clone()), target("/cart/add/4"));
        scheduler.advance(Duration::from_millis(300));

        assert_eq!(animator.cancel_pending(), 0);
        assert_eq!(navigator.visited.borrow().len(), 1);
        assert!(card.has_class("adding-to-cart"));
    }

    #[test]
    fn test_configured_delay() {
        let scheduler = Rc::new(FakeScheduler::default());
        let navigator = Rc::new(FakeNavigator::default());
        let config = CartConfig {
            delay_ms: 50,
            ..CartConfig::default()
        };
        let animator: TestAnimator = CartAnimator::new(scheduler.clone(), navigator.clone(), config);
        animator.on_click(Some(FakeElement::new()), target("/cart/add/5"));

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(navigator.visited.borrow().len(), 1);
    }
}
