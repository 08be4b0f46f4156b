//! Floating scroll-to-top button.

use tracing::debug;

use crate::binding::Binding;
use crate::config::ScrollConfig;
use crate::platform::{FloatingButton, PageElement, Viewport};

pub const BINDING: Binding = Binding::AtInit;

// `mb-5` lifts it above the theme toggle, which shares the corner
pub const SCROLL_BUTTON: FloatingButton = FloatingButton {
    id: "scroll-to-top",
    class: "btn btn-primary position-fixed bottom-0 end-0 m-3 mb-5",
    aria_label: "Scroll to top",
    icon_html: r#"<i class="bi bi-arrow-up"></i>"#,
};

/// Visible only strictly past the threshold: 300.0 itself is hidden
pub fn is_visible(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

pub struct ScrollToTop<E, V> {
    button: E,
    viewport: V,
    threshold: f64,
}

impl<E: PageElement, V: Viewport> ScrollToTop<E, V> {
    /// Wrap the injected button and sync its visibility to the current offset
    pub fn install(button: E, viewport: V, config: &ScrollConfig) -> Self {
        let control = Self {
            button,
            viewport,
            threshold: config.threshold_px,
        };
        control.on_scroll();
        control
    }

    /// Recompute visibility. Runs on every scroll event, unthrottled.
    pub fn on_scroll(&self) -> bool {
        let visible = is_visible(self.viewport.scroll_offset(), self.threshold);
        self.button
            .set_style_property("display", if visible { "block" } else { "none" });
        visible
    }

    pub fn on_click(&self) {
        debug!("Scrolling to top");
        self.viewport.scroll_to_top();
    }
}
