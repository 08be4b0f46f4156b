//! In-memory fakes for the platform ports.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use std::time::Duration;

use crate::error::BehaviorError;
use crate::platform::{
    ColorScheme, Dialogs, Navigator, PageElement, PreferenceStore, Scheduler, TaskHandle,
    Viewport,
};

#[derive(Debug, Default)]
struct ElementState {
    attributes: HashMap<String, String>,
    classes: BTreeSet<String>,
    style: HashMap<String, String>,
    inner_html: String,
    disabled: bool,
}

/// Shared-state element: clones observe the same node
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    state: Rc<RefCell<ElementState>>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classes(classes: &[&str]) -> Self {
        let el = Self::new();
        for class in classes {
            el.add_class(class);
        }
        el
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.state.borrow().classes.contains(class)
    }

    pub fn inner_html(&self) -> String {
        self.state.borrow().inner_html.clone()
    }

    pub fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }
}

impl PageElement for FakeElement {
    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&self, class: &str) {
        self.state.borrow_mut().classes.insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.state.borrow_mut().classes.remove(class);
    }

    fn style_property(&self, property: &str) -> String {
        self.state
            .borrow()
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style_property(&self, property: &str, value: &str) {
        self.state
            .borrow_mut()
            .style
            .insert(property.to_string(), value.to_string());
    }

    fn set_inner_html(&self, html: &str) {
        self.state.borrow_mut().inner_html = html.to_string();
    }

    fn set_disabled(&self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }

    fn is_same_element(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Store whose writes always fail (storage disabled by the browser)
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    pub value: Option<String>,
}

impl PreferenceStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, BehaviorError> {
        Ok(self.value.clone())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), BehaviorError> {
        Err(BehaviorError::Storage("QuotaExceededError".to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedScheme(pub bool);

impl ColorScheme for FixedScheme {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

/// Answers prompts from a script and records every message shown
#[derive(Debug, Default)]
pub struct FakeDialogs {
    answers: RefCell<Vec<bool>>,
    pub prompts: RefCell<Vec<String>>,
}

impl FakeDialogs {
    /// Answers are consumed in order; once exhausted every prompt is accepted
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().rev().copied().collect()),
            prompts: RefCell::default(),
        }
    }
}

impl Dialogs for FakeDialogs {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop().unwrap_or(true)
    }
}

#[derive(Debug, Default)]
pub struct FakeNavigator {
    pub visited: RefCell<Vec<String>>,
}

impl Navigator for FakeNavigator {
    fn navigate(&self, href: &str) {
        self.visited.borrow_mut().push(href.to_string());
    }
}

struct ScheduledTask {
    due: Duration,
    task: Option<Box<dyn FnOnce()>>,
    cancelled: Rc<Cell<bool>>,
}

/// Virtual-time scheduler: tasks run only when [`FakeScheduler::advance`] passes their due time
#[derive(Default)]
pub struct FakeScheduler {
    now: Cell<Duration>,
    tasks: RefCell<Vec<ScheduledTask>>,
}

pub struct FakeHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle for FakeHandle {
    fn cancel(self) {
        self.cancelled.set(true);
    }
}

impl FakeScheduler {
    pub fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);

        let due: Vec<Box<dyn FnOnce()>> = self
            .tasks
            .borrow_mut()
            .iter_mut()
            .filter(|t| t.due <= now && !t.cancelled.get())
            .filter_map(|t| t.task.take())
            .collect();
        for task in due {
            task();
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| t.task.is_some() && !t.cancelled.get())
            .count()
    }
}

impl Scheduler for FakeScheduler {
    type Handle = FakeHandle;

    fn defer(&self, delay: Duration, task: Box<dyn FnOnce()>) -> FakeHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(ScheduledTask {
            due: self.now.get() + delay,
            task: Some(task),
            cancelled: cancelled.clone(),
        });
        FakeHandle { cancelled }
    }
}

#[derive(Debug, Default)]
pub struct FakeViewport {
    pub offset: Cell<f64>,
    pub scroll_requests: Cell<usize>,
}

impl Viewport for FakeViewport {
    fn scroll_offset(&self) -> f64 {
        self.offset.get()
    }

    fn scroll_to_top(&self) {
        self.scroll_requests.set(self.scroll_requests.get() + 1);
        self.offset.set(0.0);
    }
}
