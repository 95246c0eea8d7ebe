//! Event categories and handler tables

use crate::game::Game;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Dispatch category. The update-phase order is fixed; see [`Game::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Create,
    Destroy,
    StepBegin,
    Step,
    StepEnd,
    Collision,
    Keyboard,
    Mouse,
    Other,
    Async,
    Draw,
    DrawGui,
}

impl EventType {
    /// Categories dispatched between the CREATE and DESTROY queues, in order
    pub const UPDATE_ORDER: [EventType; 8] = [
        EventType::StepBegin,
        EventType::Step,
        EventType::StepEnd,
        EventType::Collision,
        EventType::Keyboard,
        EventType::Mouse,
        EventType::Other,
        EventType::Async,
    ];

    /// Categories dispatched by [`Game::draw`], in order
    pub const DRAW_ORDER: [EventType; 2] = [EventType::Draw, EventType::DrawGui];

    /// Draw-phase categories live in the draw table
    pub fn is_draw(self) -> bool {
        matches!(self, EventType::Draw | EventType::DrawGui)
    }

    /// CREATE and DESTROY lists are one-shot queues, drained once per update
    pub fn is_queued(self) -> bool {
        matches!(self, EventType::Create | EventType::Destroy)
    }
}

/// A callback registered with the scheduler.
///
/// Handlers compare by identity: two handlers are equal only if one is a clone
/// of the other. Anything that wants to unregister later must keep the handler
/// it registered.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&mut Game)>);

impl Handler {
    pub fn new(f: impl Fn(&mut Game) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, game: &mut Game) {
        (self.0)(game)
    }

    pub fn same(&self, other: &Handler) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Ordered handler lists keyed by event type
#[derive(Default)]
pub struct HandlerTable {
    lists: HashMap<EventType, Vec<Handler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Registering the same handler twice makes it run twice.
    pub fn register(&mut self, event: EventType, handler: Handler) {
        self.lists.entry(event).or_default().push(handler);
    }

    /// Remove every registration of `handler` under `event`.
    /// Returns false if nothing matched.
    pub fn unregister(&mut self, event: EventType, handler: &Handler) -> bool {
        let Some(list) = self.lists.get_mut(&event) else {
            return false;
        };
        let before = list.len();
        list.retain(|h| !h.same(handler));
        list.len() != before
    }

    /// Copy of the list as it stands now, for dispatch
    pub fn snapshot(&self, event: EventType) -> Vec<Handler> {
        self.lists.get(&event).cloned().unwrap_or_default()
    }

    /// Remove and return the whole list
    pub fn take(&mut self, event: EventType) -> Vec<Handler> {
        self.lists.remove(&event).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }

    pub fn len(&self, event: EventType) -> usize {
        self.lists.get(&event).map_or(0, Vec::len)
    }

    pub fn contains(&self, event: EventType, handler: &Handler) -> bool {
        self.lists
            .get(&event)
            .is_some_and(|list| list.iter().any(|h| h.same(handler)))
    }

    pub fn is_empty(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }
}
