//! The scheduler: fixed-timestep ticking and per-phase dispatch
//!
//! Lifecycle is `Stopped → Running → Stopped`: [`Game::start`] enters a room
//! and asks the host for the first frame, every [`Game::tick`] runs zero or
//! more fixed updates followed by exactly one draw and asks for the next
//! frame, and [`Game::stop`] withdraws the outstanding request.
//!
//! Dispatch iterates over a snapshot of the handler list taken when the phase
//! starts. Handlers registered during a phase first run in the next pass of
//! that phase; instance handlers whose instance was destroyed earlier in the
//! pass find nothing to act on and return.

use crate::event::{EventType, Handler, HandlerTable};
use crate::game::Game;
use crate::input::InputManagers;
use sprig_core::{ResourceId, Result, SprigError};
use tracing::{debug, info, trace, warn};

/// Scheduler state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

impl Game {
    /// Create and attach the keyboard, mouse and gamepad managers
    pub fn init_input(&mut self) {
        let mut input = InputManagers::new();
        input.attach_all();
        self.input = Some(input);
        debug!("input devices attached");
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frame request the host still owes us a callback for
    pub fn pending_frame(&self) -> Option<crate::host::FrameHandle> {
        self.pending_frame
    }

    /// Enter `room` and begin requesting frames.
    ///
    /// Fails only when the host has no frame service or the room does not
    /// exist; nothing is changed in either case.
    pub fn start(&mut self, room: ResourceId) -> Result<()> {
        if self.frames.is_none() {
            return Err(SprigError::MissingCapability(
                "no frame scheduler installed".into(),
            ));
        }
        if !self.rooms.contains_key(&room) {
            return Err(SprigError::RoomNotFound(room.to_string()));
        }
        self.cancel_pending_frame();
        self.change_room(room);
        self.clock.prime();
        self.state = LoopState::Running;
        self.request_frame();
        info!(%room, frame_time = self.clock.frame_time, "game loop started");
        Ok(())
    }

    /// Stop requesting frames. Ticks delivered afterwards do nothing.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.cancel_pending_frame();
        self.state = LoopState::Stopped;
        info!("game loop stopped");
    }

    /// Host frame callback. Runs as many fixed updates as the elapsed time
    /// covers, then one draw. Returns the number of updates run.
    pub fn tick(&mut self, timestamp: f64) -> u32 {
        if self.state != LoopState::Running {
            return 0;
        }
        self.pending_frame = None;
        self.clock.tick(timestamp);

        let mut updates = 0;
        while self.clock.should_fixed_update() {
            if let Some(max) = self.config.max_updates_per_tick {
                if updates >= max {
                    warn!(
                        backlog_ms = self.clock.accumulator(),
                        "update cap of {} reached, dropping backlog", max
                    );
                    self.clock.discard_backlog();
                    break;
                }
            }
            self.update();
            self.clock.consume_fixed_step();
            updates += 1;
            if self.state != LoopState::Running {
                break;
            }
        }

        self.draw();

        // A handler may have stopped the loop
        if self.state == LoopState::Running {
            self.request_frame();
        }
        updates
    }

    /// One fixed step.
    ///
    /// Order: gamepad poll, CREATE queue, STEP_BEGIN, STEP, STEP_END,
    /// COLLISION, KEYBOARD, MOUSE, OTHER, ASYNC, DESTROY queue, end of step
    /// for every input device. The CREATE and DESTROY queues are taken whole
    /// before they run, so anything queued while they run waits for the next
    /// update.
    pub fn update(&mut self) {
        trace!("update");
        if let Some(input) = self.input.as_mut() {
            input.poll();
        }

        for handler in self.queued.take(EventType::Create) {
            handler.call(self);
        }

        for event in EventType::UPDATE_ORDER {
            self.dispatch(event);
        }

        for handler in self.queued.take(EventType::Destroy) {
            handler.call(self);
        }

        if let Some(input) = self.input.as_mut() {
            input.end_step();
        }
    }

    /// One render pass: frame-begin hook, DRAW, DRAW_GUI, frame-end hook
    pub fn draw(&mut self) {
        self.hooks.begin_frame();
        for event in EventType::DRAW_ORDER {
            self.dispatch(event);
        }
        self.hooks.end_frame();
    }

    /// Run every handler registered for `event`, in registration order
    pub fn dispatch(&mut self, event: EventType) {
        let handlers = self.table(event).snapshot(event);
        for handler in handlers {
            handler.call(self);
        }
    }

    /// Add a handler. CREATE and DESTROY handlers are one-shot: they run at
    /// the next corresponding queue drain and are then dropped.
    pub fn register(&mut self, event: EventType, handler: Handler) {
        self.table_mut(event).register(event, handler);
    }

    /// Remove a handler by identity; unknown handlers are ignored
    pub fn unregister(&mut self, event: EventType, handler: &Handler) -> bool {
        self.table_mut(event).unregister(event, handler)
    }

    pub fn is_registered(&self, event: EventType, handler: &Handler) -> bool {
        self.table(event).contains(event, handler)
    }

    /// Number of handlers registered for `event`
    pub fn handler_count(&self, event: EventType) -> usize {
        self.table(event).len(event)
    }

    /// Make `room` current.
    ///
    /// Every STEP and DRAW registration is dropped, whoever it belongs to; the
    /// entered room's live instances then register again and each gets a
    /// fresh CREATE, replacing any CREATE still queued. Queued DESTROY
    /// callbacks are kept. Unknown rooms are ignored.
    pub fn change_room(&mut self, room: ResourceId) -> bool {
        let Some(speed) = self.rooms.get(&room).map(|r| r.room_speed) else {
            warn!(%room, "change_room to unknown room ignored");
            return false;
        };
        self.update_handlers.clear();
        self.draw_handlers.clear();
        self.queued.take(EventType::Create);
        self.pending_create.clear();
        self.room = Some(room);
        self.clock.set_room_speed(speed);
        self.register_all_instances(room);
        info!(%room, speed, "room entered");
        true
    }

    fn table(&self, event: EventType) -> &HandlerTable {
        if event.is_draw() {
            &self.draw_handlers
        } else if event.is_queued() {
            &self.queued
        } else {
            &self.update_handlers
        }
    }

    fn table_mut(&mut self, event: EventType) -> &mut HandlerTable {
        if event.is_draw() {
            &mut self.draw_handlers
        } else if event.is_queued() {
            &mut self.queued
        } else {
            &mut self.update_handlers
        }
    }

    fn request_frame(&mut self) {
        if let Some(frames) = self.frames.as_mut() {
            self.pending_frame = Some(frames.request_frame());
        }
    }

    fn cancel_pending_frame(&mut self) {
        if let (Some(frames), Some(handle)) = (self.frames.as_mut(), self.pending_frame.take()) {
            frames.cancel_frame(handle);
        }
    }
}
