//! Host-facing hooks: frame scheduling and the renderer's drawing entry points

use sprig_core::{Color, ResourceId};

/// Opaque handle for an outstanding frame request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's animation-frame service.
///
/// A browser host maps this onto `requestAnimationFrame`; a headless host can
/// use [`ManualFrames`] and call [`Game::tick`](crate::Game::tick) itself.
pub trait FrameScheduler {
    /// Ask for one more frame callback
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request made earlier. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame scheduler for headless runs and tests: it only records requests
#[derive(Debug, Default)]
pub struct ManualFrames {
    next: u64,
    outstanding: Option<FrameHandle>,
    pub requested: u64,
    pub cancelled: u64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> Option<FrameHandle> {
        self.outstanding
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next);
        self.outstanding = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
            self.cancelled += 1;
        }
    }
}

/// Arguments of the renderer's extended sprite draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawSpriteExt {
    pub sprite: ResourceId,
    pub subimg: f64,
    pub x: f64,
    pub y: f64,
    pub xscale: f64,
    pub yscale: f64,
    /// Degrees, counter-clockwise
    pub rotation: f64,
    pub blend: Color,
    pub alpha: f64,
}

type DrawSpriteFn = Box<dyn FnMut(&DrawSpriteExt)>;
type FrameHookFn = Box<dyn FnMut()>;

/// Entry points installed by the renderer. All optional; absent hooks make
/// drawing a no-op.
#[derive(Default)]
pub struct RenderHooks {
    draw_sprite_ext: Option<DrawSpriteFn>,
    frame_begin: Option<FrameHookFn>,
    frame_end: Option<FrameHookFn>,
}

impl RenderHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_draw_sprite_ext(&mut self, f: impl FnMut(&DrawSpriteExt) + 'static) {
        self.draw_sprite_ext = Some(Box::new(f));
    }

    /// Callbacks run immediately before and after the draw lists
    pub fn set_frame_hooks(&mut self, begin: impl FnMut() + 'static, end: impl FnMut() + 'static) {
        self.frame_begin = Some(Box::new(begin));
        self.frame_end = Some(Box::new(end));
    }

    /// Forward to the renderer; returns false when no renderer is installed
    pub fn draw_sprite_ext(&mut self, args: &DrawSpriteExt) -> bool {
        match self.draw_sprite_ext.as_mut() {
            Some(f) => {
                f(args);
                true
            }
            None => false,
        }
    }

    pub(crate) fn begin_frame(&mut self) {
        if let Some(f) = self.frame_begin.as_mut() {
            f();
        }
    }

    pub(crate) fn end_frame(&mut self) {
        if let Some(f) = self.frame_end.as_mut() {
            f();
        }
    }
}
