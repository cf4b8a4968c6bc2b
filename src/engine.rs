// Mode arbitration and event debouncing.
// One discriminated Mode plus edge-triggered flags and wall-clock timer
// comparisons; no sleeps, no blocking, nothing fallible on the frame path.

use crate::classifier::{classify, Primitives};
use crate::mapper::PointerMapper;
use crate::types::{landmark, Command, EngineConfig, LandmarkFrame, Mode, Timestamp};

/// The gesture engine: turns per-frame landmark observations into debounced
/// pointer commands. Single-threaded and frame-driven; one instance per
/// tracked stream.
pub struct GestureEngine {
    config: EngineConfig,
    mapper: PointerMapper,
    mode: Mode,
    /// Mode to restore when a pause toggle lifts `Paused`.
    resume_mode: Mode,
    /// Armed while the left pinch is held, for drag-hold detection.
    pinch_start: Option<Timestamp>,
    /// Time of the last emitted click, for the double-click window.
    /// Cleared after a double click so a third edge starts fresh.
    last_click: Option<Timestamp>,
    /// Armed while a fist is held, for pause-hold detection.
    fist_start: Option<Timestamp>,
    /// Middle-fingertip y (px) at the last frame in scroll mode.
    prev_scroll_y: Option<f32>,
    left_was_active: bool,
    right_was_active: bool,
}

impl GestureEngine {
    /// Build an engine from an already-normalized config.
    pub fn new(config: EngineConfig) -> Self {
        let mapper = PointerMapper::new(config.cursor.clone(), config.screen.clone());
        GestureEngine {
            config,
            mapper,
            mode: Mode::Idle,
            resume_mode: Mode::Idle,
            pinch_start: None,
            last_click: None,
            fist_start: None,
            prev_scroll_y: None,
            left_was_active: false,
            right_was_active: false,
        }
    }

    /// Current mode, for UI overlays. Observational only.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Process one frame. `None` means no hand was detected this frame.
    /// Returns the commands to hand to the input injector, in order.
    pub fn process_frame(&mut self, frame: Option<&LandmarkFrame>, now: Timestamp) -> Vec<Command> {
        let mut out = Vec::new();

        let Some(frame) = frame else {
            self.on_hand_lost(&mut out);
            return out;
        };

        let prim = classify(frame);

        // Pause pre-empts everything else. A fist also satisfies the scroll
        // spread condition (curled fingers sit together), so while one is held
        // only pause detection runs; the prior mode stays untouched until the
        // hold qualifies.
        if self.config.accessibility.enable_pause_gesture && self.update_pause(&prim, now, &mut out)
        {
            return out;
        }
        if self.mode == Mode::Paused {
            return out;
        }

        // Scroll and drag manipulate the same two fingers' neighborhood and
        // are mutually exclusive; scroll wins.
        if prim.spread_middle_ring < self.config.scroll.activation_distance {
            self.update_scroll(frame, &mut out);
            return out;
        }
        if self.mode == Mode::ScrollMode {
            self.prev_scroll_y = None;
            self.set_mode(Mode::Pointer);
        }

        // Pointer movement.
        let tip = frame.landmarks[landmark::INDEX_TIP];
        let (x, y) = self.mapper.update(tip, frame.width, frame.height);
        out.push(Command::MoveTo { x, y });
        if self.mode == Mode::Idle {
            self.set_mode(Mode::Pointer);
        }

        self.update_drag(&prim, now, &mut out);
        self.update_clicks(&prim, now, &mut out);
        out
    }

    /// Release any held OS-level state. Must run on every host exit path so
    /// the injector is never left with a stuck button.
    pub fn shutdown(&mut self) -> Vec<Command> {
        let mut out = Vec::new();
        if self.mode == Mode::Dragging {
            out.push(Command::DragEnd);
        }
        self.pinch_start = None;
        self.prev_scroll_y = None;
        self.fist_start = None;
        self.set_mode(Mode::Idle);
        out
    }

    /// No hand this frame: disarm transient timers and edge flags. An active
    /// drag is held through the dropout unless configured otherwise.
    fn on_hand_lost(&mut self, out: &mut Vec<Command>) {
        self.pinch_start = None;
        self.prev_scroll_y = None;
        self.fist_start = None;
        self.left_was_active = false;
        self.right_was_active = false;

        match self.mode {
            Mode::Pointer | Mode::ScrollMode => self.set_mode(Mode::Idle),
            Mode::Dragging if self.config.drag.release_on_hand_loss => {
                out.push(Command::DragEnd);
                self.set_mode(Mode::Idle);
            }
            _ => {}
        }
    }

    /// Fist-hold pause toggle. Returns true whenever a fist is present this
    /// frame (held or toggling), in which case nothing else runs.
    fn update_pause(&mut self, prim: &Primitives, now: Timestamp, out: &mut Vec<Command>) -> bool {
        if !prim.fist {
            self.fist_start = None;
            return false;
        }
        // A fist hides the pinch fingers from the drag and click steps, so
        // their timer and edge state reset exactly as on hand loss. Otherwise
        // a pinch engaged before the fist would leave a stale hold timer (or a
        // stale was-active flag) behind for the next pinch.
        self.pinch_start = None;
        self.left_was_active = false;
        self.right_was_active = false;
        let Some(start) = self.fist_start else {
            self.fist_start = Some(now);
            return true;
        };
        if now.saturating_since(start) < self.config.accessibility.pause_detection_time_us {
            return true;
        }

        // Qualifying hold: toggle and disarm. A continued hold re-arms next
        // frame and can toggle again after another full hold.
        self.fist_start = None;
        if self.mode == Mode::Paused {
            let resume = self.resume_mode;
            self.set_mode(resume);
            out.push(Command::PauseToggled { paused: false });
        } else {
            if self.mode == Mode::Dragging {
                out.push(Command::DragEnd);
                self.set_mode(Mode::Pointer);
            }
            self.prev_scroll_y = None;
            self.resume_mode = self.mode;
            self.set_mode(Mode::Paused);
            out.push(Command::PauseToggled { paused: true });
        }
        true
    }

    /// Scroll mode: force-release a drag on entry, then emit threshold-gated
    /// tick deltas from middle-fingertip vertical motion.
    fn update_scroll(&mut self, frame: &LandmarkFrame, out: &mut Vec<Command>) {
        if self.mode == Mode::Dragging {
            out.push(Command::DragEnd);
            self.pinch_start = None;
        }
        if self.mode != Mode::ScrollMode {
            self.prev_scroll_y = None;
            self.set_mode(Mode::ScrollMode);
        }

        let y = frame.point(landmark::MIDDLE_TIP).y;
        if let Some(prev) = self.prev_scroll_y {
            let delta = prev - y; // positive = upward motion
            if delta.abs() > self.config.scroll.threshold {
                let amount = (delta / self.config.scroll.sensitivity) as i32;
                if amount != 0 {
                    out.push(Command::Scroll { amount });
                }
            }
        }
        self.prev_scroll_y = Some(y);
    }

    /// Pinch-hold drag lifecycle. The pinch timer is armed on engage and
    /// disarmed unconditionally on release so a stale timer can never start a
    /// drag from an unrelated future pinch.
    fn update_drag(&mut self, prim: &Primitives, now: Timestamp, out: &mut Vec<Command>) {
        if prim.pinch_index_thumb < self.config.clicks.left_click_distance {
            match self.pinch_start {
                None => self.pinch_start = Some(now),
                Some(start)
                    if self.mode != Mode::Dragging
                        && now.saturating_since(start) >= self.config.drag.hold_duration_us =>
                {
                    out.push(Command::DragStart);
                    self.set_mode(Mode::Dragging);
                }
                Some(_) => {}
            }
        } else {
            if self.mode == Mode::Dragging {
                out.push(Command::DragEnd);
                self.set_mode(Mode::Pointer);
            }
            self.pinch_start = None;
        }
    }

    /// Edge-triggered click emission. Right click is checked first and takes
    /// precedence when both pinch conditions hold in the same frame.
    fn update_clicks(&mut self, prim: &Primitives, now: Timestamp, out: &mut Vec<Command>) {
        let right_held = prim.pinch_middle_thumb < self.config.clicks.right_click_distance;
        if right_held && self.mode != Mode::Dragging && !self.right_was_active {
            out.push(Command::RightClick);
            self.right_was_active = true;
        } else if !right_held {
            self.right_was_active = false;
        }

        let left_held = prim.pinch_index_thumb < self.config.clicks.left_click_distance;
        if left_held && self.mode != Mode::Dragging && !right_held && !self.left_was_active {
            match self.last_click {
                Some(last)
                    if now.saturating_since(last) < self.config.clicks.double_click_time_us =>
                {
                    out.push(Command::DoubleClick);
                    // Guard against a third click being grouped as a triple.
                    self.last_click = None;
                }
                _ => {
                    out.push(Command::Click);
                    self.last_click = Some(now);
                }
            }
            self.left_was_active = true;
        } else if !left_held {
            self.left_was_active = false;
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("mode {} -> {}", self.mode.name(), mode.name());
            self.mode = mode;
        }
    }
}
