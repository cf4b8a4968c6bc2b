// Strong typing over strings. Newtypes for timestamps and coordinate spaces,
// tagged enums for modes and emitted commands, validated config sections.

use serde::{Deserialize, Serialize};

/// Timestamp in microseconds, monotonic, supplied by the caller's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_secs(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Microseconds elapsed since `earlier`, saturating at zero.
    pub fn saturating_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Normalized coordinate (0.0 to 1.0 of the source frame, resolution-independent).
/// Clamped to [0, 1] on construction; NaN maps to 0. Deserialization funnels
/// through `new` so host-supplied JSON cannot bypass the clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "CoordRepr")]
pub struct NormalizedCoord {
    pub x: f32,
    pub y: f32,
}

impl NormalizedCoord {
    pub fn new(x: f32, y: f32) -> Self {
        NormalizedCoord {
            x: sanitize_coord(x),
            y: sanitize_coord(y),
        }
    }
}

fn sanitize_coord(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Wire shape for `NormalizedCoord`.
#[derive(Deserialize)]
struct CoordRepr {
    x: f32,
    y: f32,
}

impl From<CoordRepr> for NormalizedCoord {
    fn from(raw: CoordRepr) -> Self {
        NormalizedCoord::new(raw.x, raw.y)
    }
}

/// Denormalized source-frame coordinate in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        PixelPoint { x, y }
    }
}

/// Landmark indices used by the engine (MediaPipe Hands layout, 21 points).
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
}

/// One hand's tracked landmarks for a single video frame.
/// Produced by the external tracker; consumed whole by `process_frame`, never retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// 21 normalized 2-D points in MediaPipe Hands order.
    pub landmarks: [NormalizedCoord; 21],
    /// Source frame width in pixels (for denormalization).
    pub width: u32,
    /// Source frame height in pixels.
    pub height: u32,
    /// Capture timestamp of the frame.
    pub timestamp: Timestamp,
}

impl LandmarkFrame {
    /// Denormalize the landmark at `index` into source-frame pixels.
    pub fn point(&self, index: usize) -> PixelPoint {
        let lm = self.landmarks[index];
        PixelPoint::new(lm.x * self.width as f32, lm.y * self.height as f32)
    }
}

/// Engine mode. Exactly one is active at any time; transitions happen only
/// inside the engine's arbitration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Idle,
    Pointer,
    ScrollMode,
    Dragging,
    Paused,
}

impl Mode {
    /// Short name for UI overlays.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Pointer => "pointer",
            Mode::ScrollMode => "scroll",
            Mode::Dragging => "dragging",
            Mode::Paused => "paused",
        }
    }
}

/// A discrete action for the external input injector. Ephemeral: commands are
/// consumed immediately; the engine never queues beyond the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    MoveTo { x: f32, y: f32 },
    Click,
    DoubleClick,
    RightClick,
    DragStart,
    DragEnd,
    Scroll { amount: i32 },
    PauseToggled { paused: bool },
}

/// Engine configuration, nested to mirror the host's persisted key layout
/// (`cursor.smoothening`, `clicks.left_click_distance`, ...).
/// Immutable per session; call `normalized()` before use.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub cursor: CursorSettings,
    #[serde(default)]
    pub clicks: ClickSettings,
    #[serde(default)]
    pub scroll: ScrollSettings,
    #[serde(default)]
    pub drag: DragSettings,
    #[serde(default)]
    pub accessibility: AccessibilitySettings,
    #[serde(default)]
    pub screen: ScreenSize,
}

/// Cursor mapping and smoothing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorSettings {
    /// Smoothing divisor. Higher = smoother but slower; 1 = no smoothing.
    #[serde(default = "default_smoothening")]
    pub smoothening: f32,
    /// Active-area margin in source-frame pixels. Higher = less hand travel.
    #[serde(default = "default_frame_reduction")]
    pub frame_reduction: f32,
}

impl Default for CursorSettings {
    fn default() -> Self {
        CursorSettings {
            smoothening: default_smoothening(),
            frame_reduction: default_frame_reduction(),
        }
    }
}

fn default_smoothening() -> f32 {
    5.0
}

fn default_frame_reduction() -> f32 {
    100.0
}

/// Click gesture thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickSettings {
    /// Index-thumb pinch distance (px) that counts as a left click.
    #[serde(default = "default_left_click_distance")]
    pub left_click_distance: f32,
    /// Middle-thumb pinch distance (px) that counts as a right click.
    #[serde(default = "default_right_click_distance")]
    pub right_click_distance: f32,
    /// Window between click edges that groups them as a double click.
    #[serde(default = "default_double_click_time")]
    pub double_click_time_us: u64,
}

impl Default for ClickSettings {
    fn default() -> Self {
        ClickSettings {
            left_click_distance: default_left_click_distance(),
            right_click_distance: default_right_click_distance(),
            double_click_time_us: default_double_click_time(),
        }
    }
}

fn default_left_click_distance() -> f32 {
    30.0
}

fn default_right_click_distance() -> f32 {
    40.0
}

fn default_double_click_time() -> u64 {
    300_000 // 300ms
}

/// Scroll gesture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Middle-ring spread (px) below which scroll mode activates.
    #[serde(default = "default_scroll_activation")]
    pub activation_distance: f32,
    /// Minimum vertical movement (px) before a scroll tick fires.
    #[serde(default = "default_scroll_threshold")]
    pub threshold: f32,
    /// Divisor from pixel delta to scroll ticks.
    #[serde(default = "default_scroll_sensitivity")]
    pub sensitivity: f32,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        ScrollSettings {
            activation_distance: default_scroll_activation(),
            threshold: default_scroll_threshold(),
            sensitivity: default_scroll_sensitivity(),
        }
    }
}

fn default_scroll_activation() -> f32 {
    30.0
}

fn default_scroll_threshold() -> f32 {
    20.0
}

fn default_scroll_sensitivity() -> f32 {
    10.0
}

/// Drag-and-drop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragSettings {
    /// How long a pinch must be held before a drag starts.
    #[serde(default = "default_drag_hold")]
    pub hold_duration_us: u64,
    /// Release an active drag when the hand is lost from tracking.
    /// Off by default: brief tracking dropout mid-drag is tolerated.
    #[serde(default)]
    pub release_on_hand_loss: bool,
}

impl Default for DragSettings {
    fn default() -> Self {
        DragSettings {
            hold_duration_us: default_drag_hold(),
            release_on_hand_loss: false,
        }
    }
}

fn default_drag_hold() -> u64 {
    1_000_000 // 1s
}

/// Accessibility settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    /// Fist gesture toggles the engine between paused and active.
    #[serde(default = "default_true")]
    pub enable_pause_gesture: bool,
    /// How long a fist must be held to toggle pause.
    #[serde(default = "default_pause_detection_time")]
    pub pause_detection_time_us: u64,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        AccessibilitySettings {
            enable_pause_gesture: true,
            pause_detection_time_us: default_pause_detection_time(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_pause_detection_time() -> u64 {
    2_000_000 // 2s
}

/// Target pointer-space dimensions (the host screen).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenSize {
    #[serde(default = "default_screen_width")]
    pub width: f32,
    #[serde(default = "default_screen_height")]
    pub height: f32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        ScreenSize {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

fn default_screen_width() -> f32 {
    1920.0
}

fn default_screen_height() -> f32 {
    1080.0
}

impl EngineConfig {
    /// Clamp values to their hard validity floors (divisors stay >= 1,
    /// distances stay >= 0) and warn about values outside the recommended
    /// ranges without altering them. Out-of-range config is never fatal.
    pub fn normalized(mut self) -> EngineConfig {
        self.cursor.smoothening = clamp_min("cursor.smoothening", self.cursor.smoothening, 1.0);
        self.cursor.frame_reduction =
            clamp_min("cursor.frame_reduction", self.cursor.frame_reduction, 0.0);
        self.clicks.left_click_distance =
            clamp_min("clicks.left_click_distance", self.clicks.left_click_distance, 0.0);
        self.clicks.right_click_distance =
            clamp_min("clicks.right_click_distance", self.clicks.right_click_distance, 0.0);
        self.scroll.activation_distance =
            clamp_min("scroll.activation_distance", self.scroll.activation_distance, 0.0);
        self.scroll.threshold = clamp_min("scroll.threshold", self.scroll.threshold, 0.0);
        self.scroll.sensitivity = clamp_min("scroll.sensitivity", self.scroll.sensitivity, 1.0);

        warn_range_f32("cursor.smoothening", self.cursor.smoothening, 1.0, 15.0);
        warn_range_f32("cursor.frame_reduction", self.cursor.frame_reduction, 50.0, 200.0);
        warn_range_f32(
            "clicks.left_click_distance",
            self.clicks.left_click_distance,
            20.0,
            50.0,
        );
        warn_range_f32(
            "clicks.right_click_distance",
            self.clicks.right_click_distance,
            30.0,
            60.0,
        );
        warn_range(
            "clicks.double_click_time_us",
            self.clicks.double_click_time_us,
            100_000,
            500_000,
        );
        warn_range_f32(
            "scroll.activation_distance",
            self.scroll.activation_distance,
            20.0,
            50.0,
        );
        warn_range_f32("scroll.threshold", self.scroll.threshold, 10.0, 40.0);
        warn_range_f32("scroll.sensitivity", self.scroll.sensitivity, 5.0, 20.0);
        warn_range("drag.hold_duration_us", self.drag.hold_duration_us, 500_000, 2_000_000);
        warn_range(
            "accessibility.pause_detection_time_us",
            self.accessibility.pause_detection_time_us,
            1_000_000,
            3_000_000,
        );
        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            log::warn!(
                "screen dimensions {}x{} invalid, using defaults",
                self.screen.width,
                self.screen.height
            );
            self.screen = ScreenSize::default();
        }
        self
    }
}

/// Clamp to the hard floor, warning if the input was below it or non-finite.
fn clamp_min(key: &str, value: f32, min: f32) -> f32 {
    let clamped = if value.is_finite() { value.max(min) } else { min };
    if clamped != value {
        log::warn!("config {key}={value} below hard minimum, clamped to {clamped}");
    }
    clamped
}

/// Warn (without clamping) when a value is outside its recommended range.
fn warn_range_f32(key: &str, value: f32, min: f32, max: f32) {
    if value < min || value > max {
        log::warn!("config {key}={value} outside recommended range [{min}, {max}]");
    }
}

/// Warn (without clamping) when a duration is outside its recommended range.
fn warn_range(key: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        log::warn!("config {key}={value} outside recommended range [{min}, {max}]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_conversions() {
        let ts = Timestamp::from_micros(1_500_000);
        assert_eq!(ts.as_micros(), 1_500_000);
        assert!((ts.as_secs() - 1.5).abs() < 0.0001);
        assert_eq!(ts.saturating_since(Timestamp::from_micros(2_000_000)), 0);
    }

    #[test]
    fn normalized_coord_clamps() {
        let coord = NormalizedCoord::new(1.5, -0.5);
        assert_eq!(coord.x, 1.0);
        assert_eq!(coord.y, 0.0);
    }

    #[test]
    fn deserialization_clamps_coordinates() {
        let c: NormalizedCoord = serde_json::from_str(r#"{"x":7.5,"y":-3.0}"#).unwrap();
        assert_eq!(c.x, 1.0);
        assert_eq!(c.y, 0.0);
    }

    #[test]
    fn non_finite_coordinates_sanitized() {
        let c = NormalizedCoord::new(f32::NAN, f32::INFINITY);
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 1.0);
    }

    #[test]
    fn landmark_frame_denormalizes() {
        let mut landmarks = [NormalizedCoord::default(); 21];
        landmarks[landmark::INDEX_TIP] = NormalizedCoord::new(0.5, 0.25);
        let frame = LandmarkFrame {
            landmarks,
            width: 640,
            height: 480,
            timestamp: Timestamp::from_micros(0),
        };
        let p = frame.point(landmark::INDEX_TIP);
        assert_eq!(p.x, 320.0);
        assert_eq!(p.y, 120.0);
    }

    #[test]
    fn config_defaults_from_empty_json() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.cursor.smoothening, 5.0);
        assert_eq!(config.clicks.left_click_distance, 30.0);
        assert_eq!(config.drag.hold_duration_us, 1_000_000);
        assert!(config.accessibility.enable_pause_gesture);
        assert!(!config.drag.release_on_hand_loss);
    }

    #[test]
    fn normalized_clamps_invalid_values() {
        let mut config = EngineConfig::default();
        config.cursor.smoothening = 0.0; // would divide by zero
        config.clicks.left_click_distance = -10.0;
        config.scroll.sensitivity = 0.5;
        let config = config.normalized();
        assert_eq!(config.cursor.smoothening, 1.0);
        assert_eq!(config.clicks.left_click_distance, 0.0);
        assert_eq!(config.scroll.sensitivity, 1.0);
    }

    #[test]
    fn normalized_keeps_legal_values_outside_recommended_range() {
        let mut config = EngineConfig::default();
        config.clicks.left_click_distance = 55.0;
        config.cursor.smoothening = 20.0;
        config.cursor.frame_reduction = 30.0;
        let config = config.normalized();
        // Recommended-range violations warn but stay untouched.
        assert_eq!(config.clicks.left_click_distance, 55.0);
        assert_eq!(config.cursor.smoothening, 20.0);
        assert_eq!(config.cursor.frame_reduction, 30.0);
    }

    #[test]
    fn normalized_recovers_bad_screen() {
        let mut config = EngineConfig::default();
        config.screen.width = 0.0;
        let config = config.normalized();
        assert_eq!(config.screen.width, 1920.0);
    }

    #[test]
    fn command_json_shape() {
        let json = serde_json::to_string(&Command::Scroll { amount: -2 }).unwrap();
        assert!(json.contains("\"type\":\"Scroll\""));
        assert!(json.contains("\"amount\":-2"));
    }
}
