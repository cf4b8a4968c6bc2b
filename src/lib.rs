// gesture_core: hand-landmark streams in, debounced pointer commands out.
// The JS host owns the camera, the hand tracker, and the OS-level input
// injector; all gesture state and timing logic lives here.

mod calibration;
mod classifier;
mod engine;
mod error;
mod geometry;
mod mapper;
mod types;

use wasm_bindgen::prelude::*;

pub use calibration::{CalibrationSession, CalibrationStep, ThresholdRecommendation};
pub use classifier::{classify, Primitives, FIST_PROXIMITY_PX};
pub use engine::GestureEngine;
pub use error::EngineError;
pub use geometry::{distance, interpolate};
pub use mapper::PointerMapper;
pub use types::*;

/// Initialize panic hook and console logging for browser diagnostics.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Main engine interface exposed to JavaScript.
/// One call per processed video frame; JSON in, JSON out.
#[wasm_bindgen]
pub struct Engine {
    inner: GestureEngine,
}

#[wasm_bindgen]
impl Engine {
    /// Create an engine from a JSON `EngineConfig`. Missing fields take their
    /// defaults; out-of-range values are clamped with a console warning.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Engine, JsValue> {
        let config: EngineConfig = serde_json::from_str(config_json)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Engine {
            inner: GestureEngine::new(config.normalized()),
        })
    }

    /// Process one frame and return the commands for the injector as JSON.
    ///
    /// `frame_json` is a `LandmarkFrame` object, or `null` when no hand was
    /// detected this frame. `now_us` is the caller's monotonic clock in
    /// microseconds; all hold-duration checks compare against it.
    pub fn process_frame(&mut self, frame_json: &str, now_us: u64) -> Result<String, JsValue> {
        let frame: Option<LandmarkFrame> = serde_json::from_str(frame_json)
            .map_err(|e| EngineError::InvalidFrame(e.to_string()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let commands = self
            .inner
            .process_frame(frame.as_ref(), Timestamp::from_micros(now_us));

        serde_json::to_string(&commands).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current mode name for UI overlays (e.g. a "PAUSED" banner).
    pub fn mode(&self) -> String {
        self.inner.mode().name().to_string()
    }

    /// Release any held state; returns final commands (a `DragEnd` if a drag
    /// was active) as JSON. Call on every exit path so the injector is never
    /// left with a stuck button.
    pub fn shutdown(&mut self) -> Result<String, JsValue> {
        let commands = self.inner.shutdown();
        serde_json::to_string(&commands).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_creation_works() {
        let engine = Engine::new("{}");
        assert!(engine.is_ok());
        let engine = Engine::new(r#"{"cursor":{"smoothening":7.0}}"#);
        assert!(engine.is_ok());
    }

    // Error paths that cross the JsValue boundary only run under a wasm
    // runtime; natively the same rejections are asserted at the serde layer.
    #[test]
    fn malformed_config_fails_to_parse() {
        assert!(serde_json::from_str::<EngineConfig>("not json").is_err());
    }

    #[test]
    fn wrong_landmark_count_fails_to_parse() {
        let json = r#"{"landmarks":[{"x":0.5,"y":0.5}],"width":640,"height":480,"timestamp":0}"#;
        assert!(serde_json::from_str::<LandmarkFrame>(json).is_err());
    }

    #[test]
    fn null_frame_is_a_valid_no_hand_frame() {
        let mut engine = Engine::new("{}").unwrap();
        let out = engine.process_frame("null", 0).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn frame_roundtrip_produces_commands() {
        let mut engine = Engine::new("{}").unwrap();
        let landmarks: Vec<NormalizedCoord> =
            (0..21).map(|i| NormalizedCoord::new(i as f32 / 40.0, 0.5)).collect();
        let frame = LandmarkFrame {
            landmarks: landmarks.try_into().unwrap(),
            width: 640,
            height: 480,
            timestamp: Timestamp::from_micros(0),
        };
        let json = serde_json::to_string(&frame).unwrap();
        let out = engine.process_frame(&json, 0).unwrap();
        let commands: Vec<Command> = serde_json::from_str(&out).unwrap();
        assert!(commands
            .iter()
            .any(|c| matches!(c, Command::MoveTo { .. })));
    }

    #[test]
    fn shutdown_reports_commands_as_json() {
        let mut engine = Engine::new("{}").unwrap();
        let out = engine.shutdown().unwrap();
        assert_eq!(out, "[]");
    }
}
