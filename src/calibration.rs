// Offline threshold calibration: collect gated distance samples per step and
// recommend thresholds sized to the user's hand. Runs on the same primitives
// as the real-time engine but never on its frame path.

use serde::{Deserialize, Serialize};

use crate::classifier::Primitives;

/// Margin above the sample mean, in standard deviations.
const RECOMMEND_SIGMA: f32 = 1.5;

/// The fixed calibration step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CalibrationStep {
    /// Index finger and thumb pinched together.
    #[default]
    LeftPinch,
    /// Index finger and thumb spread apart.
    OpenHand,
    /// Middle finger and thumb pinched together.
    RightPinch,
    /// Middle and ring fingers brought together.
    ScrollSpread,
    /// All fingers open wide.
    WideOpen,
    Done,
}

impl CalibrationStep {
    fn next(self) -> CalibrationStep {
        match self {
            CalibrationStep::LeftPinch => CalibrationStep::OpenHand,
            CalibrationStep::OpenHand => CalibrationStep::RightPinch,
            CalibrationStep::RightPinch => CalibrationStep::ScrollSpread,
            CalibrationStep::ScrollSpread => CalibrationStep::WideOpen,
            CalibrationStep::WideOpen | CalibrationStep::Done => CalibrationStep::Done,
        }
    }

    /// Instruction text for the host UI.
    pub fn instruction(&self) -> &'static str {
        match self {
            CalibrationStep::LeftPinch => "Pinch index finger and thumb together",
            CalibrationStep::OpenHand => "Spread index finger and thumb apart",
            CalibrationStep::RightPinch => "Pinch middle finger and thumb together",
            CalibrationStep::ScrollSpread => "Bring middle and ring fingers together",
            CalibrationStep::WideOpen => "Open all fingers wide",
            CalibrationStep::Done => "Calibration complete",
        }
    }
}

/// Recommended thresholds from a completed session. Fields stay `None` until
/// their step collected at least one sample. Persisting is the host's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRecommendation {
    pub left_click_distance: Option<f32>,
    pub right_click_distance: Option<f32>,
    pub scroll_activation_distance: Option<f32>,
}

/// Accumulates gesture measurements across the calibration steps.
#[derive(Debug, Default)]
pub struct CalibrationSession {
    step: CalibrationStep,
    left_pinch: Vec<f32>,
    right_pinch: Vec<f32>,
    scroll_spread: Vec<f32>,
    open_spans: Vec<f32>,
}

impl CalibrationSession {
    pub fn new() -> Self {
        CalibrationSession::default()
    }

    pub fn step(&self) -> CalibrationStep {
        self.step
    }

    /// Advance to the next step (host-driven, e.g. a key press).
    pub fn advance(&mut self) {
        self.step = self.step.next();
    }

    /// Record one frame's primitives against the current step. Each step gates
    /// samples on a plausibility bound so stray frames between gestures do not
    /// pollute the statistics. Returns true when a sample was accepted.
    pub fn record(&mut self, prim: &Primitives) -> bool {
        match self.step() {
            CalibrationStep::LeftPinch if prim.pinch_index_thumb < 50.0 => {
                self.left_pinch.push(prim.pinch_index_thumb);
                true
            }
            CalibrationStep::OpenHand if prim.pinch_index_thumb > 80.0 => {
                self.open_spans.push(prim.pinch_index_thumb);
                true
            }
            CalibrationStep::RightPinch if prim.pinch_middle_thumb < 60.0 => {
                self.right_pinch.push(prim.pinch_middle_thumb);
                true
            }
            CalibrationStep::ScrollSpread if prim.spread_middle_ring < 50.0 => {
                self.scroll_spread.push(prim.spread_middle_ring);
                true
            }
            CalibrationStep::WideOpen => {
                self.open_spans.push(prim.pinch_index_thumb);
                true
            }
            _ => false,
        }
    }

    /// Samples collected for the current step, for UI progress display.
    pub fn samples_for_step(&self) -> usize {
        match self.step() {
            CalibrationStep::LeftPinch => self.left_pinch.len(),
            CalibrationStep::OpenHand | CalibrationStep::WideOpen => self.open_spans.len(),
            CalibrationStep::RightPinch => self.right_pinch.len(),
            CalibrationStep::ScrollSpread => self.scroll_spread.len(),
            CalibrationStep::Done => 0,
        }
    }

    /// Each threshold is the sample mean plus one-and-a-half standard
    /// deviations, rounded down to whole pixels.
    pub fn recommended_thresholds(&self) -> ThresholdRecommendation {
        ThresholdRecommendation {
            left_click_distance: recommend(&self.left_pinch),
            right_click_distance: recommend(&self.right_pinch),
            scroll_activation_distance: recommend(&self.scroll_spread),
        }
    }
}

fn recommend(samples: &[f32]) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }
    let mean = samples.iter().sum::<f32>() / samples.len() as f32;
    let variance =
        samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / samples.len() as f32;
    Some((mean + RECOMMEND_SIGMA * variance.sqrt()).floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(index_thumb: f32, middle_thumb: f32, middle_ring: f32) -> Primitives {
        Primitives {
            pinch_index_thumb: index_thumb,
            pinch_middle_thumb: middle_thumb,
            spread_middle_ring: middle_ring,
            fist: false,
        }
    }

    #[test]
    fn steps_advance_in_order() {
        let mut session = CalibrationSession::new();
        assert_eq!(session.step(), CalibrationStep::LeftPinch);
        for expected in [
            CalibrationStep::OpenHand,
            CalibrationStep::RightPinch,
            CalibrationStep::ScrollSpread,
            CalibrationStep::WideOpen,
            CalibrationStep::Done,
            CalibrationStep::Done,
        ] {
            session.advance();
            assert_eq!(session.step(), expected);
        }
    }

    #[test]
    fn gates_reject_implausible_samples() {
        let mut session = CalibrationSession::new();
        // LeftPinch step only accepts near-pinched distances.
        assert!(session.record(&prim(10.0, 100.0, 100.0)));
        assert!(!session.record(&prim(120.0, 100.0, 100.0)));
        assert_eq!(session.samples_for_step(), 1);
    }

    #[test]
    fn recommendation_is_mean_plus_margin() {
        let mut session = CalibrationSession::new();
        for d in [10.0, 12.0, 14.0] {
            assert!(session.record(&prim(d, 100.0, 100.0)));
        }
        let rec = session.recommended_thresholds();
        // mean 12, stddev sqrt(8/3); floor(12 + 1.5 * 1.633) = 14
        assert_eq!(rec.left_click_distance, Some(14.0));
        assert_eq!(rec.right_click_distance, None);
        assert_eq!(rec.scroll_activation_distance, None);
    }

    #[test]
    fn full_session_recommends_all_thresholds() {
        let mut session = CalibrationSession::new();
        for _ in 0..5 {
            session.record(&prim(12.0, 100.0, 100.0));
        }
        session.advance(); // OpenHand
        for _ in 0..5 {
            session.record(&prim(150.0, 100.0, 100.0));
        }
        session.advance(); // RightPinch
        for _ in 0..5 {
            session.record(&prim(100.0, 18.0, 100.0));
        }
        session.advance(); // ScrollSpread
        for _ in 0..5 {
            session.record(&prim(100.0, 100.0, 20.0));
        }
        session.advance(); // WideOpen
        session.record(&prim(180.0, 100.0, 100.0));
        session.advance();
        assert_eq!(session.step(), CalibrationStep::Done);
        // Done: no further samples accepted.
        assert!(!session.record(&prim(12.0, 18.0, 20.0)));

        let rec = session.recommended_thresholds();
        assert_eq!(rec.left_click_distance, Some(12.0));
        assert_eq!(rec.right_click_distance, Some(18.0));
        assert_eq!(rec.scroll_activation_distance, Some(20.0));
    }
}
