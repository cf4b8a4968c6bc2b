// Per-frame gesture primitives: named finger-pair distances plus fist detection.
// Purely measurement-producing; thresholding against action distances is the
// arbitration step's job.

use crate::geometry::distance;
use crate::types::{landmark, LandmarkFrame};

/// Wrist-to-fingertip proximity (source-frame px) below which a finger counts
/// as curled for fist detection.
pub const FIST_PROXIMITY_PX: f32 = 60.0;

/// Raw per-frame measurements consumed by mode arbitration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitives {
    /// Index tip to thumb tip (left-click pinch).
    pub pinch_index_thumb: f32,
    /// Middle tip to thumb tip (right-click pinch).
    pub pinch_middle_thumb: f32,
    /// Middle tip to ring tip (scroll activation spread).
    pub spread_middle_ring: f32,
    /// All four fingertips curled against the palm.
    pub fist: bool,
}

/// Compute the frame's gesture primitives.
pub fn classify(frame: &LandmarkFrame) -> Primitives {
    let thumb = frame.point(landmark::THUMB_TIP);
    let index = frame.point(landmark::INDEX_TIP);
    let middle = frame.point(landmark::MIDDLE_TIP);
    let ring = frame.point(landmark::RING_TIP);

    Primitives {
        pinch_index_thumb: distance(index, thumb),
        pinch_middle_thumb: distance(middle, thumb),
        spread_middle_ring: distance(middle, ring),
        fist: is_fist(frame),
    }
}

/// A fist requires every fingertip near the palm; one extended finger is
/// enough to disprove it, so the check short-circuits.
fn is_fist(frame: &LandmarkFrame) -> bool {
    let palm = frame.point(landmark::WRIST);
    [
        landmark::INDEX_TIP,
        landmark::MIDDLE_TIP,
        landmark::RING_TIP,
        landmark::PINKY_TIP,
    ]
    .iter()
    .all(|&tip| distance(frame.point(tip), palm) < FIST_PROXIMITY_PX)
}
