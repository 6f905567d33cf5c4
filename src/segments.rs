//! Segmentos de gesto: cada uno prueba una condición de pose sobre un único
//! frame usando posiciones relativas de las articulaciones.

use serde::{Deserialize, Serialize};

use crate::types::{JointType, Point2, Skeleton};

/// Resultado de evaluar un frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePartResult {
    StartHandsUp,
    GoToRight,
    GoToLeft,
    MoveRightHand,
    MoveLeftHand,
    MoveToRight,
    MoveToLeft,
    None,
}

impl GesturePartResult {
    pub fn is_none(self) -> bool {
        self == GesturePartResult::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GesturePartResult::StartHandsUp => "start_hands_up",
            GesturePartResult::GoToRight => "go_to_right",
            GesturePartResult::GoToLeft => "go_to_left",
            GesturePartResult::MoveRightHand => "move_right_hand",
            GesturePartResult::MoveLeftHand => "move_left_hand",
            GesturePartResult::MoveToRight => "move_to_right",
            GesturePartResult::MoveToLeft => "move_to_left",
            GesturePartResult::None => "none",
        }
    }
}

/// Puntos de referencia del centro de hombros, propiedad del motor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShoulderRefs {
    /// Posición al reconocer la pose de inicio
    pub initial: Point2,
    /// Posición del último paso disparado
    pub last_triggered: Point2,
}

impl ShoulderRefs {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Umbrales compartidos por los segmentos de desplazamiento
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub shoulder: f32,
    pub step: f32,
    pub legacy_left_hand_head_x: bool,
}

/// Conjunto cerrado de segmentos disponibles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    StartHandsUp,
    MoveToLeft,
    MoveToRight,
    GoToLeft,
    GoToRight,
    MoveLeftHand,
    MoveRightHand,
}

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

impl SegmentKind {
    pub const DEFAULT_PIPELINE: [SegmentKind; 3] = [
        SegmentKind::StartHandsUp,
        SegmentKind::MoveToRight,
        SegmentKind::MoveToLeft,
    ];

    /// Evalúa el segmento sobre un frame. Solo StartHandsUp y GoTo* escriben
    /// en `refs`.
    pub fn evaluate(
        self,
        skeleton: &Skeleton,
        refs: &mut ShoulderRefs,
        thresholds: &Thresholds,
    ) -> GesturePartResult {
        let hit = match self {
            SegmentKind::StartHandsUp => start_hands_up(skeleton, refs, thresholds),
            SegmentKind::MoveToLeft => move_to(skeleton, refs, thresholds, Side::Left),
            SegmentKind::MoveToRight => move_to(skeleton, refs, thresholds, Side::Right),
            SegmentKind::GoToLeft => go_to(skeleton, refs, thresholds, Side::Left),
            SegmentKind::GoToRight => go_to(skeleton, refs, thresholds, Side::Right),
            SegmentKind::MoveLeftHand => move_hand(skeleton, refs, Side::Left),
            SegmentKind::MoveRightHand => move_hand(skeleton, refs, Side::Right),
        };
        hit.unwrap_or(GesturePartResult::None)
    }
}

fn start_hands_up(
    skeleton: &Skeleton,
    refs: &mut ShoulderRefs,
    thresholds: &Thresholds,
) -> Option<GesturePartResult> {
    let shoulder = skeleton.joint(JointType::ShoulderCenter)?;
    let head = skeleton.joint(JointType::Head)?;
    let elbow_right = skeleton.joint(JointType::ElbowRight)?;
    let elbow_left = skeleton.joint(JointType::ElbowLeft)?;
    let hand_right = skeleton.joint(JointType::HandRight)?;
    let hand_left = skeleton.joint(JointType::HandLeft)?;

    let elbows_up = elbow_right.y > shoulder.y && elbow_left.y > shoulder.y;
    let right_up = hand_right.y > head.y;
    let left_ref = if thresholds.legacy_left_hand_head_x {
        head.x
    } else {
        head.y
    };
    let left_up = hand_left.y > left_ref;

    if !(elbows_up && right_up && left_up) {
        return None;
    }

    let anchor = Point2::from(shoulder);
    refs.initial = anchor;
    refs.last_triggered = anchor;
    Some(GesturePartResult::StartHandsUp)
}

/// Desplazamiento horizontal estricto desde `reference` hacia `side`
fn displaced(x: f32, reference: Point2, threshold: f32, side: Side) -> bool {
    let delta = x - reference.x;
    match side {
        Side::Left => x < reference.x && delta < -threshold,
        Side::Right => x > reference.x && delta > threshold,
    }
}

fn move_to(
    skeleton: &Skeleton,
    refs: &ShoulderRefs,
    thresholds: &Thresholds,
    side: Side,
) -> Option<GesturePartResult> {
    if refs.initial.is_unset() {
        return None;
    }
    let shoulder = skeleton.joint(JointType::ShoulderCenter)?;
    displaced(shoulder.x, refs.initial, thresholds.shoulder, side).then_some(match side {
        Side::Left => GesturePartResult::MoveToLeft,
        Side::Right => GesturePartResult::MoveToRight,
    })
}

fn go_to(
    skeleton: &Skeleton,
    refs: &mut ShoulderRefs,
    thresholds: &Thresholds,
    side: Side,
) -> Option<GesturePartResult> {
    if refs.last_triggered.is_unset() {
        return None;
    }
    let shoulder = skeleton.joint(JointType::ShoulderCenter)?;
    if !displaced(shoulder.x, refs.last_triggered, thresholds.step, side) {
        return None;
    }
    refs.last_triggered = Point2::from(shoulder);
    Some(match side {
        Side::Left => GesturePartResult::GoToLeft,
        Side::Right => GesturePartResult::GoToRight,
    })
}

fn move_hand(skeleton: &Skeleton, refs: &ShoulderRefs, side: Side) -> Option<GesturePartResult> {
    if refs.initial.is_unset() {
        return None;
    }
    match side {
        Side::Right => {
            let hand = skeleton.joint(JointType::HandRight)?;
            let elbow = skeleton.joint(JointType::ElbowRight)?;
            // Mano sobre el codo y hacia fuera
            (hand.y > elbow.y && hand.x > elbow.x).then_some(GesturePartResult::MoveRightHand)
        }
        Side::Left => {
            let hand = skeleton.joint(JointType::HandLeft)?;
            let elbow = skeleton.joint(JointType::ElbowLeft)?;
            (hand.y > elbow.y && elbow.x > hand.x).then_some(GesturePartResult::MoveLeftHand)
        }
    }
}
