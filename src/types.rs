use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Articulaciones del esqueleto, en el orden del sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    HipCenter,
    Spine,
    ShoulderCenter,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
}

pub const JOINT_COUNT: usize = 20;

impl JointType {
    pub const ALL: [JointType; JOINT_COUNT] = [
        JointType::HipCenter,
        JointType::Spine,
        JointType::ShoulderCenter,
        JointType::Head,
        JointType::ShoulderLeft,
        JointType::ElbowLeft,
        JointType::WristLeft,
        JointType::HandLeft,
        JointType::ShoulderRight,
        JointType::ElbowRight,
        JointType::WristRight,
        JointType::HandRight,
        JointType::HipLeft,
        JointType::KneeLeft,
        JointType::AnkleLeft,
        JointType::FootLeft,
        JointType::HipRight,
        JointType::KneeRight,
        JointType::AnkleRight,
        JointType::FootRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Nombre usado en CSV y JSON (snake_case)
    pub fn as_str(self) -> &'static str {
        match self {
            JointType::HipCenter => "hip_center",
            JointType::Spine => "spine",
            JointType::ShoulderCenter => "shoulder_center",
            JointType::Head => "head",
            JointType::ShoulderLeft => "shoulder_left",
            JointType::ElbowLeft => "elbow_left",
            JointType::WristLeft => "wrist_left",
            JointType::HandLeft => "hand_left",
            JointType::ShoulderRight => "shoulder_right",
            JointType::ElbowRight => "elbow_right",
            JointType::WristRight => "wrist_right",
            JointType::HandRight => "hand_right",
            JointType::HipLeft => "hip_left",
            JointType::KneeLeft => "knee_left",
            JointType::AnkleLeft => "ankle_left",
            JointType::FootLeft => "foot_left",
            JointType::HipRight => "hip_right",
            JointType::KneeRight => "knee_right",
            JointType::AnkleRight => "ankle_right",
            JointType::FootRight => "foot_right",
        }
    }
}

impl FromStr for JointType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        JointType::ALL
            .iter()
            .copied()
            .find(|joint| joint.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("articulación desconocida: {}", s))
    }
}

/// Posición 3D en metros, espacio del sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct SkeletonPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SkeletonPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for SkeletonPoint {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<SkeletonPoint> for [f32; 3] {
    fn from(p: SkeletonPoint) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Punto 2D de referencia del hombro. `(0,0)` significa "sin fijar".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const UNSET: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_unset(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<SkeletonPoint> for Point2 {
    fn from(p: SkeletonPoint) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Foto de un frame: posición de cada articulación seguida.
/// Las articulaciones ausentes (o con coordenadas no finitas) son `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Skeleton {
    joints: [Option<SkeletonPoint>; JOINT_COUNT],
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: devuelve una copia con la articulación fijada
    pub fn with(mut self, joint: JointType, point: SkeletonPoint) -> Self {
        self.set(joint, point);
        self
    }

    pub fn set(&mut self, joint: JointType, point: SkeletonPoint) {
        self.joints[joint.index()] = point.is_finite().then_some(point);
    }

    pub fn joint(&self, joint: JointType) -> Option<SkeletonPoint> {
        self.joints[joint.index()]
    }

    pub fn tracked_joints(&self) -> usize {
        self.joints.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked_joints() == 0
    }
}

/// Valores por defecto del motor
pub const DEFAULT_SHOULDER_THRESHOLD: f32 = 0.5; // metros, MoveTo*
pub const DEFAULT_STEP_THRESHOLD: f32 = 0.5; // metros, GoTo*
pub const DEFAULT_WINDOW_SIZE: usize = 5; // frames sin coincidencia
pub const DEFAULT_KEY_REPEAT: u32 = 18;
