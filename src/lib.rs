pub mod config;
pub mod csv_loader;
pub mod dispatch;
pub mod frame_source;
pub mod gesture;
pub mod hid;
pub mod segments;
pub mod types;

pub use config::{Config, ConfigError, EngineConfig, KeysConfig};
pub use gesture::{FrameReport, Gesture};
pub use segments::{GesturePartResult, SegmentKind, ShoulderRefs};
pub use types::{JointType, Point2, Skeleton, SkeletonPoint};
