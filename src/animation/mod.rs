pub mod track;

pub use track::{InterpMode, Keyframe, Keyframes, Lerp};
