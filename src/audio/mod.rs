pub mod file;
pub mod platform;

pub use file::FileAudioPlatform;
pub use platform::{AudioHandle, AudioMode, AudioPlatform, CaptureConfig, PermissionStatus};
