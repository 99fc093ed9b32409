pub mod audio;
pub mod config;
pub mod session;
pub mod transcribe;

pub use audio::{
    AudioHandle, AudioMode, AudioPlatform, CaptureConfig, FileAudioPlatform, PermissionStatus,
};
pub use config::{AudioConfig, Config, RecognizerConfig, ServiceConfig};
pub use session::{RecordingSession, SessionConfig, SessionError, SessionSnapshot, SessionState};
pub use transcribe::{
    AudioEncoding, HttpTransport, MockPicker, RecognizeTransport, SubmitError, Transcript,
    TranscriptSource, TranscriptionSubmitter, UniformPicker,
};
