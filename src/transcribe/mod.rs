//! Transcription submission
//!
//! Given a completed audio artifact, this module encodes it and submits
//! it to the remote recognition service, guessing the encoding across a
//! fixed ordered list until one attempt yields usable text. Unusable
//! credentials downgrade to a canned transcript instead of failing.

pub mod mock;
pub mod request;
pub mod submitter;
pub mod transport;

pub use mock::{canned_transcript, MockPicker, UniformPicker, CANNED_ANNOUNCEMENTS};
pub use request::{
    AudioEncoding, RecognitionAlternative, RecognitionAudio, RecognitionConfig, RecognitionResult,
    RecognizeRequest, RecognizeResponse,
};
pub use submitter::{
    key_shape_is_valid, SubmitError, Transcript, TranscriptSource, TranscriptionSubmitter,
};
pub use transport::{HttpTransport, RecognizeTransport, TransportError};
