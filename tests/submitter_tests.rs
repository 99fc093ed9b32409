// Integration tests for the transcription submitter.
//
// The transport is scripted per call so attempt ordering, fallback and
// terminal outcomes can all be asserted without a network.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use transit_scribe::transcribe::{
    MockPicker, RecognitionAlternative, RecognitionResult, RecognizeRequest, RecognizeResponse,
    RecognizeTransport, TransportError, CANNED_ANNOUNCEMENTS,
};
use transit_scribe::{
    AudioEncoding, AudioHandle, AudioMode, AudioPlatform, CaptureConfig, PermissionStatus,
    RecognizerConfig, SubmitError, Transcript, TranscriptSource, TranscriptionSubmitter,
};

const VALID_SHAPE_KEY: &str = "AIzaSyTest0000000000000000000000000000000";

/// Platform double that only serves artifact reads.
struct StaticArtifacts {
    fail_read: bool,
}

#[async_trait]
impl AudioPlatform for StaticArtifacts {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn set_mode(&self, _mode: AudioMode) -> Result<()> {
        Ok(())
    }

    async fn open_stream(&self, _config: &CaptureConfig) -> Result<()> {
        Ok(())
    }

    async fn close_stream(&self) -> Result<AudioHandle> {
        Ok(AudioHandle::new("recordings/static.wav"))
    }

    async fn read_artifact(&self, _handle: &AudioHandle) -> Result<Vec<u8>> {
        if self.fail_read {
            return Err(anyhow!("artifact is gone"));
        }
        Ok(b"RIFFfake-wav-bytes".to_vec())
    }

    async fn start_playback(&self, _handle: &AudioHandle) -> Result<()> {
        Ok(())
    }

    async fn stop_playback(&self) -> Result<()> {
        Ok(())
    }
}

/// Per-call transport script.
#[derive(Debug, Clone, Copy)]
enum Scripted {
    /// Success with the given transcript text.
    Transcript(&'static str),
    /// Success with zero results.
    Empty,
    /// Success with a whitespace-only transcript.
    Blank,
    /// Server-side failure.
    Fail,
    /// Credential rejection at call time.
    BadKey,
}

struct FakeTransport {
    script: Vec<Scripted>,
    seen: Arc<Mutex<Vec<String>>>,
}

fn response_with(text: &str) -> RecognizeResponse {
    RecognizeResponse {
        results: vec![RecognitionResult {
            alternatives: vec![RecognitionAlternative {
                transcript: Some(text.to_string()),
                confidence: Some(0.9),
            }],
        }],
    }
}

#[async_trait]
impl RecognizeTransport for FakeTransport {
    async fn recognize(
        &self,
        _api_key: &str,
        request: &RecognizeRequest,
    ) -> Result<RecognizeResponse, TransportError> {
        let mut seen = self.seen.lock().unwrap();
        let index = seen.len();
        seen.push(request.config.encoding.to_string());

        match self.script.get(index).copied().unwrap_or(Scripted::Empty) {
            Scripted::Transcript(text) => Ok(response_with(text)),
            Scripted::Empty => Ok(RecognizeResponse::default()),
            Scripted::Blank => Ok(response_with("   ")),
            Scripted::Fail => Err(TransportError::Api {
                status: 500,
                message: "internal error".to_string(),
            }),
            Scripted::BadKey => Err(TransportError::InvalidCredentials),
        }
    }
}

struct FixedPicker(usize);

impl MockPicker for FixedPicker {
    fn pick(&self, _len: usize) -> usize {
        self.0
    }
}

/// Submitter wired to the scripted transport; returns the call log too.
fn submitter(
    api_key: Option<&str>,
    script: Vec<Scripted>,
    fail_read: bool,
) -> (TranscriptionSubmitter, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let transport = Box::new(FakeTransport {
        script,
        seen: seen.clone(),
    });
    let config = RecognizerConfig {
        api_key: api_key.map(str::to_string),
        mock_latency_ms: 0, // keep the canned path instant in tests
        ..RecognizerConfig::default()
    };
    let platform = Arc::new(StaticArtifacts { fail_read });
    let submitter = TranscriptionSubmitter::new(config, platform, transport);
    (submitter, seen)
}

fn handle() -> AudioHandle {
    AudioHandle::new("recordings/static.wav")
}

fn assert_canned(transcript: &Transcript) {
    assert_eq!(transcript.source, TranscriptSource::Canned);
    assert!(
        CANNED_ANNOUNCEMENTS.contains(&transcript.text.as_str()),
        "canned text must be one of the known announcements, got {:?}",
        transcript.text
    );
}

#[tokio::test]
async fn missing_credentials_short_circuit() {
    let (submitter, seen) = submitter(None, vec![], false);

    let err = submitter.submit(&handle()).await.expect_err("must fail");
    assert!(matches!(err, SubmitError::MissingCredentials));
    assert!(seen.lock().unwrap().is_empty(), "no transport call");
}

#[tokio::test]
async fn empty_credentials_count_as_missing() {
    let (submitter, seen) = submitter(Some(""), vec![], false);

    let err = submitter.submit(&handle()).await.expect_err("must fail");
    assert!(matches!(err, SubmitError::MissingCredentials));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_key_skips_the_network_entirely() {
    let (submitter, seen) = submitter(Some("not-a-hosted-key"), vec![], false);

    let transcript = submitter.submit(&handle()).await.expect("canned result");
    assert_canned(&transcript);
    assert!(
        seen.lock().unwrap().is_empty(),
        "a malformed key must never reach the transport"
    );
}

#[tokio::test]
async fn remote_rejection_falls_back_to_canned() {
    let (submitter, seen) = submitter(Some(VALID_SHAPE_KEY), vec![Scripted::BadKey], false);

    let transcript = submitter.submit(&handle()).await.expect("canned result");
    assert_canned(&transcript);
    assert_eq!(
        seen.lock().unwrap().len(),
        1,
        "the loop is abandoned on the rejecting call"
    );
}

#[tokio::test]
async fn rejection_mid_loop_abandons_remaining_hypotheses() {
    let (submitter, seen) = submitter(
        Some(VALID_SHAPE_KEY),
        vec![Scripted::Fail, Scripted::BadKey],
        false,
    );

    let transcript = submitter.submit(&handle()).await.expect("canned result");
    assert_canned(&transcript);
    assert_eq!(*seen.lock().unwrap(), vec!["LINEAR16", "FLAC"]);
}

#[tokio::test]
async fn third_hypothesis_success_is_returned() {
    let (submitter, seen) = submitter(
        Some(VALID_SHAPE_KEY),
        vec![
            Scripted::Empty,
            Scripted::Fail,
            Scripted::Transcript("Please stand clear of the closing doors."),
        ],
        false,
    );

    let transcript = submitter.submit(&handle()).await.expect("transcript");
    assert_eq!(transcript.text, "Please stand clear of the closing doors.");
    assert_eq!(
        transcript.source,
        TranscriptSource::Remote {
            encoding: AudioEncoding::Mp3
        }
    );
    assert_eq!(*seen.lock().unwrap(), vec!["LINEAR16", "FLAC", "MP3"]);
}

#[tokio::test]
async fn first_success_stops_the_loop() {
    let (submitter, seen) = submitter(
        Some(VALID_SHAPE_KEY),
        vec![Scripted::Transcript("The train is now approaching.")],
        false,
    );

    let transcript = submitter.submit(&handle()).await.expect("transcript");
    assert_eq!(
        transcript.source,
        TranscriptSource::Remote {
            encoding: AudioEncoding::Linear16
        }
    );
    assert_eq!(*seen.lock().unwrap(), vec!["LINEAR16"]);
}

#[tokio::test]
async fn exhausted_hypotheses_return_no_transcript_found() {
    let (submitter, seen) = submitter(
        Some(VALID_SHAPE_KEY),
        vec![Scripted::Empty, Scripted::Empty, Scripted::Empty],
        false,
    );

    let err = submitter.submit(&handle()).await.expect_err("must fail");
    assert!(matches!(err, SubmitError::NoTranscriptFound));
    assert_eq!(*seen.lock().unwrap(), vec!["LINEAR16", "FLAC", "MP3"]);
}

#[tokio::test]
async fn whitespace_transcripts_count_as_no_transcript() {
    let (submitter, seen) = submitter(
        Some(VALID_SHAPE_KEY),
        vec![Scripted::Blank, Scripted::Blank, Scripted::Blank],
        false,
    );

    let err = submitter.submit(&handle()).await.expect_err("must fail");
    assert!(matches!(err, SubmitError::NoTranscriptFound));
    assert_eq!(seen.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn unreadable_artifact_is_an_audio_read_error() {
    let (submitter, seen) = submitter(Some(VALID_SHAPE_KEY), vec![], true);

    let err = submitter.submit(&handle()).await.expect_err("must fail");
    assert!(matches!(err, SubmitError::AudioRead(_)));
    assert!(seen.lock().unwrap().is_empty(), "nothing was submitted");
}

#[tokio::test]
async fn pinned_picker_selects_a_specific_announcement() {
    let (submitter, _seen) = submitter(Some("bad-shape"), vec![], false);
    let submitter = submitter.with_picker(Box::new(FixedPicker(3)));

    let transcript = submitter.submit(&handle()).await.expect("canned result");
    assert_eq!(transcript.text, CANNED_ANNOUNCEMENTS[3]);
    assert_eq!(transcript.source, TranscriptSource::Canned);
}
