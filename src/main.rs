use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use transit_scribe::{
    Config, FileAudioPlatform, HttpTransport, RecordingSession, SessionConfig, TranscriptSource,
    TranscriptionSubmitter,
};

/// Record a transit announcement and transcribe it.
#[derive(Debug, Parser)]
#[command(name = "transit-scribe")]
struct Args {
    /// Config file; defaults apply when omitted
    #[arg(long)]
    config: Option<String>,

    /// WAV file the capture platform records from
    #[arg(long)]
    input: PathBuf,

    /// Replay the captured artifact after transcription
    #[arg(long)]
    play: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load_or_default(args.config.as_deref())?;

    info!("{} starting", cfg.service.name);

    let platform = Arc::new(FileAudioPlatform::new(&args.input, &cfg.audio.recordings_path));

    let session_config = SessionConfig {
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        ..SessionConfig::default()
    };
    let mut session = RecordingSession::new(session_config, platform.clone());

    session.start().await?;
    let handle = session.stop().await?;
    info!("Captured audio artifact: {}", handle);

    let transport = Box::new(HttpTransport::new(cfg.recognizer.endpoint.clone()));
    let submitter = TranscriptionSubmitter::new(cfg.recognizer.clone(), platform, transport);

    let transcript = submitter.submit(&handle).await?;
    match transcript.source {
        TranscriptSource::Remote { encoding } => info!("Transcribed via {}", encoding),
        TranscriptSource::Canned => info!("Using canned transcript (no usable API key)"),
    }
    println!("{}", transcript.text);

    if args.play {
        session.play().await?;
    }

    Ok(())
}
