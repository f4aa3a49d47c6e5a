//! Per-connection sequential orchestration.
//!
//! A [`SessionPipeline`] turns one inbound unit into its outbound result,
//! one unit at a time. The connection handlers await each call to completion
//! before polling the socket for the next frame, which is what guarantees
//! that replies leave in the order their requests arrived.
//!
//! Each voice chunk is treated as a complete, independent utterance: the
//! pipeline keeps no cross-turn state, and distinct connections share nothing
//! but the (immutable) provider clients.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::inference::InferenceClient;
use crate::core::speech::{SpeechClient, SpeechError};

/// Errors that abort a single voice turn. The connection handler converts
/// these into one unit-scoped error message and keeps the session alive.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Speech(#[from] SpeechError),

    /// Spooling or persisting audio failed.
    #[error("audio io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one completed voice turn: raw audio in, synthesized reply out.
#[derive(Debug)]
pub struct VoiceTurn {
    /// What the speech-to-text provider heard.
    pub transcript: String,
    /// The generated reply for that transcript.
    pub response_text: String,
    /// Where the synthesized reply audio was written.
    pub audio_path: PathBuf,
    /// The synthesized reply audio itself.
    pub audio: Bytes,
}

/// Sequential per-connection pipeline over the shared provider clients.
///
/// One instance per live connection; holds no mutable state. The voice path
/// is exposed as two stages so the connection handler can emit a transcript
/// progress unit between them; [`SessionPipeline::handle_audio`] composes
/// them for callers that do not need the intermediate result.
#[derive(Clone)]
pub struct SessionPipeline {
    inference: Arc<InferenceClient>,
    speech: Arc<SpeechClient>,
    audio_output_dir: PathBuf,
}

impl SessionPipeline {
    pub fn new(
        inference: Arc<InferenceClient>,
        speech: Arc<SpeechClient>,
        audio_output_dir: PathBuf,
    ) -> Self {
        Self {
            inference,
            speech,
            audio_output_dir,
        }
    }

    /// Text path: pass the message through to the inference client and return
    /// the reply text.
    ///
    /// An empty `content` is a boundary case, not an error: it is still sent
    /// upstream. Degraded completions come back as `Error: ...` text, so the
    /// user always receives a reply.
    pub async fn handle_text(&self, content: &str) -> String {
        self.inference.complete(content).await.into_text()
    }

    /// Voice path, first stage: spool the chunk to a scoped temp file and
    /// transcribe it.
    ///
    /// A non-success upstream status aborts the turn here; no inference call
    /// is made for a chunk that failed transcription. The spool file is
    /// released on every exit path.
    pub async fn transcribe_chunk(&self, chunk: Bytes) -> Result<String, SessionError> {
        let spool = spool_chunk(&chunk)?;
        debug!(bytes = chunk.len(), path = %spool.path().display(), "Audio chunk spooled");

        let audio = tokio::fs::read(spool.path()).await?;
        let transcript = self.speech.transcribe(audio.into()).await?;
        Ok(transcript)
        // `spool` dropped here (and on the error paths above), removing the
        // temp file.
    }

    /// Voice path, second stage: generate a reply for the transcript,
    /// synthesize it, and persist the audio.
    ///
    /// A degraded inference result is tolerated (the user hears the error
    /// text); a failed synthesis aborts the turn.
    pub async fn reply_for_transcript(&self, transcript: &str) -> Result<VoiceTurn, SessionError> {
        let response_text = self.inference.complete(transcript).await.into_text();

        let audio = self.speech.synthesize(&response_text).await?;

        let audio_path = self
            .audio_output_dir
            .join(format!("{}.flac", Uuid::new_v4()));
        tokio::fs::write(&audio_path, &audio).await?;
        info!(
            transcript_chars = transcript.len(),
            reply_chars = response_text.len(),
            audio_path = %audio_path.display(),
            "Voice turn complete"
        );

        Ok(VoiceTurn {
            transcript: transcript.to_string(),
            response_text,
            audio_path,
            audio,
        })
    }

    /// Full voice turn: both stages in sequence.
    pub async fn handle_audio(&self, chunk: Bytes) -> Result<VoiceTurn, SessionError> {
        let transcript = self.transcribe_chunk(chunk).await?;
        self.reply_for_transcript(&transcript).await
    }
}

/// Write the chunk to a named temp file carrying the WAV content-type marker.
/// Deleted on drop, success or failure.
fn spool_chunk(chunk: &Bytes) -> Result<NamedTempFile, std::io::Error> {
    let mut spool = tempfile::Builder::new().suffix(".wav").tempfile()?;
    spool.write_all(chunk)?;
    spool.flush()?;
    Ok(spool)
}
