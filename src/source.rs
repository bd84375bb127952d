// Line source: newline-delimited records from the serial device (or a replay file)

use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_serial::SerialPortBuilderExt;

/// Baud rate the sensor firmware is built for.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Longest accepted line including its terminator. Longer lines are discarded.
pub const MAX_LINE_BYTES: usize = 4096;

/// Terminal transport failures. Any of these ends the consumer.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open serial device {path}: {source}")]
    OpenDevice {
        path: String,
        #[source]
        source: tokio_serial::Error,
    },
    #[error("failed to open replay file {path}: {source}")]
    OpenReplay {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read from {description} failed: {source}")]
    Read {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} closed")]
    Closed { description: String },
}

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// What end of input means for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// A device or pipe: end of input is a disconnect.
    Live,
    /// A recording: end of input is the end of the feed.
    Recorded,
}

/// Lazy, non-restartable sequence of text lines.
pub struct LineSource {
    reader: BufReader<BoxedReader>,
    buf: Vec<u8>,
    /// Set while discarding the remainder of an over-long line.
    overflowed: bool,
    kind: FeedKind,
    description: String,
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource")
            .field("description", &self.description)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl LineSource {
    pub fn from_reader<R>(reader: R, kind: FeedKind, description: impl Into<String>) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            reader: BufReader::new(Box::new(reader) as BoxedReader),
            buf: Vec::with_capacity(64),
            overflowed: false,
            kind,
            description: description.into(),
        }
    }

    pub fn open_serial(path: &str, baud_rate: u32) -> Result<Self, SourceError> {
        let port = tokio_serial::new(path, baud_rate)
            .open_native_async()
            .map_err(|source| SourceError::OpenDevice {
                path: path.to_string(),
                source,
            })?;
        tracing::info!(device = path, baud_rate, "serial device opened");
        Ok(Self::from_reader(
            port,
            FeedKind::Live,
            format!("serial {}", path),
        ))
    }

    pub async fn open_replay(path: &Path) -> Result<Self, SourceError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|source| SourceError::OpenReplay {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(file = %path.display(), "replaying recorded lines");
        Ok(Self::from_reader(
            file,
            FeedKind::Recorded,
            format!("replay {}", path.display()),
        ))
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Next line without its terminator. Suspends until a full line (or EOF)
    /// arrives. Invalid UTF-8 is replaced rather than treated as fatal; the
    /// classifier rejects such lines. Lines longer than [`MAX_LINE_BYTES`]
    /// are dropped with a warning.
    ///
    /// End of input on a [`FeedKind::Recorded`] source yields `Ok(None)`; on a
    /// live source it is [`SourceError::Closed`].
    ///
    /// Cancel safe: bytes of a partially read line stay buffered for the next call.
    pub async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        loop {
            let available =
                self.reader
                    .fill_buf()
                    .await
                    .map_err(|source| SourceError::Read {
                        description: self.description.clone(),
                        source,
                    })?;

            if available.is_empty() {
                if self.overflowed {
                    self.discard_overflow();
                } else if !self.buf.is_empty() {
                    return Ok(Some(self.take_line()));
                }
                return match self.kind {
                    FeedKind::Recorded => Ok(None),
                    FeedKind::Live => Err(SourceError::Closed {
                        description: self.description.clone(),
                    }),
                };
            }

            let (chunk_len, complete) = match available.iter().position(|b| *b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            };
            if !self.overflowed {
                if self.buf.len() + chunk_len > MAX_LINE_BYTES {
                    self.overflowed = true;
                    self.buf.clear();
                } else {
                    self.buf.extend_from_slice(&available[..chunk_len]);
                }
            }
            self.reader.consume(chunk_len);

            if complete {
                if self.overflowed {
                    self.discard_overflow();
                    continue;
                }
                return Ok(Some(self.take_line()));
            }
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        self.buf.clear();
        line
    }

    fn discard_overflow(&mut self) {
        tracing::warn!(
            source = %self.description,
            limit = MAX_LINE_BYTES,
            "discarding over-long line"
        );
        self.overflowed = false;
        self.buf.clear();
    }
}
