//! Pluggable response-body destination shared across a request lineage.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::sync::Mutex as AsyncMutex;

use crate::error::PipelineError;

/// Write capability behind a [`BodySink`].
///
/// Implementations are transport adapters or buffers; the core never
/// interprets the bytes.
#[async_trait]
pub trait BodyWriter: Send {
  async fn write(&mut self, chunk: Bytes) -> Result<(), PipelineError>;
}

/// Cloneable handle to the body destination.
///
/// A request clone and the response it mints share the same sink, so the
/// bytes land on the one transport connection no matter who writes.
/// Forked requests get a fresh detached sink instead.
#[derive(Clone)]
pub struct BodySink {
  writer: Arc<AsyncMutex<Box<dyn BodyWriter>>>,
}

impl BodySink {
  pub fn new(writer: impl BodyWriter + 'static) -> Self {
    Self {
      writer: Arc::new(AsyncMutex::new(Box::new(writer))),
    }
  }

  /// Buffering sink plus the handle that reads the buffered bytes back.
  pub fn buffer() -> (Self, BufferedBody) {
    let buf = Arc::new(Mutex::new(BytesMut::new()));
    let sink = Self::new(BufferWriter { buf: buf.clone() });
    (sink, BufferedBody { buf })
  }

  /// Fresh buffering sink with no reader, for forked lineages.
  pub fn detached() -> Self {
    Self::buffer().0
  }

  pub async fn write(&self, chunk: impl Into<Bytes>) -> Result<(), PipelineError> {
    self.writer.lock().await.write(chunk.into()).await
  }
}

impl fmt::Debug for BodySink {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("BodySink")
  }
}

struct BufferWriter {
  buf: Arc<Mutex<BytesMut>>,
}

#[async_trait]
impl BodyWriter for BufferWriter {
  async fn write(&mut self, chunk: Bytes) -> Result<(), PipelineError> {
    lock_buf(&self.buf).extend_from_slice(&chunk);
    Ok(())
  }
}

/// Read side of [`BodySink::buffer`].
#[derive(Debug, Clone)]
pub struct BufferedBody {
  buf: Arc<Mutex<BytesMut>>,
}

impl BufferedBody {
  /// Bytes accumulated so far, leaving the buffer intact.
  pub fn snapshot(&self) -> Bytes {
    Bytes::copy_from_slice(&lock_buf(&self.buf))
  }

  /// Drains and returns the accumulated bytes.
  pub fn take(&self) -> Bytes {
    lock_buf(&self.buf).split().freeze()
  }

  pub fn is_empty(&self) -> bool {
    lock_buf(&self.buf).is_empty()
  }
}

fn lock_buf(buf: &Arc<Mutex<BytesMut>>) -> MutexGuard<'_, BytesMut> {
  buf.lock().unwrap_or_else(|e| e.into_inner())
}
