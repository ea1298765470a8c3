//! Chrome native-messaging host.
//!
//! Each message is a 4-byte length in native byte order followed by that
//! many bytes of UTF-8 JSON. Replies use the same framing.

use grabber_common::protocol::{HostRequest, HostResponse, PickRequest, ResolveRequest};
use grabber_core::{HitTest, HtmlDocument, pick};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Upper bound on a single incoming message.
pub const MAX_MESSAGE_LEN: usize = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message of {0} bytes exceeds the size limit")]
    TooLarge(usize),
}

/// Read one framed message. `Ok(None)` means the stream is finished: EOF,
/// a zero length, or a payload shorter than announced.
pub async fn read_message<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Vec<u8>>, HostError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_ne_bytes(len_buf) as usize;
    if len == 0 {
        return Ok(None);
    }
    if len > MAX_MESSAGE_LEN {
        return Err(HostError::TooLarge(len));
    }

    let mut payload = vec![0u8; len];
    match reader.read_exact(&mut payload).await {
        Ok(_) => Ok(Some(payload)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &HostResponse,
) -> Result<(), HostError> {
    let payload = serde_json::to_vec(response)?;
    let len = u32::try_from(payload.len()).map_err(|_| HostError::TooLarge(payload.len()))?;
    writer.write_all(&len.to_ne_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

pub struct NativeHost {
    overlay_ids: Vec<String>,
}

impl NativeHost {
    pub fn new(overlay_ids: Vec<String>) -> Self {
        Self { overlay_ids }
    }

    /// Serve messages until the input stream ends.
    pub async fn run<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<(), HostError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Native host ready");
        loop {
            let payload = match read_message(reader).await {
                Ok(Some(payload)) => payload,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read message: {}", e);
                    write_message(writer, &HostResponse::failure(e.to_string())).await?;
                    return Err(e);
                }
            };

            let response = self.handle_message(&payload);
            write_message(writer, &response).await?;
        }
        info!("Native host input closed");
        Ok(())
    }

    pub fn handle_message(&self, payload: &[u8]) -> HostResponse {
        let value: serde_json::Value = match serde_json::from_slice(payload) {
            Ok(value) => value,
            Err(e) => return HostResponse::failure(e.to_string()),
        };

        match HostRequest::from_value(value) {
            Ok(HostRequest::Resolve(req)) => self.resolve(req),
            Ok(HostRequest::Pick(req)) => self.pick(req),
            Err(e) => {
                debug!("Rejected request: {}", e);
                HostResponse::failure(e.to_string())
            }
        }
    }

    fn resolve(&self, req: ResolveRequest) -> HostResponse {
        let doc = HtmlDocument::parse(&req.html);
        match doc.select_nth(&req.target, req.index) {
            Ok(node) => HostResponse::ok(pick(&doc, node)),
            Err(e) => HostResponse::failure(e.to_string()),
        }
    }

    fn pick(&self, req: PickRequest) -> HostResponse {
        let doc = HtmlDocument::parse(&req.html);
        let layout = doc.layout(&req.layout);
        let exclude = doc.overlay_nodes(&self.overlay_ids);
        match layout.element_at(&doc, req.x, req.y, &exclude) {
            Some(node) => HostResponse::ok(pick(&doc, node)),
            None => HostResponse::failure(format!("No element at ({}, {})", req.x, req.y)),
        }
    }
}
