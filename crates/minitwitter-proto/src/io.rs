//! Async frame transfer over any byte stream.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    errors::FrameError,
    frame::{FrameCodec, FrameHeader},
};

/// Read one frame's payload from `reader`.
///
/// Returns `Ok(None)` if the stream ends before the first header byte (the
/// peer closed between frames). A stream that ends inside a header or a
/// payload is [`FrameError::Truncated`].
pub async fn read_frame<R>(reader: &mut R, codec: &FrameCodec) -> Result<Option<Bytes>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; FrameHeader::SIZE];
    if reader.read(&mut header[..1]).await? == 0 {
        return Ok(None);
    }
    fill_from(reader, &mut header, 1).await?;

    let payload_len = codec.decode_header(&header)?;
    let mut payload = BytesMut::zeroed(payload_len);
    fill_from(reader, &mut payload, 0).await?;

    Ok(Some(payload.freeze()))
}

/// Fill `buf[filled..]`, treating early EOF as a truncated frame.
async fn fill_from<R>(reader: &mut R, buf: &mut [u8], mut filled: usize) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
{
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            return Err(FrameError::Truncated { expected: buf.len(), actual: filled });
        }
        filled += n;
    }
    Ok(())
}

/// Write an encoded frame and flush it.
pub async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{GetMessagesRequest, Request};

    #[tokio::test]
    async fn reads_back_written_frame() {
        let codec = FrameCodec::default();
        let request = Request::GetMessages(GetMessagesRequest { count: 7 });
        let frame = codec.encode(&request).unwrap();

        let mut wire = Vec::new();
        write_frame(&mut wire, &frame).await.unwrap();

        let mut reader = wire.as_slice();
        let payload = read_frame(&mut reader, &codec).await.unwrap().unwrap();
        let decoded: Request = codec.decode_payload(&payload).unwrap();
        assert_eq!(decoded, request);

        assert!(read_frame(&mut reader, &codec).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clean_eof_is_none() {
        let codec = FrameCodec::default();
        let mut reader: &[u8] = &[];
        assert!(read_frame(&mut reader, &codec).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn eof_inside_payload_is_truncated() {
        let codec = FrameCodec::default();
        let frame = codec.encode(&Request::GetMessages(GetMessagesRequest { count: 1 })).unwrap();

        let mut reader = &frame[..frame.len() - 1];
        let result = read_frame(&mut reader, &codec).await;
        assert!(matches!(result, Err(FrameError::Truncated { .. })));
    }

    #[tokio::test]
    async fn eof_inside_header_is_truncated() {
        let codec = FrameCodec::default();
        let frame = codec.encode(&Request::GetMessages(GetMessagesRequest { count: 1 })).unwrap();

        let mut reader = &frame[..3];
        let result = read_frame(&mut reader, &codec).await;
        assert!(matches!(result, Err(FrameError::Truncated { expected: 8, actual: 3 })));
    }
}
