//! Per-connection request loop.
//!
//! Reads one request frame at a time, hands it to the shared service, and
//! writes exactly one response frame back before reading the next.
//!
//! A worker permit is held only while a decoded request is being handled,
//! so idle connections do not count against `max_workers`.
//!
//! ## Failure handling
//!
//! - Payload that is not a valid request: reply `MalformedRequest`, keep the
//!   connection (the frame was fully consumed, so framing is intact).
//! - Bad header, oversized frame, or stream error: close the connection.
//! - Response too large for the frame limit: reply `Internal` instead.

use std::sync::Arc;

use minitwitter_core::MiniTwitterService;
use minitwitter_proto::{
    ErrorCode, ErrorResponse, FrameCodec, Request, Response, read_frame, write_frame,
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::Semaphore,
};

use crate::error::ServerError;

/// Serve requests on `stream` until the peer closes it.
pub(crate) async fn handle_connection<S>(
    mut stream: S,
    service: MiniTwitterService,
    codec: FrameCodec,
    workers: Arc<Semaphore>,
) -> Result<(), ServerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Some(payload) = read_frame(&mut stream, &codec).await? {
        let response = match codec.decode_payload::<Request>(&payload) {
            Ok(request) => {
                let _permit =
                    workers.acquire().await.map_err(|e| ServerError::Internal(e.to_string()))?;
                service.handle(request)
            },
            Err(e) => {
                tracing::warn!("Malformed request: {}", e);
                Response::Error(ErrorResponse {
                    code: ErrorCode::MalformedRequest,
                    message: e.to_string(),
                })
            },
        };

        let frame = match codec.encode(&response) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to encode response: {}", e);
                codec.encode(&Response::Error(ErrorResponse {
                    code: ErrorCode::Internal,
                    message: e.to_string(),
                }))?
            },
        };

        write_frame(&mut stream, &frame).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use minitwitter_proto::{
        FrameError, GetMessagesRequest, MessageListResponse, SendMessageRequest,
    };
    use tokio::io::{AsyncWriteExt, DuplexStream};

    use super::*;

    fn workers(permits: usize) -> Arc<Semaphore> {
        Arc::new(Semaphore::new(permits))
    }

    async fn roundtrip(
        client: &mut DuplexStream,
        codec: &FrameCodec,
        request: &Request,
    ) -> Response {
        let frame = codec.encode(request).unwrap();
        write_frame(&mut *client, &frame).await.unwrap();
        let payload = read_frame(&mut *client, codec).await.unwrap().unwrap();
        codec.decode_payload(&payload).unwrap()
    }

    #[tokio::test]
    async fn serves_requests_in_order() {
        let codec = FrameCodec::default();
        let service = MiniTwitterService::new();
        let (mut client, server) = tokio::io::duplex(4096);
        let task = tokio::spawn(handle_connection(server, service.clone(), codec, workers(4)));

        for message in ["x", "y", "z"] {
            let request = Request::SendMessage(SendMessageRequest { message: message.into() });
            let response = roundtrip(&mut client, &codec, &request).await;
            assert!(matches!(response, Response::MessageSent(_)));
        }

        let request = Request::GetMessages(GetMessagesRequest { count: 1 });
        match roundtrip(&mut client, &codec, &request).await {
            Response::MessageList(MessageListResponse { messages, .. }) => {
                assert_eq!(messages, ["z"]);
            },
            other => panic!("expected MessageList, got {other:?}"),
        }

        drop(client);
        task.await.unwrap().unwrap();
        assert_eq!(service.log().len(), 3);
    }

    #[tokio::test]
    async fn malformed_payload_keeps_connection_open() {
        let codec = FrameCodec::default();
        let (mut client, server) = tokio::io::duplex(4096);
        let task = tokio::spawn(handle_connection(server, MiniTwitterService::new(), codec, workers(4)));

        // Valid header, payload is a CBOR string rather than a request.
        let frame = codec.encode(&"not a request").unwrap();
        write_frame(&mut client, &frame).await.unwrap();
        let payload = read_frame(&mut client, &codec).await.unwrap().unwrap();
        let response: Response = codec.decode_payload(&payload).unwrap();
        assert!(matches!(
            response,
            Response::Error(ErrorResponse { code: ErrorCode::MalformedRequest, .. })
        ));

        let request = Request::GetMessages(GetMessagesRequest { count: 3 });
        assert!(matches!(roundtrip(&mut client, &codec, &request).await, Response::MessageList(_)));

        drop(client);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn bad_header_closes_connection() {
        let codec = FrameCodec::default();
        let (mut client, server) = tokio::io::duplex(4096);
        let task = tokio::spawn(handle_connection(server, MiniTwitterService::new(), codec, workers(4)));

        client.write_all(b"GARBAGE!").await.unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(ServerError::Protocol(FrameError::BadMagic(_)))));
    }

    #[tokio::test]
    async fn oversized_response_becomes_internal_error() {
        let codec = FrameCodec::new(128);
        let service = MiniTwitterService::new();
        for _ in 0..16 {
            service.log().append("0123456789abcdef");
        }

        let (mut client, server) = tokio::io::duplex(4096);
        let task = tokio::spawn(handle_connection(server, service, codec, workers(4)));

        let request = Request::GetMessages(GetMessagesRequest { count: 16 });
        let response = roundtrip(&mut client, &codec, &request).await;
        assert!(matches!(
            response,
            Response::Error(ErrorResponse { code: ErrorCode::Internal, .. })
        ));

        drop(client);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn negative_count_is_reported_not_fatal() {
        let codec = FrameCodec::default();
        let (mut client, server) = tokio::io::duplex(4096);
        let task = tokio::spawn(handle_connection(server, MiniTwitterService::new(), codec, workers(4)));

        let request = Request::GetMessages(GetMessagesRequest { count: -1 });
        let response = roundtrip(&mut client, &codec, &request).await;
        assert!(matches!(
            response,
            Response::Error(ErrorResponse { code: ErrorCode::InvalidArgument, .. })
        ));

        drop(client);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn idle_connection_holds_no_worker() {
        let codec = FrameCodec::default();
        let workers = workers(1);
        let (client, server) = tokio::io::duplex(4096);
        let task = tokio::spawn(handle_connection(
            server,
            MiniTwitterService::new(),
            codec,
            Arc::clone(&workers),
        ));

        tokio::task::yield_now().await;
        assert_eq!(workers.available_permits(), 1);

        drop(client);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn request_waits_for_free_worker() {
        let codec = FrameCodec::default();
        let service = MiniTwitterService::new();
        let workers = workers(1);
        let busy = Arc::clone(&workers).acquire_owned().await.unwrap();

        let (mut client, server) = tokio::io::duplex(4096);
        let task =
            tokio::spawn(handle_connection(server, service.clone(), codec, Arc::clone(&workers)));

        let request = Request::SendMessage(SendMessageRequest { message: "queued".into() });
        write_frame(&mut client, &codec.encode(&request).unwrap()).await.unwrap();

        let waiting = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            read_frame(&mut client, &codec),
        )
        .await;
        assert!(waiting.is_err(), "request served without a worker");
        assert!(service.log().is_empty());

        drop(busy);
        let payload = read_frame(&mut client, &codec).await.unwrap().unwrap();
        let response: Response = codec.decode_payload(&payload).unwrap();
        assert!(matches!(response, Response::MessageSent(_)));
        assert_eq!(service.log().len(), 1);
        assert_eq!(workers.available_permits(), 1);

        drop(client);
        task.await.unwrap().unwrap();
    }
}
