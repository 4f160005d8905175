//! Connection wrapper.

use minitwitter_proto::{
    FrameCodec, GetMessagesRequest, Request, Response, SendMessageRequest, read_frame, write_frame,
};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpStream, ToSocketAddrs},
};

use crate::error::ClientError;

/// MiniTwitter client over a single connection.
///
/// # Type Parameters
///
/// - `S`: byte stream to the server (TCP in production, in-memory in tests)
#[derive(Debug)]
pub struct Client<S = TcpStream> {
    stream: S,
    codec: FrameCodec,
}

impl Client<TcpStream> {
    /// Connect to a server.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream, FrameCodec::default()))
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an established stream.
    pub fn new(stream: S, codec: FrameCodec) -> Self {
        Self { stream, codec }
    }

    /// Submit a message. Returns the server's status string.
    pub async fn send_message(&mut self, message: &str) -> Result<String, ClientError> {
        let request = Request::SendMessage(SendMessageRequest { message: message.to_string() });

        match self.call(&request).await? {
            Response::MessageSent(ack) => Ok(ack.status),
            Response::Error(err) => {
                Err(ClientError::Server { code: err.code, message: err.message })
            },
            Response::MessageList(_) => {
                Err(ClientError::UnexpectedResponse { expected: "MessageSent" })
            },
        }
    }

    /// Fetch up to `count` of the most recent messages, oldest first.
    pub async fn get_messages(&mut self, count: i64) -> Result<Vec<String>, ClientError> {
        let request = Request::GetMessages(GetMessagesRequest { count });

        match self.call(&request).await? {
            Response::MessageList(list) => Ok(list.messages),
            Response::Error(err) => {
                Err(ClientError::Server { code: err.code, message: err.message })
            },
            Response::MessageSent(_) => {
                Err(ClientError::UnexpectedResponse { expected: "MessageList" })
            },
        }
    }

    async fn call(&mut self, request: &Request) -> Result<Response, ClientError> {
        tracing::debug!("Sending request: {:?}", request);

        let frame = self.codec.encode(request)?;
        write_frame(&mut self.stream, &frame).await?;

        let payload =
            read_frame(&mut self.stream, &self.codec).await?.ok_or(ClientError::ConnectionClosed)?;
        Ok(self.codec.decode_payload(&payload)?)
    }
}
