use crate::error::TransportError;
use crate::signalling::transport::{FrameReceiver, FrameSender};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WsSender {
    sink: SplitSink<WsStream, Message>,
}

pub struct WsReceiver {
    stream: SplitStream<WsStream>,
}

/// Opens the WebSocket to the relay and splits it into independent halves.
pub async fn connect_ws(url: &str) -> Result<(WsSender, WsReceiver), TransportError> {
    let (socket, response) = connect_async(url)
        .await
        .map_err(|e| TransportError::ConnectFailed(format!("{}: {}", url, e)))?;
    debug!("Relay handshake with {} done ({})", url, response.status());

    let (sink, stream) = socket.split();
    Ok((WsSender { sink }, WsReceiver { stream }))
}

#[async_trait]
impl FrameSender for WsSender {
    async fn send_frame(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.sink.close().await {
            debug!("Relay close handshake failed: {}", e);
        }
    }
}

#[async_trait]
impl FrameReceiver for WsReceiver {
    async fn recv_frame(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(Message::Close(frame)) => {
                    debug!("Relay closed the socket: {:?}", frame);
                    return None;
                }
                Ok(other) => debug!("Ignoring non-text frame ({} bytes)", other.len()),
                Err(e) => return Some(Err(TransportError::ConnectionLost(e.to_string()))),
            }
        }
    }
}
