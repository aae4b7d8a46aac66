use crate::error::TransportError;
use crate::signalling::config::ChannelConfig;
use crate::signalling::listener::SignallingListener;
use crate::signalling::transport::{FrameReceiver, FrameSender};
use crate::signalling::ws::connect_ws;
use callwire_core::{SessionDescription, SignallingMessage, codec};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// How long `destroy` waits for the close handshake before cutting the task.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

#[derive(Default)]
struct ChannelShared {
    established: AtomicBool,
    terminated: AtomicBool,
}

/// One long-lived duplex connection to the relay.
///
/// Outbound messages go through an unbounded FIFO and are written in submission
/// order; inbound frames are decoded and handed to the listener one at a time. The
/// two directions run concurrently inside a single driver task. There is no
/// reconnection: once the transport fails, the listener hears about it once and
/// every later `send` fails.
pub struct SignallingChannel {
    outbound_tx: mpsc::UnboundedSender<SignallingMessage>,
    shared: Arc<ChannelShared>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    driver: Option<JoinHandle<()>>,
}

impl SignallingChannel {
    /// Connects to the relay over WebSocket.
    pub fn open(config: ChannelConfig, listener: Arc<dyn SignallingListener>) -> Self {
        let url = config.url();
        info!("Opening signalling channel to {}", url);
        Self::with_transport(async move { connect_ws(&url).await }, listener)
    }

    /// Runs the channel over any frame transport. `connect` is awaited inside the
    /// driver task; messages sent before it resolves are queued.
    pub fn with_transport<F, S, R>(connect: F, listener: Arc<dyn SignallingListener>) -> Self
    where
        F: Future<Output = Result<(S, R), TransportError>> + Send + 'static,
        S: FrameSender,
        R: FrameReceiver,
    {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shared = Arc::new(ChannelShared::default());

        let driver = tokio::spawn(drive(
            connect,
            outbound_rx,
            shutdown_rx,
            listener,
            shared.clone(),
        ));

        Self {
            outbound_tx,
            shared,
            shutdown_tx: Some(shutdown_tx),
            driver: Some(driver),
        }
    }

    /// Queues a message for the relay. Fails once the channel is dead or destroyed.
    pub fn send(&self, message: SignallingMessage) -> Result<(), TransportError> {
        if self.shared.terminated.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed(format!(
                "signalling channel is closed, {} not sent",
                message.label()
            )));
        }

        self.outbound_tx.send(message).map_err(|e| {
            TransportError::SendFailed(format!(
                "outbound queue closed, {} not sent",
                e.0.label()
            ))
        })
    }

    pub fn is_established(&self) -> bool {
        self.shared.established.load(Ordering::SeqCst)
    }

    pub fn is_terminated(&self) -> bool {
        self.shared.terminated.load(Ordering::SeqCst)
    }

    /// Stops both loops and closes the connection. Later calls do nothing.
    ///
    /// Must not be awaited from inside a listener callback: the callback runs on the
    /// driver task this waits for.
    pub async fn destroy(&mut self) {
        let Some(mut driver) = self.driver.take() else {
            debug!("Signalling channel already destroyed");
            return;
        };

        self.shared.terminated.store(true, Ordering::SeqCst);
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }

        let joined = match tokio::time::timeout(CLOSE_GRACE, &mut driver).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("Signalling driver did not stop in {:?}, aborting", CLOSE_GRACE);
                driver.abort();
                driver.await
            }
        };

        if let Err(e) = joined {
            if !e.is_cancelled() {
                error!("Signalling driver panicked: {:?}", e);
            }
        }

        info!("Signalling channel destroyed");
    }
}

impl Drop for SignallingChannel {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

enum Outcome {
    Shutdown,
    Failed(TransportError),
}

async fn drive<F, S, R>(
    connect: F,
    mut outbound_rx: mpsc::UnboundedReceiver<SignallingMessage>,
    mut shutdown_rx: oneshot::Receiver<()>,
    listener: Arc<dyn SignallingListener>,
    shared: Arc<ChannelShared>,
) where
    F: Future<Output = Result<(S, R), TransportError>> + Send + 'static,
    S: FrameSender,
    R: FrameReceiver,
{
    let connected = tokio::select! {
        res = connect => res,
        _ = &mut shutdown_rx => {
            debug!("Signalling channel destroyed before the relay answered");
            outbound_rx.close();
            report_abandoned(&mut outbound_rx);
            return;
        }
    };

    let (mut sender, mut receiver) = match connected {
        Ok(halves) => halves,
        Err(e) => {
            error!("Could not reach relay: {}", e);
            shared.terminated.store(true, Ordering::SeqCst);
            listener.on_transport_error(e).await;
            return;
        }
    };

    shared.established.store(true, Ordering::SeqCst);
    listener.on_connection_established().await;

    let outcome = tokio::select! {
        res = send_loop(&mut sender, &mut outbound_rx) => match res {
            Ok(()) => Outcome::Shutdown,
            Err(e) => Outcome::Failed(e),
        },
        e = recv_loop(&mut receiver, listener.as_ref()) => Outcome::Failed(e),
        _ = &mut shutdown_rx => Outcome::Shutdown,
    };

    shared.terminated.store(true, Ordering::SeqCst);
    outbound_rx.close();

    report_abandoned(&mut outbound_rx);

    match outcome {
        Outcome::Shutdown => {
            sender.close().await;
            info!("Signalling loops stopped");
        }
        Outcome::Failed(e) => {
            error!("Signalling channel terminated: {}", e);
            listener.on_transport_error(e).await;
        }
    }
}

/// Empties a closed outbound queue, tracing every message that will never be sent.
fn report_abandoned(outbound_rx: &mut mpsc::UnboundedReceiver<SignallingMessage>) -> usize {
    let mut count = 0;
    while let Ok(message) = outbound_rx.try_recv() {
        debug!("Dropping unsent {}", message.label());
        count += 1;
    }
    if count > 0 {
        warn!("{} queued outbound message(s) abandoned", count);
    }
    count
}

/// `Ok` means every `SignallingChannel` handle is gone.
async fn send_loop<S: FrameSender>(
    sender: &mut S,
    outbound_rx: &mut mpsc::UnboundedReceiver<SignallingMessage>,
) -> Result<(), TransportError> {
    while let Some(message) = outbound_rx.recv().await {
        let text = codec::encode(&message);
        debug!("Sending {}: {}", message.label(), text);
        sender.send_frame(text).await?;
    }
    Ok(())
}

async fn recv_loop<R: FrameReceiver>(
    receiver: &mut R,
    listener: &dyn SignallingListener,
) -> TransportError {
    loop {
        let text = match receiver.recv_frame().await {
            Some(Ok(text)) => text,
            Some(Err(e)) => return e,
            None => return TransportError::ConnectionLost("relay closed the connection".into()),
        };
        debug!("Received: {}", text);

        match codec::decode(&text) {
            Ok(message) => dispatch(listener, message).await,
            Err(e) => warn!("Dropping undecodable frame ({}): {}", e, text),
        }
    }
}

async fn dispatch(listener: &dyn SignallingListener, message: SignallingMessage) {
    match message {
        SignallingMessage::Candidate(candidate) => {
            listener.on_ice_candidate_received(candidate).await
        }
        SignallingMessage::Offer { sdp } => {
            listener
                .on_offer_received(SessionDescription::offer(sdp))
                .await
        }
        SignallingMessage::Answer { sdp } => {
            listener
                .on_answer_received(SessionDescription::answer(sdp))
                .await
        }
    }
}
