use crate::peer::PeerId;
use axum::extract::ws::{Message, Utf8Bytes};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Default)]
struct RelayInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
}

/// Registry of connected peers. Cheap to clone; all clones share the registry.
#[derive(Clone, Default)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl RelayService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    /// Forwards a text frame to every peer except `from`, untouched. Returns how many
    /// peers it was queued for.
    pub fn forward(&self, from: &PeerId, text: Utf8Bytes) -> usize {
        let mut delivered = 0;

        for peer in self.inner.peers.iter() {
            if peer.key() == from {
                continue;
            }
            match peer.value().send(Message::Text(text.clone())) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to queue frame for {}: {:?}", peer.key(), e),
            }
        }

        debug!("Forwarded frame from {} to {} peer(s)", from, delivered);
        delivered
    }
}
