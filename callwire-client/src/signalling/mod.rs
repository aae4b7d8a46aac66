mod channel;
mod config;
mod listener;
mod transport;
mod ws;

pub use channel::SignallingChannel;
pub use config::ChannelConfig;
pub use listener::SignallingListener;
pub use transport::{FrameReceiver, FrameSender};
pub use ws::{WsReceiver, WsSender, connect_ws};
