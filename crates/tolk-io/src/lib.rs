pub mod framing;
pub mod listener;

pub use framing::{FrameError, MAX_INCOMING, MAX_OUTGOING, read_frame, read_message, write_frame, write_message};
pub use listener::listen_frames;
