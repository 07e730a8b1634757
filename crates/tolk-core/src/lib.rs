pub mod chunker;
pub mod error;
pub mod factory;
pub mod manager;
pub mod post;
pub mod resolver;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use chunker::chunk;
pub use error::SessionError;
pub use factory::{ProviderFactory, TranslatorFactory};
pub use manager::{CancelOutcome, PassOutcome, SessionManager};
pub use resolver::{BatchResolver, ResolverOptions};
pub use session::{PageLimits, Progress, Session, SessionKey, SessionState};
pub use transport::Transport;
