use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tolk_config::Config;
use tolk_config::host::HostConfig;
use tolk_core::TranslatorFactory;
use tolk_types::{Message, Request};

use crate::context::RequestContext;
use crate::events::event_loop;
use crate::io::{input_loop, output_loop};
use crate::state::AppState;
use crate::transport::ChannelTransport;

/// Centralized channel management
pub struct ChannelSet {
    pub requests: (AsyncSender<Request>, AsyncReceiver<Request>),
    pub messages: (AsyncSender<Message>, AsyncReceiver<Message>),
}

impl ChannelSet {
    pub fn new(host: &HostConfig) -> Self {
        Self {
            requests: kanal::bounded_async(host.request_capacity),
            messages: kanal::bounded_async(host.message_capacity), // page chunk bursts
        }
    }
}

/// Host controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(config: Config, factory: Arc<dyn TranslatorFactory>) -> Self {
        let channels = ChannelSet::new(&config.host);
        let transport = Arc::new(ChannelTransport::new(channels.messages.0.clone()));
        let state = Arc::new(AppState::new(config, factory, transport));

        Self {
            channels,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn spawn_tasks<R, W>(&self, reader: R, writer: W) -> JoinSet<anyhow::Result<()>>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut tasks = JoinSet::new();

        // Extension -> host
        tasks.spawn(input_loop(
            reader,
            self.channels.requests.0.clone(),
            self.cancel_token.clone(),
        ));

        // Event loop
        let ctx = RequestContext::new(self.state.clone(), self.channels.messages.0.clone());
        tasks.spawn(event_loop(
            ctx,
            self.channels.requests.1.clone(),
            self.cancel_token.clone(),
        ));

        // Host -> extension
        tasks.spawn(output_loop(
            writer,
            self.channels.messages.1.clone(),
            self.cancel_token.clone(),
        ));

        tasks
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
