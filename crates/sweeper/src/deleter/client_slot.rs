//! Lazily created service client owned by a deleter

use crate::aws::{AwsContext, FromAwsContext};
use std::sync::OnceLock;
use tracing::debug;

/// A service client that is built on first use and then reused.
///
/// Access goes through `&mut self`, so a deleter's client is never shared
/// between tasks.
pub struct ClientSlot<C> {
    state: SlotState<C>,
}

enum SlotState<C> {
    Lazy {
        ctx: AwsContext,
        build: fn(&AwsContext) -> C,
        client: OnceLock<C>,
    },
    Ready(C),
}

impl<C: FromAwsContext> ClientSlot<C> {
    /// Build the client from `ctx` the first time it is needed
    pub fn lazy(ctx: &AwsContext) -> Self {
        Self {
            state: SlotState::Lazy {
                ctx: ctx.clone(),
                build: C::from_context,
                client: OnceLock::new(),
            },
        }
    }
}

impl<C> ClientSlot<C> {
    /// Use an already constructed client
    pub fn ready(client: C) -> Self {
        Self {
            state: SlotState::Ready(client),
        }
    }

    #[cfg(test)]
    fn is_ready(&self) -> bool {
        match &self.state {
            SlotState::Lazy { client, .. } => client.get().is_some(),
            SlotState::Ready(_) => true,
        }
    }

    /// Get the client, creating it if this is the first use
    pub fn get(&mut self) -> &C {
        match &self.state {
            SlotState::Lazy { ctx, build, client } => client.get_or_init(|| {
                debug!(region = %ctx.region(), "Creating service client");
                build(ctx)
            }),
            SlotState::Ready(client) => client,
        }
    }
}
