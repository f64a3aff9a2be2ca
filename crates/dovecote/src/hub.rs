//! Provider wiring for inbox components
//!
//! An [`InboxHub`] owns the pieces every component needs: the service
//! facade, the event bus, and the validated configuration. Components are
//! only obtainable from a hub, which is what keeps two views of the same
//! inbox on one bus. Separate hubs share nothing.

use std::sync::Arc;

use dovecote_common::NotificationClient;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::badge::BadgeCounter;
use crate::bus::EventBus;
use crate::error::{ErrorHook, InboxError, InboxResult};
use crate::inbox::Inbox;

const DEFAULT_PAGE_SIZE: usize = 15;

/// Configuration accepted by [`InboxHub`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct InboxConfig {
    /// Credential the embedder authenticated the service facade with
    #[builder(into)]
    pub user_token: SmolStr,

    /// Recipient whose notifications the hub manages
    #[builder(into)]
    pub recipient_id: SmolStr,

    /// Page size for list fetches, defaulting to 15
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

/// Owner of the facade, the bus, and the configuration, and the only
/// source of wired [`Inbox`] and [`BadgeCounter`] instances.
pub struct InboxHub<C> {
    client: Arc<C>,
    bus: EventBus,
    config: InboxConfig,
    page_size: usize,
    on_error: Option<ErrorHook>,
}

impl<C> std::fmt::Debug for InboxHub<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxHub")
            .field("config", &self.config)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl<C: NotificationClient> InboxHub<C> {
    /// Validates `config` and builds a hub around `client`.
    ///
    /// Blank `user_token` or `recipient_id` is rejected with
    /// [`InboxError::MissingParameter`].
    pub fn new(client: C, config: InboxConfig) -> InboxResult<Self> {
        Self::build(client, config, None)
    }

    /// Like [`new`](Self::new), with an error hook that will also receive
    /// fetch failures from every inbox this hub vends. A configuration
    /// error is delivered to the hook before it is returned.
    pub fn with_error_hook(client: C, config: InboxConfig, hook: ErrorHook) -> InboxResult<Self> {
        Self::build(client, config, Some(hook))
    }

    fn build(client: C, config: InboxConfig, on_error: Option<ErrorHook>) -> InboxResult<Self> {
        if let Err(err) = validate(&config) {
            if let Some(hook) = &on_error {
                hook(&err);
            }
            return Err(err);
        }
        let page_size = config.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        #[cfg(feature = "tracing")]
        tracing::debug!(recipient = %config.recipient_id, page_size, "inbox hub ready");

        Ok(Self {
            client: Arc::new(client),
            bus: EventBus::new(),
            config,
            page_size,
            on_error,
        })
    }

    /// Builds a notification list wired to this hub's bus and facade.
    pub fn inbox(&self) -> Inbox<C> {
        Inbox::new(
            self.client.clone(),
            self.bus.clone(),
            self.page_size,
            self.config.recipient_id.clone(),
            self.on_error.clone(),
        )
    }

    /// Builds an unviewed-count badge wired to this hub's bus and facade.
    pub fn badge(&self) -> BadgeCounter<C> {
        BadgeCounter::new(self.client.clone(), &self.bus)
    }

    /// The hub's event bus, for embedders that publish or observe
    /// mutation events themselves.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The validated configuration.
    pub fn config(&self) -> &InboxConfig {
        &self.config
    }

    /// Effective page size after defaulting and clamping.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

fn validate(config: &InboxConfig) -> InboxResult<()> {
    if config.user_token.trim().is_empty() {
        return Err(InboxError::MissingParameter("user_token"));
    }
    if config.recipient_id.trim().is_empty() {
        return Err(InboxError::MissingParameter("recipient_id"));
    }
    Ok(())
}
