/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::join_all;
use tokio::time::timeout;
use tracing::{error, instrument, trace};

use crate::agent::{AgentRunner, RunnerState};
use crate::common::{DeliveryStatus, MailboxRegistry, CONFIG};
use crate::message::{BusError, Message};
use crate::traits::Handler;

/// Creates [`AgentRunner`]s against a shared [`MailboxRegistry`] and fans
/// lifecycle operations out across all of them.
///
/// The manager owns the registry; its lifetime bounds every mailbox's
/// lifetime. Nothing is persisted — dropping the manager discards all
/// queued messages.
#[derive(Debug, Clone, Default)]
pub struct AgentManager {
    registry: MailboxRegistry,
    runners: Arc<DashMap<String, AgentRunner>>,
}

impl AgentManager {
    /// Creates a manager with an empty registry and no runners.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry, for callers that want to send or receive
    /// directly.
    pub fn registry(&self) -> &MailboxRegistry {
        &self.registry
    }

    /// Number of recorded runners.
    pub fn agent_count(&self) -> usize {
        self.runners.len()
    }

    /// Lifecycle state of the named runner, if one is recorded.
    pub fn runner_state(&self, name: &str) -> Option<RunnerState> {
        self.runners.get(name).map(|runner| runner.state())
    }

    /// Records a runner binding `name` to `handler`.
    ///
    /// The agent's mailbox is registered immediately, so messages addressed
    /// to it queue up even before [`start_all`](Self::start_all).
    ///
    /// # Errors
    ///
    /// [`BusError::AgentAlreadyExists`] if a runner is already recorded
    /// under `name`. The check is against the manager's own runner map;
    /// mailbox registration stays idempotent underneath.
    #[instrument(skip(self, handler))]
    pub fn add_agent(&self, name: &str, handler: impl Handler) -> Result<(), BusError> {
        match self.runners.entry(name.to_string()) {
            Entry::Occupied(_) => Err(BusError::AgentAlreadyExists(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(AgentRunner::new(
                    name,
                    Arc::new(handler),
                    self.registry.clone(),
                ));
                trace!(agent = name, "runner recorded");
                Ok(())
            }
        }
    }

    /// Starts every recorded runner.
    ///
    /// Task spawning is synchronous under tokio, so the whole fan-out has
    /// completed when this returns. Runners that are not in the `Created`
    /// state are skipped (logged by the runner itself).
    #[instrument(skip(self))]
    pub fn start_all(&self) {
        for entry in self.runners.iter() {
            entry.value().start();
        }
    }

    /// Stops every recorded runner concurrently and waits for all of them,
    /// regardless of individual outcomes.
    ///
    /// The join is bounded by the configured system shutdown timeout;
    /// overrunning it is logged, not raised.
    #[instrument(skip(self))]
    pub async fn stop_all(&self) {
        // Clone the handles out so no map guard lives across the join.
        let runners: Vec<AgentRunner> = self
            .runners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        let stops = runners.iter().map(|runner| runner.stop());
        if timeout(CONFIG.system_shutdown_timeout(), join_all(stops))
            .await
            .is_err()
        {
            error!(
                timeout_ms = CONFIG.timeouts.system_shutdown_timeout_ms,
                "some runners did not stop within the configured timeout"
            );
        }
    }

    /// Constructs a [`Message`] and delegates to the registry's
    /// [`send`](MailboxRegistry::send). Convenience for external callers
    /// that are not themselves agents.
    pub fn send(&self, sender: &str, recipient: &str, content: &str) -> DeliveryStatus {
        self.registry.send(Message::new(
            sender.to_string(),
            recipient.to_string(),
            content.to_string(),
        ))
    }
}
