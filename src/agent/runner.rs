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

use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use static_assertions::assert_impl_all;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, instrument, trace, warn};

use crate::common::{MailboxRegistry, CONFIG};
use crate::traits::Handler;

/// Lifecycle state of an [`AgentRunner`].
///
/// Transitions run one way: `Created -> Running -> Stopped`. There is no
/// path back to `Running`; a stopped runner must be recreated to run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RunnerState {
    /// Constructed, mailbox registered, receive loop not yet spawned.
    Created = 0,
    /// Receive loop is live and dispatching to the handler.
    Running = 1,
    /// Cancellation signaled; no further handler invocations occur.
    Stopped = 2,
}

impl RunnerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => RunnerState::Created,
            1 => RunnerState::Running,
            _ => RunnerState::Stopped,
        }
    }
}

/// Drives one agent's receive loop against the shared registry.
///
/// A runner owns no message state of its own: it reads from exactly one
/// mailbox (its name's) and its handler may write to any mailbox through the
/// registry. Runners are cheap-clone handles; clones observe and control the
/// same loop.
#[derive(Clone)]
pub struct AgentRunner {
    name: String,
    handler: Arc<dyn Handler>,
    registry: MailboxRegistry,
    cancellation: CancellationToken,
    tracker: TaskTracker,
    state: Arc<AtomicU8>,
}

impl Debug for AgentRunner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRunner")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

impl AgentRunner {
    /// Binds `name` to `handler` against `registry`.
    ///
    /// Registers the mailbox immediately, so messages addressed to this
    /// agent queue up from construction onward, even before [`start`](Self::start).
    pub fn new(name: &str, handler: Arc<dyn Handler>, registry: MailboxRegistry) -> Self {
        registry.register(name);
        AgentRunner {
            name: name.to_string(),
            handler,
            registry,
            cancellation: CancellationToken::new(),
            tracker: TaskTracker::new(),
            state: Arc::new(AtomicU8::new(RunnerState::Created as u8)),
        }
    }

    /// The agent name this runner reads for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunnerState {
        RunnerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Spawns the receive loop, moving the runner from `Created` to
    /// `Running`. Starting a runner in any other state is a logged no-op.
    ///
    /// The loop blocks on the agent's mailbox, hands each message to the
    /// handler, logs and discards handler errors, and repeats until the
    /// cancellation token fires. Handler invocations are strictly
    /// serialized; cancellation is only observed between them, at the
    /// loop's receive suspension point.
    #[instrument(skip(self), fields(agent = %self.name))]
    pub fn start(&self) {
        if self
            .state
            .compare_exchange(
                RunnerState::Created as u8,
                RunnerState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            warn!(
                agent = %self.name,
                state = ?self.state(),
                "start ignored, runner is not in the created state"
            );
            return;
        }

        let name = self.name.clone();
        let handler = self.handler.clone();
        let registry = self.registry.clone();
        let cancellation = self.cancellation.clone();

        self.tracker.spawn(async move {
            loop {
                tokio::select! {
                    _ = cancellation.cancelled() => {
                        trace!(agent = %name, "cancellation observed, leaving receive loop");
                        break;
                    }
                    received = registry.receive(&name) => match received {
                        Ok(message) => {
                            trace!(agent = %name, sender = %message.sender, "message received");
                            if let Err(error) = handler.on_message(message, &registry).await {
                                // At-most-once: the failed message is already
                                // consumed and is not redelivered.
                                error!(agent = %name, %error, "handler failed, message discarded");
                            }
                        }
                        Err(error) => {
                            error!(agent = %name, %error, "mailbox unavailable, leaving receive loop");
                            break;
                        }
                    },
                }
            }
            trace!(agent = %name, "receive loop finished");
        });
        self.tracker.close();
    }

    /// Signals cancellation and waits for the receive loop to finish, moving
    /// the runner to `Stopped`.
    ///
    /// A handler that is mid-flight completes first, and any messages it
    /// already sent remain sent; the mailbox's remaining contents stay
    /// queued, undelivered. Stopping a runner that never ran marks it
    /// `Stopped` without waiting. The wait is bounded by the configured
    /// per-agent shutdown timeout; overrunning it is logged, not raised.
    #[instrument(skip(self), fields(agent = %self.name))]
    pub async fn stop(&self) {
        let previous = self.state.swap(RunnerState::Stopped as u8, Ordering::AcqRel);
        if previous != RunnerState::Running as u8 {
            trace!(agent = %self.name, "stop on a runner that was not running");
            return;
        }

        self.cancellation.cancel();
        if timeout(CONFIG.agent_shutdown_timeout(), self.tracker.wait())
            .await
            .is_err()
        {
            error!(
                agent = %self.name,
                timeout_ms = CONFIG.timeouts.agent_shutdown_timeout_ms,
                "receive loop did not shut down within the configured timeout"
            );
        }
    }
}

assert_impl_all!(AgentRunner: Send, Sync);
