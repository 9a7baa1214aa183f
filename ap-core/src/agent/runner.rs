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

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::{debug, info, instrument, trace, warn};

use crate::agent::{Agent, AgentState, LifecycleError};
use crate::message::{ControlCommand, ControlSignal};
use crate::traits::TaskContext;

impl Agent {
    /// The agent's task loop.
    ///
    /// While `ACTIVE`, each iteration is one checkpoint (apply every
    /// pending control command, hand every pending envelope to the task)
    /// followed by one unit of work; control commands are never applied
    /// mid-unit. While not `ACTIVE`, the runner parks on the control
    /// channel. The loop ends when the state reaches `UNKNOWN` or every
    /// handle is gone.
    #[instrument(skip(self), fields(agent = %self.identity))]
    pub(crate) async fn run(mut self) {
        trace!(pid = self.pid, "agent runner started");
        loop {
            let current = self.state.lock().current();
            match current {
                AgentState::Unknown => break,
                AgentState::Active => {
                    while let Ok(command) = self.control_rx.try_recv() {
                        self.apply_command(command);
                    }
                    if self.state.lock().current() != AgentState::Active {
                        continue;
                    }
                    self.pump_inbound().await;
                    let mut context =
                        TaskContext::new(self.identity.clone(), Arc::clone(&self.transport));
                    if let Err(error) = self.task.run_unit(&mut context).await {
                        warn!(%error, "unit of work failed");
                    }
                }
                _ => match self.control_rx.recv().await {
                    Some(command) => self.apply_command(command),
                    None => break,
                },
            }
        }
        self.transport.close_route(&self.identity);
        trace!("agent runner stopped");
    }

    /// Hands every envelope waiting on the inbound channel to the task.
    async fn pump_inbound(&mut self) {
        while let Ok(envelope) = self.inbound_rx.try_recv() {
            let mut context = TaskContext::new(self.identity.clone(), Arc::clone(&self.transport));
            if let Err(error) = self.task.on_envelope(envelope, &mut context).await {
                warn!(%error, "envelope handler failed");
            }
        }
    }

    fn apply_command(&mut self, command: ControlCommand) {
        let signal = command.signal;
        let result = self.apply_signal(signal);
        if let Err(error) = &result {
            debug!(?signal, %error, "control signal rejected");
        }
        if let Some(ack) = command.ack {
            if ack.send(result).is_err() {
                trace!(?signal, "acknowledgement receiver dropped");
            }
        }
    }

    fn apply_signal(&mut self, signal: ControlSignal) -> Result<AgentState, LifecycleError> {
        // A graceful quit may be declined by the task; a forced kill never is.
        if signal == ControlSignal::Terminate && !self.task.accept_quit() {
            info!("task declined graceful quit");
            return Ok(self.state.lock().current());
        }

        let target = signal.target_state();
        let mut machine = self.state.lock();
        let applied = machine.apply(target)?;
        match target {
            AgentState::Active => {
                self.running.store(true, Ordering::SeqCst);
                // Buffered mail is flushed ahead of any new delivery; the
                // held state lock keeps the transport from interleaving.
                for envelope in self.mailbox.drain() {
                    if self.inbound_tx.send(envelope).is_err() {
                        warn!("inbound channel closed while draining mailbox");
                        break;
                    }
                }
            }
            AgentState::Waiting | AgentState::Unknown => {
                self.running.store(false, Ordering::SeqCst);
            }
            AgentState::Initiated | AgentState::Suspended | AgentState::Transit => {}
        }
        Ok(applied)
    }
}
