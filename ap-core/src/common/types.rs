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

//! Crate-internal type aliases for channels and shared state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::agent::AgentStateMachine;
use crate::message::{ControlCommand, MessageEnvelope};

/// Per-agent state machine behind its single-writer lock. Only the agent's
/// own runner writes through it; the AMS and the MTS read.
pub(crate) type SharedStateMachine = Arc<Mutex<AgentStateMachine>>;

/// Sender half of an agent's control channel.
pub(crate) type ControlSender = UnboundedSender<ControlCommand>;

/// Receiver half of an agent's control channel.
pub(crate) type ControlReceiver = UnboundedReceiver<ControlCommand>;

/// Sender half of an agent's task-visible inbound channel.
pub(crate) type InboundSender = UnboundedSender<MessageEnvelope>;

/// Receiver half of an agent's task-visible inbound channel.
pub(crate) type InboundReceiver = UnboundedReceiver<MessageEnvelope>;
