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

#![forbid(unsafe_code)]
//! AP Core Library
//!
//! This library provides the runtime core of a FIPA-style agent platform:
//! agents with a managed life cycle, the supervisory Agent Management System
//! (AMS), the Directory Facilitator (DF) service registry, and the Message
//! Transport Service (MTS) that delivers, buffers, and forwards envelopes
//! between agents.

pub(crate) mod agent;
pub(crate) mod ams;
/// Common utilities and structures used throughout the platform.
pub(crate) mod common;
pub(crate) mod identity;
pub(crate) mod message;
pub(crate) mod transport;
/// Trait definitions used by agent behaviors.
pub(crate) mod traits;

/// Prelude module for convenient imports.
///
/// Re-exports the platform container, the supervisory and transport
/// components, the identity and envelope types, and the `async_trait`
/// attribute used to implement [`AgentTask`](crate::traits::AgentTask).
pub mod prelude {
    pub use async_trait;

    pub use crate::agent::{
        AgentSpecification, AgentState, AgentStateMachine, LifecycleError,
    };
    pub use crate::ams::{
        AgentManagementSystem, AmsAgentDescription, AmsError, AmsSearch, PlatformDescription,
    };
    pub use crate::common::{
        AgentHandle, AgentPlatform, DirectoryError, DirectoryFacilitator, LimitsConfig,
        PlatformConfig, SearchCriteria, ServiceDescription, TimeoutConfig, CONFIG,
    };
    pub use crate::identity::{AgentIdentity, PlatformId, PlatformIdParseError};
    pub use crate::message::{ControlSignal, MessageEnvelope, TransportDescription};
    pub use crate::transport::{Delivery, Mailbox, MessageTransportService, TransportError};
    pub use crate::traits::{AgentTask, IdleTask, TaskContext};
}
