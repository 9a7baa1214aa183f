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
#![allow(dead_code, unused_doc_comments)]

use ap_core::prelude::*;

use crate::setup::{initialize_tracing, tasks::ProbeTask};

mod setup;

/// Tests agent creation and the registry bookkeeping around it.
///
/// **Scenario:**
/// 1. Create a named, qualified agent from a specification.
/// 2. Search the registry.
///
/// **Verification:**
/// - The minted AID renders `<name>#<qualifier>@<platform-id>`.
/// - The registry reports it `INITIATED` with its source recorded.
#[tokio::test]
async fn test_create_registers_an_initiated_agent() -> anyhow::Result<()> {
    initialize_tracing();
    let platform = AgentPlatform::launch().await;
    let (task, _) = ProbeTask::new();
    let agent = platform
        .ams()
        .create(
            AgentSpecification::new("demo/sensors/probe.wasm")
                .named("probe")
                .qualified("sensors"),
            Box::new(task),
        )
        .await?;

    assert_eq!(
        agent.id().to_string(),
        format!("probe#sensors@{}", platform.id())
    );

    let found = platform.ams().search(&AmsSearch {
        name: Some("probe".into()),
        state: None,
    });
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].state, AgentState::Initiated);
    assert_eq!(found[0].source, "demo/sensors/probe.wasm");
    assert!(!found[0].running);

    platform.shutdown_all().await;
    Ok(())
}

/// Tests the naming service: reserved and duplicate names are refused.
///
/// **Scenario:**
/// 1. Try to create an agent named `ams`.
/// 2. Create `worker`, then try to create a second `worker`.
///
/// **Verification:**
/// - Both offending requests fail with `NameTaken`; anonymous creation
///   still works.
#[tokio::test]
async fn test_reserved_and_duplicate_names_are_refused() -> anyhow::Result<()> {
    initialize_tracing();
    let platform = AgentPlatform::launch().await;

    let (task, _) = ProbeTask::new();
    let result = platform
        .ams()
        .create(AgentSpecification::new("demo/x").named("ams"), Box::new(task))
        .await;
    assert!(matches!(result, Err(AmsError::NameTaken(name)) if name == "ams"));

    let (task, _) = ProbeTask::new();
    platform
        .ams()
        .create(AgentSpecification::new("demo/x").named("worker"), Box::new(task))
        .await?;
    let (task, _) = ProbeTask::new();
    let result = platform
        .ams()
        .create(AgentSpecification::new("demo/x").named("worker"), Box::new(task))
        .await;
    assert!(matches!(result, Err(AmsError::NameTaken(name)) if name == "worker"));

    let (task, _) = ProbeTask::new();
    let anonymous = platform
        .ams()
        .create(AgentSpecification::new("demo/x"), Box::new(task))
        .await?;
    assert!(anonymous.id().name().is_none());

    platform.shutdown_all().await;
    Ok(())
}

/// Tests supervisory operations against an unknown AID.
///
/// **Scenario:**
/// 1. Mint an AID that was never registered.
/// 2. Issue each supervisory command against it.
///
/// **Verification:**
/// - Every command fails with `UnknownAgent`.
#[tokio::test]
async fn test_supervision_of_unknown_agents_fails() -> anyhow::Result<()> {
    initialize_tracing();
    let platform = AgentPlatform::launch().await;
    let ghost = AgentIdentity::named("ghost", platform.id());

    assert!(matches!(
        platform.ams().invoke(&ghost).await,
        Err(LifecycleError::UnknownAgent(_))
    ));
    assert!(matches!(
        platform.ams().suspend(&ghost).await,
        Err(LifecycleError::UnknownAgent(_))
    ));
    assert!(matches!(
        platform.ams().terminate(&ghost).await,
        Err(LifecycleError::UnknownAgent(_))
    ));

    platform.shutdown_all().await;
    Ok(())
}

/// Tests that illegal supervisory commands are rejected, not applied.
///
/// **Scenario:**
/// 1. Create an agent and leave it `INITIATED`.
/// 2. Ask the AMS to suspend it.
///
/// **Verification:**
/// - The command fails with `InvalidTransition` and the agent stays
///   `INITIATED`.
#[tokio::test]
async fn test_illegal_supervisory_commands_are_rejected() -> anyhow::Result<()> {
    initialize_tracing();
    let platform = AgentPlatform::launch().await;
    let (task, _) = ProbeTask::new();
    let agent = platform
        .spawn_agent(AgentSpecification::new("demo/probe"), Box::new(task))
        .await?;

    let result = platform.ams().suspend(agent.id()).await;
    assert!(matches!(
        result,
        Err(LifecycleError::InvalidTransition {
            current: AgentState::Initiated,
            requested: AgentState::Suspended,
        })
    ));
    assert_eq!(agent.state(), AgentState::Initiated);

    platform.shutdown_all().await;
    Ok(())
}

/// Tests the platform description exposed by the AMS.
///
/// **Scenario:**
/// 1. Launch a platform and create one agent.
/// 2. Fetch the description.
///
/// **Verification:**
/// - The platform identifier is twelve hex characters, the AMS AID is
///   exactly `ams@<platform-id>`, and the agent count matches.
#[tokio::test]
async fn test_platform_description() -> anyhow::Result<()> {
    initialize_tracing();
    let platform = AgentPlatform::launch().await;
    let (task, _) = ProbeTask::new();
    platform
        .spawn_agent(AgentSpecification::new("demo/probe").named("probe"), Box::new(task))
        .await?;

    let description = platform.ams().get_description();
    let rendered = description.platform.to_string();
    assert_eq!(rendered.len(), 12);
    assert!(rendered.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        description.ams.to_string(),
        format!("ams@{}", description.platform)
    );
    assert_eq!(description.agent_count, 1);

    platform.shutdown_all().await;
    Ok(())
}

/// Tests that termination removes an agent from registry and routing.
///
/// **Scenario:**
/// 1. Create and invoke an agent, then terminate it through the AMS.
/// 2. Search for it and try to deliver to it.
///
/// **Verification:**
/// - The registry no longer lists it and delivery fails with
///   `UnknownRecipient`.
#[tokio::test]
async fn test_terminate_removes_registry_and_route() -> anyhow::Result<()> {
    initialize_tracing();
    let platform = AgentPlatform::launch().await;
    let (task, _) = ProbeTask::new();
    let agent = platform
        .spawn_agent(AgentSpecification::new("demo/probe").named("doomed"), Box::new(task))
        .await?;
    agent.invoke().await?;

    assert_eq!(
        platform.ams().terminate(agent.id()).await?,
        AgentState::Unknown
    );
    assert!(platform.ams().find(agent.id()).is_none());
    assert!(platform.ams().search(&AmsSearch::default()).is_empty());

    let envelope = MessageEnvelope::new(
        platform.ams().aid().clone(),
        agent.id().clone(),
        b"too late".to_vec(),
    );
    assert!(matches!(
        platform.transport().deliver(envelope),
        Err(TransportError::UnknownRecipient(_))
    ));

    platform.shutdown_all().await;
    Ok(())
}

/// Tests the directory facilitator end to end on a running platform.
///
/// **Scenario:**
/// 1. Register two services for a created agent.
/// 2. Search, modify, and deregister.
///
/// **Verification:**
/// - Searches filter by type; modification replaces the description;
///   deregistration empties the directory.
#[tokio::test]
async fn test_directory_facilitator_roundtrip() -> anyhow::Result<()> {
    initialize_tracing();
    let platform = AgentPlatform::launch().await;
    let (task, _) = ProbeTask::new();
    let agent = platform
        .spawn_agent(
            AgentSpecification::new("demo/translator").named("translator"),
            Box::new(task),
        )
        .await?;

    let directory = platform.directory();
    directory.register(
        ServiceDescription::new(agent.id().clone(), "translation").with_property("lang", "fr"),
    );

    let hits = directory.search(&SearchCriteria {
        service_type: Some("translation".into()),
        property: None,
    });
    assert_eq!(hits.len(), 1);
    assert_eq!(&hits[0].aid, agent.id());

    directory.modify(ServiceDescription::new(agent.id().clone(), "interpretation"))?;
    assert!(directory
        .search(&SearchCriteria {
            service_type: Some("translation".into()),
            property: None,
        })
        .is_empty());

    directory.deregister(agent.id())?;
    assert!(directory.is_empty());

    platform.shutdown_all().await;
    Ok(())
}

/// Tests that a platform can host more than one directory facilitator.
///
/// **Scenario:**
/// 1. Add a second directory and register a service only there.
///
/// **Verification:**
/// - The default directory stays empty; the new one has the entry.
#[tokio::test]
async fn test_multiple_directory_facilitators() -> anyhow::Result<()> {
    initialize_tracing();
    let mut platform = AgentPlatform::launch().await;
    let aid = AgentIdentity::named("offsite", platform.id());

    let second = platform.add_directory();
    second.register(ServiceDescription::new(aid, "storage"));

    assert_eq!(platform.directories().len(), 2);
    assert!(platform.directory().is_empty());
    assert_eq!(platform.directories()[1].len(), 1);

    platform.shutdown_all().await;
    Ok(())
}
