// Decision agent boundary — structured tool-invocation contract.
//
// The agent's internal reasoning is out of scope: magpie hands it a system
// instruction plus a per-bookmark description, and consumes the named tool
// invocations and terminal status it emits. Policy for multiple
// invocations lives in the pipeline (the first one is honored).

pub mod cli;
pub mod describe;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One named action the agent chose, with its structured payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub input: serde_json::Value,
}

/// Terminal status of one agent call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStatus {
    Success,
    Error(String),
}

/// Everything the agent emitted for one bookmark.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub invocations: Vec<ToolInvocation>,
    pub status: AgentStatus,
}

/// The decision-making collaborator.
#[async_trait]
pub trait Decider: Send + Sync {
    /// Ask the agent to pick an action for one described bookmark.
    ///
    /// An Err here is a transport failure (process died, unparseable
    /// output); an agent-level failure comes back as `AgentStatus::Error`.
    /// Both are fatal for the bookmark, not for the run.
    async fn decide(&self, system_prompt: &str, description: &str) -> Result<AgentOutcome>;
}
