// Subprocess decision agent — spawns a configured agent CLI.
//
// The agent command receives the system instruction via --system-prompt
// and the bookmark description on stdin, and must emit a single JSON
// document on stdout:
//   {"toolCalls": [{"name": "...", "input": {...}}], "status": "success"}
// or {"toolCalls": [], "status": "error", "error": "..."}.

use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{AgentOutcome, AgentStatus, Decider, ToolInvocation};

/// Decision agent backed by an external CLI.
pub struct CliDecider {
    command: String,
}

impl CliDecider {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

#[async_trait]
impl Decider for CliDecider {
    async fn decide(&self, system_prompt: &str, description: &str) -> Result<AgentOutcome> {
        debug!(command = %self.command, "Invoking decision agent");

        let mut child = Command::new(&self.command)
            .arg("--system-prompt")
            .arg(system_prompt)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn agent `{}`", self.command))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(description.as_bytes())
                .await
                .context("Failed to write description to agent stdin")?;
            // Drop closes the pipe so the agent sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for agent")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Agent exited with {}: {}", output.status, stderr.trim());
        }

        let raw: RawOutcome = serde_json::from_slice(&output.stdout)
            .context("Failed to parse agent output as tool-call JSON")?;

        let status = match raw.status.as_str() {
            "success" => AgentStatus::Success,
            other => AgentStatus::Error(
                raw.error
                    .unwrap_or_else(|| format!("agent reported status `{other}`")),
            ),
        };

        Ok(AgentOutcome {
            invocations: raw.tool_calls,
            status,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutcome {
    #[serde(default)]
    tool_calls: Vec<ToolInvocation>,
    status: String,
    #[serde(default)]
    error: Option<String>,
}
