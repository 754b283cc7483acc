//! Agents transform submitted text before it reaches the feed.
//!
//! An agent is built from a small JSON definition file:
//!
//! ```json
//! {"kind": "template", "name": "tidy", "template": "## {mode}\n\n{text}"}
//! {"kind": "command", "program": "python", "args": ["preprocess.py", "--mode", "{mode}"]}
//! {"kind": "identity"}
//! ```
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::types::{AgentError, PreprocessContext};

#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Agents without the capability pass text through untouched.
    fn has_preprocess(&self) -> bool {
        true
    }

    /// Per-agent limit overriding the engine default.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn preprocess(&self, text: &str, context: &PreprocessContext)
        -> Result<String, AgentError>;
}

/// Returns the input unchanged.
#[derive(Debug, Clone)]
pub struct IdentityAgent {
    name: String,
}

impl IdentityAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait::async_trait]
impl Agent for IdentityAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_preprocess(&self) -> bool {
        false
    }

    async fn preprocess(
        &self,
        text: &str,
        _context: &PreprocessContext,
    ) -> Result<String, AgentError> {
        Ok(text.to_string())
    }
}

/// Fills `{text}`, `{topic_id}`, `{mode}`, `{tags}` and `{timestamp}`.
#[derive(Debug, Clone)]
pub struct TemplateAgent {
    name: String,
    template: String,
}

impl TemplateAgent {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }
}

#[async_trait::async_trait]
impl Agent for TemplateAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn preprocess(
        &self,
        text: &str,
        context: &PreprocessContext,
    ) -> Result<String, AgentError> {
        Ok(expand_placeholders(&self.template, text, context))
    }
}

/// Runs an external program: text on stdin, result on stdout.
#[derive(Debug, Clone)]
pub struct CommandAgent {
    name: String,
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandAgent {
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl Agent for CommandAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn preprocess(
        &self,
        text: &str,
        context: &PreprocessContext,
    ) -> Result<String, AgentError> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| expand_placeholders(arg, text, context))
            .collect();

        let mut child = Command::new(&self.program)
            .args(&args)
            .env("NOTES_TOPIC_ID", context.topic_id.as_deref().unwrap_or(""))
            .env("NOTES_MODE", &context.mode)
            .env("NOTES_TIMESTAMP", context.timestamp.to_string())
            .env("NOTES_TAGS", context.tags.join(","))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(AgentError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = text.to_string();
            // Feed stdin concurrently so a chatty child cannot block on a full pipe.
            tokio::spawn(async move {
                let _ = stdin.write_all(input.as_bytes()).await;
                let _ = stdin.shutdown().await;
            });
        }

        let output = child.wait_with_output().await.map_err(AgentError::Io)?;
        if !output.status.success() {
            return Err(AgentError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentDefinition {
    Identity {
        #[serde(default)]
        name: Option<String>,
    },
    Template {
        #[serde(default)]
        name: Option<String>,
        template: String,
    },
    Command {
        #[serde(default)]
        name: Option<String>,
        program: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl AgentDefinition {
    pub fn parse(text: &str) -> Result<Self, AgentError> {
        serde_json::from_str(text).map_err(|err| AgentError::Definition(err.to_string()))
    }

    /// Builds the agent; `fallback_name` applies when the definition has none.
    pub fn build(self, fallback_name: &str) -> Result<Arc<dyn Agent>, AgentError> {
        let pick = |name: Option<String>| {
            name.filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| fallback_name.to_string())
        };
        let agent: Arc<dyn Agent> = match self {
            AgentDefinition::Identity { name } => Arc::new(IdentityAgent::new(pick(name))),
            AgentDefinition::Template { name, template } => {
                if template.trim().is_empty() {
                    return Err(AgentError::Definition("template is empty".into()));
                }
                Arc::new(TemplateAgent::new(pick(name), template))
            }
            AgentDefinition::Command {
                name,
                program,
                args,
                timeout_secs,
            } => {
                if program.trim().is_empty() {
                    return Err(AgentError::Definition("program is empty".into()));
                }
                Arc::new(CommandAgent::new(
                    pick(name),
                    program,
                    args,
                    timeout_secs.map(Duration::from_secs),
                ))
            }
        };
        Ok(agent)
    }
}

/// Reads an agent definition file and builds the agent it describes.
pub async fn load_agent(path: &Path, fallback_name: &str) -> Result<Arc<dyn Agent>, AgentError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AgentError::Read {
            path: path.display().to_string(),
            source,
        })?;
    AgentDefinition::parse(&text)?.build(fallback_name)
}

/// Single pass, so placeholders inside `text` are never expanded.
pub fn expand_placeholders(template: &str, text: &str, context: &PreprocessContext) -> String {
    let mut out = String::with_capacity(template.len() + text.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match key {
            "text" => out.push_str(text),
            "topic_id" => out.push_str(context.topic_id.as_deref().unwrap_or("")),
            "mode" => out.push_str(&context.mode),
            "tags" => out.push_str(&context.tags.join(", ")),
            "timestamp" => out.push_str(&context.timestamp.to_string()),
            _ => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
