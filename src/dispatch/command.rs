use super::Dispatcher;
use crate::trace::VmRequest;
use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Runs an external program once per batch, feeding the batch as JSON on stdin
pub struct CommandDispatcher {
    program: String,
    args: Vec<String>,
}

impl CommandDispatcher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandDispatcher {
            program: program.into(),
            args,
        }
    }
}

impl Dispatcher for CommandDispatcher {
    fn dispatch(&mut self, batch: &[VmRequest]) -> Result<()> {
        let payload = serde_json::to_vec(batch)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn dispatcher {}", self.program))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| anyhow::anyhow!("dispatcher stdin unavailable"))?;
            // A program may exit without reading its input; its status decides.
            match stdin.write_all(&payload) {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                other => other?,
            }
        }

        let status = child.wait()?;
        if !status.success() {
            anyhow::bail!("dispatcher {} exited with {}", self.program, status);
        }

        tracing::debug!("Dispatched {} requests via {}", batch.len(), self.program);
        Ok(())
    }
}
