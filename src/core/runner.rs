use crate::config::HealthCheckConfig;
use crate::domain::ports::ToolProbe;
use crate::utils::error::{Result, TaplistError};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Exit code used when the check process ends without one (killed by a signal).
pub const ABNORMAL_EXIT_CODE: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmokeOutcome {
    /// The tooling the check needs is not installed; nothing was run.
    Skipped { reason: String },
    /// The check process ran and exited with this code.
    Completed { exit_code: i32 },
}

impl SmokeOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            SmokeOutcome::Skipped { .. } => 0,
            SmokeOutcome::Completed { exit_code } => *exit_code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CheckCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `program check ...` for `config`. The browser path is left out: the
    /// runner passes whatever its probe located.
    pub fn for_config(program: impl Into<PathBuf>, config: &HealthCheckConfig) -> Self {
        let config = HealthCheckConfig {
            browser: None,
            ..config.clone()
        };
        Self {
            program: program.into(),
            args: config.to_check_args(),
        }
    }

    /// Re-invokes the running `taplist` binary.
    pub fn current_exe(config: &HealthCheckConfig) -> Result<Self> {
        let program = std::env::current_exe().map_err(|e| TaplistError::ConfigError {
            message: format!("cannot locate the taplist executable: {}", e),
        })?;
        Ok(Self::for_config(program, config))
    }
}

/// Probes for the check's tooling, then either skips or runs the check as
/// a child process and forwards its exit code.
pub struct SmokeRunner {
    command: CheckCommand,
    probe: Option<Box<dyn ToolProbe>>,
}

impl SmokeRunner {
    pub fn new(command: CheckCommand) -> Self {
        Self {
            command,
            probe: None,
        }
    }

    /// Without a probe the check needs no optional tooling and always runs.
    pub fn with_probe(mut self, probe: Box<dyn ToolProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub async fn run(&self) -> Result<SmokeOutcome> {
        let mut command = self.command.clone();

        if let Some(probe) = &self.probe {
            match probe.locate() {
                None => {
                    let reason = format!("no {} found", probe.describe());
                    tracing::warn!("⚠️ Skipping health check: {}", reason);
                    return Ok(SmokeOutcome::Skipped { reason });
                }
                Some(path) => {
                    tracing::info!("Using {}", path.display());
                    command = command.arg(format!("--browser={}", path.display()));
                }
            }
        }

        tracing::debug!("Spawning {} {:?}", command.program.display(), command.args);
        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await?;

        let exit_code = match status.code() {
            Some(code) => code,
            None => {
                tracing::error!("Health check process terminated abnormally: {}", status);
                ABNORMAL_EXIT_CODE
            }
        };
        Ok(SmokeOutcome::Completed { exit_code })
    }
}
