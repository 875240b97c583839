use crate::traits::{Task, TaskResult};
use crate::utils::advice::advise;
use crate::utils::logger::{setup_logger, RESULT_TARGET};
use std::process::ExitCode;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Drives one script task from bootstrap to exit code.
pub struct ScriptRunner {
    _guard: Option<WorkerGuard>,
}

impl ScriptRunner {
    /// Loads `.env` and installs logging. Keep the runner alive until exit so
    /// the file writer flushes.
    pub fn bootstrap() -> Self {
        dotenv::dotenv().ok();
        Self {
            _guard: setup_logger(),
        }
    }

    /// Runs the task until it finishes or Ctrl+C arrives.
    pub async fn run<C>(&self, task: &dyn Task<C>, ctx: C) -> ExitCode
    where
        C: Send,
    {
        if self.execute(task, ctx).await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    async fn execute<C>(&self, task: &dyn Task<C>, ctx: C) -> bool
    where
        C: Send,
    {
        let token = CancellationToken::new();
        let cloned_token = token.clone();

        let listener = tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    warn!("🛑 Received Ctrl+C. Aborting...");
                    cloned_token.cancel();
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });

        let start_time = std::time::Instant::now();
        info!("Starting task {}", task.name());

        let outcome = tokio::select! {
            res = task.run(ctx) => Some(res),
            _ = token.cancelled() => None,
        };
        listener.abort();

        let elapsed = start_time.elapsed().as_secs_f64();
        match outcome {
            Some(Ok(result)) => Self::report(task.name(), &result, elapsed),
            Some(Err(e)) => {
                Self::report_error(task.name(), &e);
                false
            }
            None => {
                warn!(target: RESULT_TARGET, "{} interrupted after {:.1}s", task.name(), elapsed);
                false
            }
        }
    }

    /// Reports an error raised before the task could start (config, key, provider).
    pub fn fail(&self, name: &str, error: anyhow::Error) -> ExitCode {
        Self::report_error(name, &error);
        ExitCode::FAILURE
    }

    fn report_error(name: &str, error: &anyhow::Error) {
        error!(target: RESULT_TARGET, "❌ {} FAILED: {:#}", name, error);
        if let Some(advice) = advise(error) {
            for line in advice.lines() {
                println!("{}", line);
            }
        }
    }

    fn report(name: &str, result: &TaskResult, elapsed: f64) -> bool {
        let tx = result
            .tx_hash
            .as_deref()
            .map(|h| format!(" | tx {}", h))
            .unwrap_or_default();

        if result.success {
            info!(target: RESULT_TARGET, "{} SUCCESS in {:.1}s{}", name, elapsed, tx);
            true
        } else {
            error!(target: RESULT_TARGET, "{} FAILED: {}{}", name, result.message, tx);
            false
        }
    }
}
