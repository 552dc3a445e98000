use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::Token;
use crate::classify::ErrorClassifier;
use crate::config::{Config, OutputFormat};
use crate::model::{Conclusion, RunStatus, Step};
use crate::orchestrator::{DebugOptions, DebugOrchestrator};
use crate::output;
use crate::providers::{GitHubProvider, RunProvider};
use crate::report::DebugReport;

#[derive(Parser)]
#[command(name = "cidebug")]
#[command(author, version, about = "CI Workflow Debugger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// GitHub personal access token
    #[arg(short, long, global = true, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Repository in 'owner/repo' format
    #[arg(short = 'R', long, global = true)]
    repo: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Report format, overriding the config file
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger a workflow, watch it to completion and classify any failures
    Run {
        /// Workflow file name (e.g. ci.yml)
        workflow: String,

        /// Git ref to run the workflow on
        #[arg(short = 'r', long = "ref")]
        ref_: Option<String>,

        /// Workflow inputs as key=value pairs
        #[arg(short = 'f', long = "input", value_parser = parse_key_val)]
        inputs: Vec<(String, String)>,

        /// Seconds between status polls
        #[arg(long)]
        poll_interval: Option<u64>,

        /// Seconds to wait for the run to complete
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Watch an existing run and classify any failures
    Watch {
        /// Run identifier
        run_id: u64,

        /// Seconds between status polls
        #[arg(long)]
        poll_interval: Option<u64>,

        /// Seconds to wait for the run to complete
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List workflows defined in the repository
    Workflows,

    /// Classify a local log file without contacting the provider
    Classify {
        /// Path to the log file
        logfile: PathBuf,

        /// Job name to record in the diagnosis
        #[arg(long, default_value = "local")]
        job: String,

        /// Step name to record in the diagnosis
        #[arg(long, default_value = "log")]
        step: String,

        /// Show every matching taxonomy entry instead of only the first
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}

fn parse_key_val(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("invalid input '{raw}': expected key=value"))
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Run {
                workflow,
                ref_,
                inputs,
                poll_interval,
                timeout,
            } => {
                self.execute_run(&config, workflow, ref_.as_deref(), inputs, *poll_interval, *timeout)
                    .await
            }
            Commands::Watch {
                run_id,
                poll_interval,
                timeout,
            } => {
                self.execute_watch(&config, *run_id, *poll_interval, *timeout)
                    .await
            }
            Commands::Workflows => self.execute_workflows(&config).await,
            Commands::Classify {
                logfile,
                job,
                step,
                all,
            } => self.execute_classify(logfile, job, step, *all),
        }
    }

    fn provider(&self, config: &Config) -> Result<Arc<dyn RunProvider>> {
        let repo = self
            .repo
            .clone()
            .or_else(|| config.github.repo_path.clone())
            .context("Repository required: pass --repo or set github.repo-path in the config")?;

        let token = self
            .token
            .clone()
            .or_else(|| config.github.token.clone())
            .map(Token::from);

        let provider = GitHubProvider::new(&config.github.base_url, &repo, token)?;
        Ok(Arc::new(provider))
    }

    fn options(
        config: &Config,
        poll_interval: Option<u64>,
        timeout: Option<u64>,
    ) -> DebugOptions {
        DebugOptions {
            poll_interval: Duration::from_secs(
                poll_interval.unwrap_or(config.debug.poll_interval_seconds),
            ),
            timeout: Duration::from_secs(timeout.unwrap_or(config.debug.timeout_seconds)),
        }
    }

    async fn execute_run(
        &self,
        config: &Config,
        workflow: &str,
        ref_: Option<&str>,
        inputs: &[(String, String)],
        poll_interval: Option<u64>,
        timeout: Option<u64>,
    ) -> Result<()> {
        let provider = self.provider(config)?;
        let branch = ref_.unwrap_or(&config.debug.branch);
        let inputs: HashMap<String, String> = inputs.iter().cloned().collect();

        info!("Debugging workflow {workflow} on {branch}");

        let progress = output::WatchProgress::start(&format!("workflow {workflow}"));
        let orchestrator = DebugOrchestrator::new(provider, Self::options(config, poll_interval, timeout))
            .with_observer(Box::new(progress.clone()));

        let report = orchestrator.debug(workflow, branch, &inputs).await?;
        progress.finish(report.success);

        self.emit_report(&report, config)?;

        if !report.success {
            std::process::exit(1);
        }
        Ok(())
    }

    async fn execute_watch(
        &self,
        config: &Config,
        run_id: u64,
        poll_interval: Option<u64>,
        timeout: Option<u64>,
    ) -> Result<()> {
        let provider = self.provider(config)?;

        let progress = output::WatchProgress::start(&format!("run {run_id}"));
        let orchestrator = DebugOrchestrator::new(provider, Self::options(config, poll_interval, timeout))
            .with_observer(Box::new(progress.clone()));

        let report = orchestrator.debug_run(run_id).await?;
        progress.finish(report.success);

        self.emit_report(&report, config)?;

        if !report.success {
            std::process::exit(1);
        }
        Ok(())
    }

    async fn execute_workflows(&self, config: &Config) -> Result<()> {
        let provider = self.provider(config)?;
        let workflows = provider.list_workflows().await?;

        if self.use_json(config) {
            println!("{}", self.to_json(&workflows, config)?);
        } else {
            output::print_workflows(&workflows);
        }
        Ok(())
    }

    fn execute_classify(
        &self,
        logfile: &PathBuf,
        job: &str,
        step_name: &str,
        all: bool,
    ) -> Result<()> {
        let contents = std::fs::read_to_string(logfile)
            .with_context(|| format!("Failed to read log file: {}", logfile.display()))?;

        let classifier = ErrorClassifier::new();

        if all {
            let matches = classifier.matching_patterns(&contents);
            if matches.is_empty() {
                println!("No taxonomy entries matched");
                return Ok(());
            }
            for pattern in matches {
                println!(
                    "{:<24} {:<16} {}",
                    pattern.error_type, pattern.category, pattern.description
                );
            }
            return Ok(());
        }

        let step = Step {
            name: step_name.to_string(),
            number: 1,
            status: RunStatus::Completed,
            conclusion: Some(Conclusion::Failure),
            started_at: None,
            completed_at: None,
            log: Some(contents),
        };
        let info = classifier.classify(job, &step);

        println!("{}", serde_json::to_string_pretty(&info)?);
        Ok(())
    }

    fn use_json(&self, config: &Config) -> bool {
        self.format.unwrap_or(config.output.format) == OutputFormat::Json
    }

    fn to_json<T: serde::Serialize>(&self, value: &T, config: &Config) -> Result<String> {
        if self.pretty || config.output.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }

    fn emit_report(&self, report: &DebugReport, config: &Config) -> Result<()> {
        let rendered = if self.use_json(config) {
            self.to_json(report, config)?
        } else {
            output::render_report(report)
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, rendered)?;
            info!("Report written to: {}", output_path.display());
        } else {
            println!("{rendered}");
        }
        Ok(())
    }
}
