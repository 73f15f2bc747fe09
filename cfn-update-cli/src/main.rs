use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use cfn_update_core::{parse_parameters, AwsOptions, StackUpdateService, WaitOptions};
use clap::Parser;
use tokio_util::sync::CancellationToken;

mod output;

use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "cfn-update", version)]
#[command(
    about = "Update CloudFormation stack parameters and wait for the stack to stabilize",
    long_about = "Update the parameters of an existing CloudFormation stack, reusing its \
                  current template, then poll the stack until it reaches a stable state.\n\n\
                  Parameters not given with --parameter keep their previous values."
)]
struct Cli {
    /// Name or ID of the stack to update
    #[arg(short, long, env = "CFN_UPDATE_STACK")]
    stack: String,

    /// Parameter override as KEY=VALUE (repeatable)
    #[arg(short = 'p', long = "parameter", value_name = "KEY=VALUE")]
    parameters: Vec<String>,

    /// Seconds to wait between stack status checks
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_interval: u64,

    /// Seconds to wait for the stack to stabilize before giving up, covering both
    /// the wait before the update and the wait after it
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// AWS region (defaults to the SDK's region resolution)
    #[arg(long)]
    region: Option<String>,

    /// AWS shared config profile
    #[arg(long)]
    profile: Option<String>,

    /// Show the planned parameter changes without updating the stack
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            poll_interval: Duration::from_secs(self.poll_interval),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    fn aws_options(&self) -> AwsOptions {
        AwsOptions {
            region: self.region.clone(),
            profile: self.profile.clone(),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Cancel `token` on Ctrl-C so an in-progress wait returns promptly.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted; any submitted stack operation keeps running in CloudFormation");
            token.cancel();
        }
    });
}

async fn run(cli: Cli) -> Result<()> {
    // Validate input before touching AWS.
    let overrides = parse_parameters(&cli.parameters).context("Invalid --parameter value")?;

    let service = StackUpdateService::new(&cli.aws_options())
        .await
        .context("Failed to initialize AWS clients")?;

    let plan = service
        .plan(&cli.stack, &overrides)
        .await
        .with_context(|| format!("Failed to plan update for stack '{}'", cli.stack))?;

    if cli.dry_run {
        output::write_plan(&mut std::io::stdout().lock(), &plan, cli.output)?;
        return Ok(());
    }
    if cli.output == OutputFormat::Text {
        output::write_plan(&mut std::io::stderr().lock(), &plan, cli.output)?;
    }

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    let outcome = service
        .apply(&plan, &cli.wait_options(), &cancel)
        .await
        .with_context(|| format!("Failed to update stack '{}'", cli.stack))?;

    output::write_outcome(&mut std::io::stdout().lock(), &outcome, cli.output)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cfn-update", "--stack", "web"]).expect("should parse");
        assert_eq!(cli.wait_options(), WaitOptions::default());
        assert!(cli.parameters.is_empty());
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_repeated_parameters_keep_order() {
        let cli = Cli::try_parse_from([
            "cfn-update",
            "-s",
            "web",
            "-p",
            "A=1",
            "--parameter",
            "B=2",
            "--poll-interval",
            "1",
            "--timeout",
            "30",
        ])
        .expect("should parse");
        assert_eq!(cli.parameters, vec!["A=1", "B=2"]);
        assert_eq!(cli.wait_options().poll_interval, Duration::from_secs(1));
        assert_eq!(cli.wait_options().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        assert!(
            Cli::try_parse_from(["cfn-update", "-s", "web", "--poll-interval", "0"]).is_err()
        );
    }
}
