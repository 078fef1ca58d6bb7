use clap::Parser;
use taplist::config::{CheckArgs, Command, LogFormat, ValidateArgs};
use taplist::domain::ports::{PageInspector, ToolProbe};
use taplist::utils::{logger, validation::Validate};
use taplist::{
    BrowserProbe, CheckCommand, CliConfig, HeadlessBrowserInspector, HealthCheck, InventorySource,
    RendererKind, SmokeOutcome, SmokeRunner, StaticInspector, TaplistError,
};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    let result = match &cli.command {
        Command::Validate(args) => validate(args).await,
        Command::Check(args) => check(args, cli.log_format).await,
        Command::Smoke(args) => smoke(args, &cli).await,
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }
}

async fn validate(args: &ValidateArgs) -> taplist::Result<i32> {
    let source = InventorySource::parse(&args.source)?;
    let taps = source.load(Duration::from_secs(args.timeout_secs)).await?;

    let violations = taps.audit();
    if !violations.is_empty() {
        for violation in &violations {
            tracing::error!("{}", violation);
            eprintln!("❌ {}", violation);
        }
        eprintln!(
            "{} contract violation(s) in {} tap(s) from {}",
            violations.len(),
            taps.len(),
            source
        );
        return Ok(1);
    }

    let summary = taps.summary();
    let statuses: Vec<String> = summary
        .by_status
        .iter()
        .map(|(status, count)| format!("{}: {}", status, count))
        .collect();
    println!(
        "✅ {} tap(s) valid ({}); {} empty, {} without prices",
        summary.total,
        statuses.join(", "),
        summary.empty,
        summary.unpriced
    );
    Ok(0)
}

async fn check(args: &CheckArgs, log_format: LogFormat) -> taplist::Result<i32> {
    let config = args.resolve()?;
    config.validate()?;

    let inspector: Box<dyn PageInspector> = match config.renderer {
        RendererKind::Static => Box::new(StaticInspector::new(config.timeout())?),
        RendererKind::Browser => {
            let probe = BrowserProbe::from_env(config.browser.clone());
            let binary = probe.locate().ok_or_else(|| TaplistError::ConfigError {
                message: format!(
                    "no {} found; install one, pass --browser, or use --renderer static",
                    probe.describe()
                ),
            })?;
            Box::new(HeadlessBrowserInspector::new(binary, config.timeout()))
        }
    };

    let report = HealthCheck::new(config, inspector)?.run().await?;
    match log_format {
        LogFormat::Json => println!("{}", serde_json::to_string(&report)?),
        LogFormat::Compact => {
            for page in &report.pages {
                println!("✅ {} (body class '{}')", page.url, page.theme_class);
            }
            println!("✅ Health check passed in {}ms", report.elapsed_ms);
        }
    }
    Ok(0)
}

async fn smoke(args: &CheckArgs, cli: &CliConfig) -> taplist::Result<i32> {
    let config = args.resolve()?;
    config.validate()?;

    let mut command = CheckCommand::current_exe(&config)?;
    if cli.verbose {
        command = command.arg("--verbose");
    }
    if cli.log_format == LogFormat::Json {
        command = command.arg("--log-format=json");
    }

    let mut runner = SmokeRunner::new(command);
    if config.renderer == RendererKind::Browser {
        runner = runner.with_probe(Box::new(BrowserProbe::from_env(config.browser.clone())));
    }

    let outcome = runner.run().await?;
    match &outcome {
        SmokeOutcome::Skipped { reason } => {
            eprintln!("⚠️ Health check skipped: {}", reason);
        }
        SmokeOutcome::Completed { exit_code } if *exit_code != 0 => {
            eprintln!("❌ Health check failed (exit code {})", exit_code);
        }
        SmokeOutcome::Completed { .. } => {}
    }
    Ok(outcome.exit_code())
}
