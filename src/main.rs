//! Resume analyzer: resume and job description match analysis client

mod cli;
mod client;
mod config;
mod error;
mod input;
mod output;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, ConfigAction};
use client::{AnalysisClient, HttpTransport};
use config::Config;
use error::{Result, ResumeAnalyzerError};
use indicatif::{ProgressBar, ProgressStyle};
use input::InputManager;
use log::{error, info, warn};
use output::formatter::save_report_to_file;
use output::{NarrativeFormatter, ReportGenerator, ReportRenderer, EMPTY_PANEL_MESSAGE, REPORT_REGION_ID};
use std::path::Path;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        if e.is_user_input() {
            println!("⚠️  {}", e);
        } else {
            error!("Command failed: {}", e);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze(args) => run_analyze(args, &config).await,

        Commands::Narrative { file } => {
            let text = std::fs::read_to_string(&file)?;
            let formatter = NarrativeFormatter::new(config.output.color_output);
            println!("{}", formatter.render(&text));
            Ok(())
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    println!("Config File: {}", config_path.display());
                    println!("API Base URL: {}", config.api.base_url);
                    if let Some(url) = &config.api.url_override {
                        println!("API Base URL override ({}): {}", config::API_URL_ENV, url);
                    }
                    match config.api.timeout_secs {
                        Some(secs) => println!("API Timeout: {}s", secs),
                        None => println!("API Timeout: none"),
                    }
                    println!("Output Format: {:?}", config.output.format);
                    println!("Color Output: {}", config.output.color_output);
                    println!("Export Directory: {}", config.output.export_dir.display());
                }
                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(config_path)?;
                    println!("✅ Configuration reset successfully!");
                }
                Some(ConfigAction::Set { key, value }) => {
                    config.set_value(&key, &value)?;
                    config.save_to(config_path)?;
                    println!("✅ Set {} = {}", key, value);
                }
            }
            Ok(())
        }
    }
}

async fn run_analyze(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let output_format = match &args.output {
        Some(format) => cli::parse_output_format(format).map_err(ResumeAnalyzerError::InvalidInput)?,
        None => config.output.format,
    };
    let base_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| config.effective_base_url().to_string());

    let transport = HttpTransport::new(base_url, config.timeout())?;
    info!("Using analysis endpoint {}", transport.endpoint());
    let client = AnalysisClient::new(transport);
    let input_manager = InputManager::new();

    if let Some(resume) = &args.resume {
        if let Err(e) = cli::validate_file_extension(resume, &["pdf", "docx"]) {
            warn!("Resume file: {}", e);
        }
        client.select_file(input_manager.load_resume(resume).await?);
    }

    let job_description = match (&args.job, &args.job_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => input_manager.extract_text(path).await?,
        (None, None) => String::new(),
    };
    client.set_job_description(job_description);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analyzing...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = client.analyze().await;
    spinner.finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.is_user_input() => return Err(e),
        Err(e) => {
            println!("❌ Error: {}", e);
            println!("{}", EMPTY_PANEL_MESSAGE);
            return Err(e);
        }
    };

    let mut renderer = ReportRenderer::new();
    let generator = ReportGenerator::with_options(config.output.color_output, true, true, true);
    let content = {
        let report = renderer.render(&result);
        generator.generate_report(report, output_format)?
    };
    println!("{}", content);

    if let Some(save_path) = &args.save {
        save_report_to_file(&content, save_path)?;
        println!("💾 Report saved to {}", save_path.display());
    }

    if args.export {
        let export_dir = args.export_dir.clone().unwrap_or_else(|| config.output.export_dir.clone());
        match renderer.export_to_pdf(client.result().as_ref(), REPORT_REGION_ID, &export_dir)? {
            Some(export) => println!("📄 PDF exported to {} ({} page(s))", export.path.display(), export.page_count),
            None => println!("⚠️  Nothing to export"),
        }
    }

    Ok(())
}
