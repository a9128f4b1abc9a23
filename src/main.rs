//! Resource Downloader - CLI entry point.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use resource_downloader::{
    api::LibraryApi,
    cli::Args,
    config::{validate_config, Config},
    download::{
        DirectFetch, DownloadRegistry, DownloadStrategy, ExternalHandler, StreamedDownload,
    },
    error::{exit_codes, Error, Result},
    fs::app_cache_dir,
    output::{
        print_banner, print_error, print_info, print_resource_list, print_success, print_warning,
        ConsoleReporter,
    },
    platform::{SaveToFolder, StoragePermissions, SystemOpener},
};

/// One download requested on the command line.
struct DownloadTarget {
    id: String,
    url: String,
    name: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Api(_) | Error::ResourceNotFound(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_)
                | Error::AlreadyDownloading(_)
                | Error::PermissionDenied(_)
                | Error::PermissionBlocked(_)
                | Error::Delivery(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if !args.quiet {
        print_banner();
    }

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    // Shared HTTP client; its timeout bounds every strategy attempt
    let client = reqwest::Client::builder()
        .user_agent(&config.api.user_agent)
        .timeout(Duration::from_secs(config.options.request_timeout_seconds))
        .build()?;

    // Library listing mode
    if args.list {
        let api = library_api(&config, &client)?;
        let resources = api.list_resources().await?;
        print_resource_list(&resources);
        return Ok(exit_codes::SUCCESS);
    }

    // Collect download targets
    let mut targets: Vec<DownloadTarget> = Vec::new();

    if let Some(urls) = &args.url {
        for url in urls {
            targets.push(DownloadTarget {
                // The URL doubles as the registry key for ad hoc downloads
                id: url.clone(),
                url: url.clone(),
                name: None,
            });
        }
    }

    if let Some(ids) = &args.resource {
        let api = library_api(&config, &client)?;
        for id in ids {
            let resource = api.get_resource(*id).await?;
            let url = resource.download_url().ok_or_else(|| {
                Error::Api(format!(
                    "resource {} ('{}') has no downloadable file",
                    resource.id, resource.title
                ))
            })?;
            targets.push(DownloadTarget {
                id: resource.id.to_string(),
                url: url.to_string(),
                name: None,
            });
        }
    }

    if targets.is_empty() {
        return Err(Error::Config(
            "nothing to download; pass --url, --resource, or --list".to_string(),
        ));
    }

    // A custom name only makes sense for a single download
    if let Some(name) = &args.name {
        if targets.len() > 1 {
            return Err(Error::Config(
                "--name can only be used with a single download".to_string(),
            ));
        }
        targets[0].name = Some(name.clone());
    }

    let save_dir = config.save_directory()?;

    // Confirm before starting
    if config.options.confirm_downloads
        && !confirm(&format!(
            "Download {} file(s) to {}?",
            targets.len(),
            save_dir.display()
        ))?
    {
        print_info("Download cancelled");
        return Ok(exit_codes::ABORT);
    }

    // Assemble the orchestrator: strategies in preference order
    let strategies: Vec<Arc<dyn DownloadStrategy>> = vec![
        Arc::new(DirectFetch::new(client.clone(), app_cache_dir()?)),
        Arc::new(StreamedDownload::new(client.clone(), save_dir.clone())),
        Arc::new(ExternalHandler::new(Arc::new(SystemOpener))),
    ];

    let reporter = Arc::new(ConsoleReporter::new(config.options.show_downloads));
    let registry = Arc::new(DownloadRegistry::new(
        strategies,
        Arc::new(StoragePermissions::new(save_dir.clone())),
        Arc::new(SaveToFolder::new(save_dir)),
        reporter.clone(),
    ));

    // One worker per target; unrelated resources download concurrently
    let mut handles = Vec::new();
    for target in targets {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let started = registry
                .start(&target.id, &target.url, target.name.as_deref())
                .await;
            (target.id, started)
        }));
    }

    for handle in handles {
        let (id, started) = handle
            .await
            .map_err(|e| Error::Download(format!("download worker panicked: {}", e)))?;
        if !started {
            print_warning(&format!("{}: download already in progress, skipped", id));
        }
    }

    let completed = reporter.completed();
    let failed = reporter.failed();

    if failed > 0 {
        print_error(&format!(
            "{} download(s) failed, {} completed",
            failed, completed
        ));
        return Ok(exit_codes::DOWNLOAD_ERROR);
    }

    print_success(&format!("{} download(s) completed", completed));
    Ok(exit_codes::SUCCESS)
}

fn library_api(config: &Config, client: &reqwest::Client) -> Result<LibraryApi> {
    if config.api.base_url.is_empty() {
        return Err(Error::MissingConfig(
            "api.base_url (set it in config.toml or pass --api-url)".to_string(),
        ));
    }

    Ok(LibraryApi::new(
        client.clone(),
        config.api.base_url.clone(),
        config.api.authorization_token.clone(),
    ))
}

/// Ask a yes/no question on the terminal. Defaults to no.
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
