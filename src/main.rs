use clap::Parser;
use playground_locator::config::cli::{Command, SearchArgs};
use playground_locator::core::csv_source::DEFAULT_CSV_LOCATION;
use playground_locator::core::export;
use playground_locator::core::router;
use playground_locator::utils::error::ErrorSeverity;
use playground_locator::utils::{logger, validation::Validate};
use playground_locator::{
    CliConfig, CsvSource, LocalStorage, LocatedPlaygrounds, LocatorError, PlaygroundLocator,
    Settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.json_logs);
    tracing::debug!("CLI config: {:?}", cli);

    let command = match &cli.command {
        Command::Search(args) => DataCommand::Search(args),
        Command::Fetch(args) => DataCommand::Fetch(args),
        Command::Csv { limit } => DataCommand::Csv(*limit),
        Command::Route { path } => return print_route(path),
    };

    let result = match cli.settings() {
        Ok(settings) => run(command, settings).await,
        Err(e) => Err(e),
    };

    match result {
        Ok((located, output_path)) => {
            let source = if located.used_fallback {
                format!("{} (fallback)", located.source)
            } else {
                located.source.clone()
            };
            tracing::info!("Output saved to: {}", output_path);
            println!(
                "{} playgrounds from {} ({} mappable, {} total in source) -> {}",
                located.playgrounds.len(),
                source,
                located.mappable().count(),
                located.total,
                output_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

/// Subcommands that load playgrounds and export them.
enum DataCommand<'a> {
    Search(&'a SearchArgs),
    Fetch(&'a SearchArgs),
    Csv(Option<usize>),
}

async fn run(
    command: DataCommand<'_>,
    settings: Settings,
) -> Result<(LocatedPlaygrounds, String), LocatorError> {
    settings.validate()?;

    let located = match command {
        DataCommand::Search(args) => {
            let query = args.to_query(&settings)?;
            let locator = PlaygroundLocator::new(Box::new(playground_locator::CkanClient::new(
                settings.ckan_endpoint.clone(),
            )));
            locator.fetch(&query).await?
        }
        DataCommand::Fetch(args) => {
            let query = args.to_query(&settings)?;
            let locator = PlaygroundLocator::from_config(&settings);
            if !locator.has_fallback() {
                tracing::info!("No CSV fallback configured; CKAN errors will be final");
            }
            locator.fetch(&query).await?
        }
        DataCommand::Csv(limit) => {
            let location = settings
                .csv_location
                .clone()
                .unwrap_or_else(|| DEFAULT_CSV_LOCATION.to_string());
            let source = CsvSource::new(location, limit.unwrap_or(settings.csv_limit));
            LocatedPlaygrounds::from_result("csv", false, source.load().await?)
        }
    };

    let storage = LocalStorage::new(settings.output_path.clone());
    let output_path = export::export(
        &storage,
        &settings.output_path,
        &located.playgrounds,
        settings.output_format,
    )
    .await?;

    Ok((located, output_path))
}

fn print_route(path: &str) -> anyhow::Result<()> {
    let Some(resolved) = router::resolve(path) else {
        eprintln!("No route matches {}", path);
        std::process::exit(4);
    };

    if let Some(from) = &resolved.redirected_from {
        println!("{} -> {}", from, resolved.path);
    }
    let pages: Vec<&str> = resolved.pages.iter().map(|p| p.as_str()).collect();
    println!(
        "{} [{}] {}",
        resolved.path,
        resolved.name.unwrap_or("-"),
        pages.join(" > ")
    );
    Ok(())
}
