use clap::Parser;
use geofix::adapters::{platform_provider, SystemNetworkProbe};
use geofix::utils::{logger, validation::Validate};
use geofix::{
    AddressResolver, CliConfig, FixAcquirer, GeoEngine, GeoError, NominatimClient, OutputFormat,
    PrerequisiteChecker, Reporter, RunOutcome,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    match config.format {
        OutputFormat::Json => logger::init_json_logger(),
        OutputFormat::Text => logger::init_cli_logger(config.verbose),
    }

    tracing::info!("Starting geofix");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    match run(&config).await {
        Ok(RunOutcome::Reported(_)) => {
            tracing::info!("✅ Location report complete");
        }
        Ok(RunOutcome::NoFix(failure)) => {
            tracing::warn!("No location fix: {}", failure.message());
        }
        Err(e) => {
            tracing::error!(
                "❌ geofix failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<RunOutcome, GeoError> {
    let checker = PrerequisiteChecker::new(config.policy_reader()?, SystemNetworkProbe::new());
    let acquirer = FixAcquirer::new(config.fix_timeout());
    let provider = platform_provider(config.position);
    let resolver = AddressResolver::new(NominatimClient::new(config.geocoder_url.clone())?);
    let reporter = Reporter::new(std::io::stdout(), config.format);

    let mut engine = GeoEngine::new(checker, acquirer, provider, resolver, reporter);
    engine.run().await
}
