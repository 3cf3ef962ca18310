use std::{error::Error, process::ExitCode};

use tracing::info;
use tracing_subscriber::EnvFilter;

use debsvc::{
    classify::UnitSourceClassifier,
    cli::{Cli, Commands, parse_args},
    config::load_config,
    enablement::EnablementResolver,
    host::Host,
    inventory::ServiceInventory,
    lifecycle::{LifecycleController, RestartOutcome, StatusOutcome},
    service::Service,
};

/// LSB exit status of `status` for a stopped service.
const EXIT_STOPPED: u8 = 3;

/// LSB exit status of `status` when the state cannot be determined.
const EXIT_UNKNOWN: u8 = 4;

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(&args);

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("debsvc: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Cli) {
    let filter = if let Some(level) = args.log_level {
        EnvFilter::new(level.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let host = Host::local(&config)?;

    match args.command {
        Commands::Backend => println!("{}", host.backend().as_ref()),
        Commands::List { json } => {
            let inventory = ServiceInventory::collect(&host);
            let services = inventory.sorted();
            if json {
                println!("{}", serde_json::to_string_pretty(&services)?);
            } else {
                for service in services {
                    println!("{}", service.name());
                }
            }
        }
        Commands::Classify { name } => {
            let service = Service::new(name)?;
            if !host.supports_unit_manager() {
                eprintln!("debsvc: no unit manager on this host; nothing to classify");
                return Ok(ExitCode::from(2));
            }
            let kind = UnitSourceClassifier::new(&host).source_kind(service.name())?;
            println!("{}", kind.as_ref());
        }
        Commands::IsEnabled { name, explain } => {
            let service = Service::new(name)?;
            let verdict = EnablementResolver::new(&host).resolve(&service)?;
            println!("{}", verdict.status.as_ref());
            if explain {
                println!("{}", verdict.basis);
            }
            if !verdict.status.is_enabled() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Enable { name } => {
            LifecycleController::new(&host).enable(&Service::new(name)?)?;
        }
        Commands::Disable { name } => {
            LifecycleController::new(&host).disable(&Service::new(name)?)?;
        }
        Commands::Start { name } => {
            LifecycleController::new(&host).start(&Service::new(name)?)?;
        }
        Commands::Stop { name } => {
            LifecycleController::new(&host).stop(&Service::new(name)?)?;
        }
        Commands::Restart { name, has_restart } => {
            let service = Service::new(name)?;
            let controller = LifecycleController::new(&host);
            if controller.restart(&service, has_restart)? == RestartOutcome::NoNativeRestart {
                info!(
                    "No native restart for '{}'; stopping then starting",
                    service.name()
                );
                controller.stop(&service)?;
                controller.start(&service)?;
            }
        }
        Commands::Status { name, no_status } => {
            let service = Service::new(name)?;
            let outcome = LifecycleController::new(&host).status(&service, !no_status)?;
            println!("{outcome}");
            match outcome {
                StatusOutcome::Running => {}
                StatusOutcome::Stopped => return Ok(ExitCode::from(EXIT_STOPPED)),
                StatusOutcome::NoNativeStatus => return Ok(ExitCode::from(EXIT_UNKNOWN)),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
