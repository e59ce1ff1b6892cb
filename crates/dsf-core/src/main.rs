use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dsf_core::prelude::*;
use dsf_core::{resolve_dns_records_for, transfer::select_transfer_graph, DomainSetupInfo, RecordTarget};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let mode = || {
        Arg::new("mode")
            .long("mode")
            .required(true)
            .value_parser(value_parser!(Mode))
            .help("Connection mode: suggested, advanced, domain_connect or transfer")
    };
    let subdomain = || {
        Arg::new("subdomain")
            .long("subdomain")
            .action(ArgAction::SetTrue)
            .help("Use the subdomain connection graph")
    };

    Command::new("dsf")
        .version(dsf_core::VERSION)
        .about("Domain setup flow: step graphs, entry resolution and DNS verification")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("steps")
                .about("Validate and print a built-in step graph")
                .arg(subdomain())
                .arg(
                    Arg::new("transfer")
                        .long("transfer")
                        .value_parser(["locked", "unlocked", "unknown"])
                        .help("Print the transfer graph for this lock status instead"),
                ),
        )
        .subcommand(
            Command::new("progress")
                .about("Print the progress indicator for a mode")
                .arg(mode())
                .arg(subdomain()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Print the step a user enters the connection flow at")
                .arg(
                    Arg::new("current-mode")
                        .long("current-mode")
                        .value_parser(value_parser!(Mode))
                        .help("Mode recorded by a previous attempt"),
                )
                .arg(
                    Arg::new("domain-connect")
                        .long("domain-connect")
                        .action(ArgAction::SetTrue)
                        .help("The registrar supports Domain Connect"),
                )
                .arg(subdomain())
                .arg(Arg::new("forced").long("forced").help("Explicit resume step"))
                .arg(
                    Arg::new("setup-info")
                        .long("setup-info")
                        .value_parser(value_parser!(PathBuf))
                        .conflicts_with_all(["current-mode", "domain-connect"])
                        .help("JSON domain setup info to take the entry signals from"),
                ),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Evaluate a connection snapshot")
                .arg(mode())
                .arg(
                    Arg::new("snapshot")
                        .long("snapshot")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON connection snapshot"),
                ),
        )
        .subcommand(
            Command::new("records")
                .about("Print the DNS records a user must enter")
                .arg(mode())
                .arg(Arg::new("domain").long("domain").required(true).help("Domain being connected"))
                .arg(
                    Arg::new("host-label")
                        .long("host-label")
                        .help("Subdomain label relative to the zone apex"),
                )
                .arg(
                    Arg::new("setup-info")
                        .long("setup-info")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON domain setup info"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration")
                .arg(
                    Arg::new("poll-interval")
                        .long("poll-interval")
                        .value_parser(value_parser!(u64))
                        .help("Override the poll interval, in milliseconds"),
                )
                .arg(
                    Arg::new("max-poll-duration")
                        .long("max-poll-duration")
                        .value_parser(value_parser!(u64))
                        .help("Override the polling window, in seconds"),
                ),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => SetupConfig::load(path)?,
        None => SetupConfig::default(),
    };

    match matches.subcommand() {
        Some(("steps", args)) => {
            let graph = match args.get_one::<String>("transfer").map(String::as_str) {
                Some("unlocked") => select_transfer_graph(LockStatus::Unlocked),
                Some("locked") => select_transfer_graph(LockStatus::Locked),
                Some(_) => select_transfer_graph(LockStatus::Unknown),
                None => step_maps::connection_graph(args.get_flag("subdomain")),
            };
            print_graph(graph);
        }
        Some(("progress", args)) => {
            let mode = *required::<Mode>(args, "mode")?;
            let graph = step_maps::connection_graph(args.get_flag("subdomain"));
            let graph = if mode == Mode::Transfer { step_maps::transfer_locked() } else { graph };
            for (position, entry) in build_progress_list(mode, graph).visible().enumerate() {
                println!("{}. {}", position + 1, entry.display_name.as_deref().unwrap_or_default());
            }
        }
        Some(("resolve", args)) => {
            let subdomain = args.get_flag("subdomain");
            let info = args
                .get_one::<PathBuf>("setup-info")
                .map(|path| read_json::<DomainSetupInfo>(path))
                .transpose()?;
            let mut signals = match &info {
                Some(info) => info.entry_signals(subdomain),
                None => EntrySignals::new()
                    .with_domain_connect(args.get_flag("domain-connect"))
                    .subdomain(subdomain),
            };
            if let Some(mode) = args.get_one::<Mode>("current-mode") {
                signals = signals.with_current_mode(*mode);
            }
            if let Some(step) = args.get_one::<String>("forced") {
                signals = signals.with_forced_step(step.as_str());
            }
            let entry = signals.resolve();
            println!("{entry}");
            if entry == step_maps::slugs::DC_START {
                if let Some(url) = info.as_ref().and_then(DomainSetupInfo::domain_connect_url) {
                    println!("{url}");
                }
            }
        }
        Some(("evaluate", args)) => {
            let mode = *required::<Mode>(args, "mode")?;
            let snapshot: ConnectionSnapshot = read_json(required::<PathBuf>(args, "snapshot")?)?;
            let outcome = evaluate(mode, &snapshot);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let Some(reason) = outcome.failure() {
                println!("{}", reason.message());
            }
        }
        Some(("records", args)) => {
            let mode = *required::<Mode>(args, "mode")?;
            let domain = required::<String>(args, "domain")?;
            let info: DomainSetupInfo = read_json(required::<PathBuf>(args, "setup-info")?)?;
            let target = match args.get_one::<String>("host-label") {
                Some(label) => RecordTarget::subdomain(domain.as_str(), label.as_str()),
                None => RecordTarget::root(domain.as_str()),
            };
            for record in resolve_dns_records_for(mode, &target, &info) {
                println!("{record}");
            }
        }
        Some(("config", args)) => {
            let mut config = config;
            if let Some(ms) = args.get_one::<u64>("poll-interval") {
                config = config.with_poll_interval(Duration::from_millis(*ms));
            }
            if let Some(secs) = args.get_one::<u64>("max-poll-duration") {
                config = config.with_max_poll_duration(Duration::from_secs(*secs));
            }
            config.validate()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        _ => {}
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, id: &str) -> Result<&'a T> {
    args.get_one::<T>(id)
        .with_context(|| format!("missing --{id}"))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_graph(graph: &StepGraph) {
    for mode in graph.modes() {
        println!("[{mode}]");
        let Some(start) = graph.start_of(mode) else {
            continue;
        };
        for (_, step) in graph.walk_from(start).take_while(|(_, step)| step.mode() == mode) {
            println!(
                "  {:<32}{:<22}{}",
                step.name().as_str(),
                format!("{:?}", step.step_type()),
                step.display_name().unwrap_or("-")
            );
        }
    }
}
