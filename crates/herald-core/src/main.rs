use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use herald_core::render::render_lines;
use herald_core::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use herald_core::{CenterConfig, NotificationKind, Session};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Command::new("herald")
        .version(herald_core::VERSION)
        .about("Herald notification center")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a TOML center configuration"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the seeded workload simulator")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of operations to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output summary as JSON"),
                ),
        )
        .subcommand(
            Command::new("stress")
                .about("Run stress test")
                .arg(
                    Arg::new("entries")
                        .long("entries")
                        .default_value("1000")
                        .value_parser(value_parser!(usize))
                        .help("Notifications per burst"),
                )
                .arg(
                    Arg::new("rounds")
                        .long("rounds")
                        .default_value("20")
                        .value_parser(value_parser!(usize))
                        .help("Number of bursts"),
                ),
        )
        .subcommand(
            Command::new("demo")
                .about("Show one notification of each kind and watch them expire")
                .arg(
                    Arg::new("kind")
                        .long("persist-kind")
                        .default_value("warning")
                        .help("Kind of the notification that stays until dismissed"),
                ),
        );

    let matches = cli.get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("simulate", args)) => simulate(args, config),
        Some(("stress", args)) => stress(args),
        Some(("demo", args)) => demo(args, config),
        _ => Ok(()),
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<CenterConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => CenterConfig::load(path).with_context(|| format!("loading {path}")),
        None => Ok(CenterConfig::default()),
    }
}

fn simulate(args: &ArgMatches, center: CenterConfig) -> anyhow::Result<()> {
    let operations = args.get_one::<u64>("operations").copied().unwrap_or(10_000);
    let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);
    let stop_on_violation = args.get_flag("stop-on-violation");

    tracing::info!("Running Herald simulator: {} operations, seed {}", operations, seed);

    let config = SimulatorConfig {
        seed,
        total_operations: operations,
        center,
        stop_on_first_violation: stop_on_violation,
        ..Default::default()
    };

    let report = run_simulator(config)?;

    if args.get_flag("json") {
        let summary = serde_json::json!({
            "seed": report.config.seed,
            "operations": report.stats.total_operations,
            "shown": report.stats.shown,
            "dismissed": report.stats.dismissed,
            "expired": report.stats.expired,
            "evicted": report.stats.evicted,
            "simulated_ms": report.elapsed_ms,
            "violations": report.violations.len(),
            "passed": report.passed(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", report.generate_text());
    }

    std::process::exit(if report.passed() { 0 } else { 1 });
}

fn stress(args: &ArgMatches) -> anyhow::Result<()> {
    let entries = args.get_one::<usize>("entries").copied().unwrap_or(1000);
    let rounds = args.get_one::<usize>("rounds").copied().unwrap_or(20);

    let report = TestHarness::run_stress_test(entries, rounds)?;

    println!("Stress Test Report:");
    println!("  Entries per round: {}", report.entries);
    println!("  Rounds: {}", report.rounds);
    println!("  Violations: {}", report.violations);
    println!("  Success: {}", report.success);

    std::process::exit(if report.success { 0 } else { 1 });
}

fn demo(args: &ArgMatches, config: CenterConfig) -> anyhow::Result<()> {
    let persist_kind: NotificationKind = args
        .get_one::<String>("kind")
        .map_or("warning", String::as_str)
        .parse()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let session = Session::start(config);
        let center = session.center().clone();
        let mut subscription = center.subscribe();

        center.success("Event created");
        center.error_for("Could not send invitations", 1500);
        center.info_for("3 guests confirmed", 800);
        let pinned = center.show_for(persist_kind, "Venue not confirmed yet", 0);

        while let Some(snapshot) = subscription.changed().await {
            println!("--- v{} ---", snapshot.version);
            for line in render_lines(&snapshot.entries) {
                println!("{line}");
            }
            if snapshot.entries.iter().all(|n| n.is_persistent()) {
                break;
            }
        }

        center.dismiss(pinned);
        println!("--- dismissed {pinned}, {} left ---", center.len());
        session.end();
    });

    Ok(())
}
