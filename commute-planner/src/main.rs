use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commute_planner::config::{self, ConfigError, ProviderChoice};
use commute_planner::report::{render_recommendation, render_table};
use commute_planner::scanner::{next_weekday, ScanConfig, ScanRequest, Scanner};

const DEFAULT_HOME: &str = "1 Rocket Road, Hawthorne, CA";
const DEFAULT_WORK: &str = "2600 Alton Pkwy, Irvine, CA";
const DEFAULT_LUNCH_MINS: u32 = 30;

/// Find the departure time that minimizes your daily commute.
#[derive(Debug, Parser)]
#[command(name = "commute-planner", version)]
struct Cli {
    /// Trace every outbound API request URL.
    #[arg(short, long)]
    verbose: bool,

    /// Mapping backend: 1 = Google Maps, 2 = TomTom, 3 = LocationIQ + Google.
    #[arg(long)]
    provider: Option<String>,

    /// Home address (prompted interactively when omitted).
    #[arg(long)]
    home: Option<String>,

    /// Work address (prompted interactively when omitted).
    #[arg(long)]
    work: Option<String>,

    /// Lunch break in minutes (prompted interactively when omitted).
    #[arg(long)]
    lunch_minutes: Option<u32>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A .env file is optional; real environment variables win.
    let _ = dotenvy::dotenv();

    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("fatal: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    // --verbose surfaces the fully-assembled request URLs the adapters
    // trace at debug level before each call.
    let default_directive = if verbose {
        "commute_planner=debug"
    } else {
        "commute_planner=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<(), ConfigError> {
    println!("Daily Commute Planner");
    println!("Tests multiple departure times to find the one that minimizes");
    println!("your total daily commute (morning + evening).");
    println!();

    let choice = provider_choice(cli.provider.as_deref());
    println!("Using {}.", choice.label());

    let timezone = config::commute_timezone()?;
    println!("Using timezone: {timezone}");

    let provider = config::build_provider(choice)?;

    let home_address = cli
        .home
        .unwrap_or_else(|| prompt_or_default("Home address", DEFAULT_HOME));
    let work_address = cli
        .work
        .unwrap_or_else(|| prompt_or_default("Work address", DEFAULT_WORK));
    let lunch_mins = cli.lunch_minutes.unwrap_or_else(prompt_lunch);

    let today = chrono::Utc::now().with_timezone(&timezone).date_naive();
    let date = next_weekday(today);

    println!();
    println!("Analyzing departures for {}", date.format("%A, %B %d, %Y"));
    println!("This will take a few moments: the API calls are made in sequence.");

    let request = ScanRequest {
        home_address,
        work_address,
        date,
        timezone,
        lunch_mins,
    };
    let scan_config = ScanConfig::default();
    let scanner = Scanner::new(provider.as_ref(), &scan_config);

    match scanner.scan(&request).await {
        Ok(scenarios) if scenarios.is_empty() => {
            println!();
            println!("Analysis could not be completed: no candidate departure could be priced.");
        }
        Ok(scenarios) => {
            println!();
            print!("{}", render_table(&scenarios));
            if let Some(recommendation) = render_recommendation(&scenarios) {
                println!();
                println!("{recommendation}");
            }
        }
        Err(e) => {
            println!();
            println!("Could not proceed: {e}");
        }
    }

    Ok(())
}

fn provider_choice(arg: Option<&str>) -> ProviderChoice {
    let input = match arg {
        Some(value) => value.to_string(),
        None => {
            println!("Select the mapping backend:");
            println!("1. Google Maps (default)");
            println!("2. TomTom");
            println!("3. LocationIQ geocoding + Google Maps routing");
            prompt("Enter your choice [1]: ")
        }
    };

    if input.trim().is_empty() {
        return ProviderChoice::Google;
    }

    ProviderChoice::from_menu(&input).unwrap_or_else(|| {
        println!("Unrecognized choice {input:?}; using Google Maps.");
        ProviderChoice::Google
    })
}

fn prompt(label: &str) -> String {
    print!("{label}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

fn prompt_or_default(label: &str, default: &str) -> String {
    let input = prompt(&format!("{label} [default: {default}]: "));
    if input.is_empty() {
        default.to_string()
    } else {
        input
    }
}

fn prompt_lunch() -> u32 {
    loop {
        let input = prompt(&format!(
            "Lunch break in minutes [default: {DEFAULT_LUNCH_MINS}]: "
        ));
        if input.is_empty() {
            return DEFAULT_LUNCH_MINS;
        }
        match input.parse::<u32>() {
            Ok(mins) => return mins,
            Err(_) => println!("Invalid input, enter a whole number of minutes."),
        }
    }
}
