//! `meetbook` CLI — propose and book meeting slots, search events, list colours.
//!
//! ## Usage
//!
//! ```sh
//! # Propose 5 slots free for everyone and book the one you pick
//! meetbook book --emails alice@acme.io bob@acme.io --title "ABC-42 kickoff"
//!
//! # Start 15 minutes into the chosen slot, pick the first one without prompting
//! meetbook book --emails alice@acme.io --title "Sync" --offset 15 --choice 1
//!
//! # Upcoming events whose title contains a term
//! meetbook search retro
//!
//! # Event colour palette
//! meetbook colors
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use meetbook::config::{Config, DEFAULT_CONFIG_PATH};
use meetbook::console::{
    render_colors, render_events, render_shortfall, LineSelector, PresetSelector,
};
use meetbook::google::{GoogleCalendar, GoogleSession};
use meetbook::jira::{JiraClient, NoTracker};
use slot_engine::{
    negotiate, Collaborators, MeetingRequest, Outcome, SchedulingError, SlotSelector,
    TicketLookup,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "meetbook",
    version,
    about = "Book meetings in Google Calendar with Jira integration"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Find free slots for all attendees and book one
    Book {
        /// Email addresses to invite; the first one's load decides which days qualify
        #[arg(long, num_args = 1.., required = true)]
        emails: Vec<String>,
        /// Meeting title. A leading Jira key (ABC-123) is replaced by the ticket title
        #[arg(long)]
        title: String,
        /// Offset in minutes applied to the chosen slot
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
        /// Pick this slot (1-based) instead of prompting
        #[arg(long)]
        choice: Option<usize>,
        /// Number of slots to propose (overrides the config)
        #[arg(long)]
        quota: Option<usize>,
    },
    /// Search upcoming meetings by partial title
    Search {
        /// Text to look for in event titles
        term: String,
    },
    /// List the calendar's event colours
    Colors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    init_tracing();

    ctrlc::set_handler(|| {
        println!("\nProcess interrupted by user. Exiting...");
        std::process::exit(130);
    })
    .context("Failed to install Ctrl+C handler")?;

    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Book {
            emails,
            title,
            offset,
            choice,
            quota,
        } => book(&config, emails, title, offset, choice, quota),
        Commands::Search { term } => {
            let session = GoogleSession::acquire(&config.google.credentials, &config.google.api_base)?;
            let events = GoogleCalendar::new(&session)
                .search_events(&term, Utc::now())
                .context("Failed to search events")?;
            print!("{}", render_events(&term, &events));
            Ok(())
        }
        Commands::Colors => {
            let session = GoogleSession::acquire(&config.google.credentials, &config.google.api_base)?;
            let palette = GoogleCalendar::new(&session)
                .event_colors()
                .context("Failed to fetch colours")?;
            print!("{}", render_colors(&palette));
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meetbook=info,slot_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn book(
    config: &Config,
    emails: Vec<String>,
    title: String,
    offset: i64,
    choice: Option<usize>,
    quota: Option<usize>,
) -> Result<()> {
    let mut policy = config.policy.to_policy()?;
    if let Some(quota) = quota {
        policy.quota = quota;
        policy.validate().context("Invalid --quota")?;
    }

    let session = GoogleSession::acquire(&config.google.credentials, &config.google.api_base)?;
    let calendar = GoogleCalendar::new(&session);

    let tz_name = match &config.google.timezone {
        Some(tz) => tz.clone(),
        None => calendar
            .timezone()
            .context("Failed to read the calendar's timezone")?,
    };
    println!("Calendar time zone: {}", tz_name);
    let tz: Tz = tz_name
        .parse()
        .map_err(|_| anyhow!("Unknown timezone: '{}'", tz_name))?;

    let jira = config.jira.as_ref().map(JiraClient::new);
    let tickets: &dyn TicketLookup = match &jira {
        Some(client) => client,
        None => &NoTracker,
    };

    let collaborators = Collaborators {
        reader: &calendar,
        writer: &calendar,
        tickets,
    };
    let meeting = MeetingRequest {
        attendees: emails,
        title,
        offset_minutes: offset,
    };

    let mut selector: Box<dyn SlotSelector> = match choice {
        Some(n) => Box::new(PresetSelector::new(n, io::stdout())),
        None => Box::new(LineSelector::new(io::stdin().lock(), io::stdout())),
    };

    let now = Utc::now().with_timezone(&tz);
    let outcome = match negotiate(&collaborators, selector.as_mut(), &meeting, &policy, now) {
        Ok(outcome) => outcome,
        Err(
            e @ SchedulingError::SearchExhausted {
                found,
                quota,
                lookahead_days,
            },
        ) => {
            print!("{}", render_shortfall(found, quota, lookahead_days));
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Booking failed"),
    };

    match outcome {
        Outcome::Booked { request, event } => {
            println!();
            println!("{} ({})", request.title, request.slot);
            println!("Meeting booked: {}", event.link);
        }
        Outcome::Cancelled => println!("\nNo slot selected."),
        Outcome::InvalidSelection(reason) => println!("\n{}", reason),
    }
    Ok(())
}
