//! Venue command-line client
//!
//! Signs in against the venue backend and drives the booking rules from a
//! terminal: calendar view, stock checks, reservations, event confirmation.
//!
//! # Usage
//!
//! ```bash
//! export VENUE_API_URL=http://localhost:8080/api
//! venue login --email owner@venue.com --password secret
//! venue calendar --month 2026-03
//! venue check-item --item 4 --date 2026-03-20 --quantity 16
//! venue reserve --item 4 --event 1 --quantity 15
//! ```

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use venue_booking::aggregates::{ClientAction, EventAction, NotificationAction, ReservationAction};
use venue_booking::availability::{self, DayStatus};
use venue_booking::billing;
use venue_booking::types::{ClientId, EventId, EventStatus, ItemId};
use venue_booking::{BookingError, Config, VenueApp};

/// How long a command waits for the backend round trips it started.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(name = "venue")]
#[command(about = "Venue booking client")]
#[command(version)]
struct Cli {
    /// Override the backend base URL (default: VENUE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session
    Login {
        /// Login e-mail
        #[arg(long)]
        email: String,
        /// Password (default: VENUE_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show a month with booked, own, past and free days
    Calendar {
        /// Month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Check whether an item has enough free units on a date
    CheckItem {
        /// Item id
        #[arg(long)]
        item: u64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Units wanted
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },

    /// Reserve units of an item for an event
    Reserve {
        /// Item id
        #[arg(long)]
        item: u64,
        /// Event id
        #[arg(long)]
        event: u64,
        /// Units to reserve
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },

    /// Show the stock of every item on a date
    Stock {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List events
    Events {
        /// Only events in this status (QUOTE, CONFIRMED, COMPLETED, CANCELLED)
        #[arg(long)]
        status: Option<String>,
    },

    /// Confirm a quoted event
    ConfirmEvent {
        /// Event id
        #[arg(long)]
        event: u64,
    },

    /// Show notifications
    Notifications {
        /// Mark everything read afterwards
        #[arg(long)]
        mark_all_read: bool,
    },

    /// Show the payments of an event and what is still owed
    Payments {
        /// Event id
        #[arg(long)]
        event: u64,
    },

    /// Delete a client without events
    DeleteClient {
        /// Client id
        #[arg(long)]
        client: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    let default_filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let app = VenueApp::from_config(config).context("failed to build backend client")?;
    app.init_session().await.context("failed to read stored session")?;

    run(&app, cli.command).await
}

#[allow(clippy::too_many_lines)] // One arm per subcommand
async fn run(app: &VenueApp, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            let password = password
                .or_else(|| std::env::var("VENUE_PASSWORD").ok())
                .ok_or_else(|| anyhow!("pass --password or set VENUE_PASSWORD"))?;
            let user = app
                .api()
                .login(&email, &password)
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            println!("Signed in as {} ({:?})", user.name, user.role);
        },

        Commands::Logout => {
            app.api().logout().await?;
            println!("Signed out");
        },

        Commands::Whoami => match app.session().current_user() {
            Some(user) => {
                let expires = app
                    .session()
                    .claims()
                    .and_then(|claims| claims.expires_at())
                    .map_or_else(|| "unknown".to_string(), |at| at.to_rfc3339());
                println!("{} <{}> {:?}, session expires {expires}", user.name, user.email, user.role);
            },
            None => println!("Not signed in"),
        },

        Commands::Calendar { month } => {
            require_session(app)?;
            let today = app.today();
            let (year, month) = match month {
                Some(raw) => parse_month(&raw)?,
                None => (today.year(), today.month()),
            };

            let all = app.api().events().await.map_err(user_error)?;
            let own = match app.session().current_user().and_then(|u| u.client_id) {
                Some(client_id) => app.api().events_by_client(client_id).await.map_err(user_error)?,
                None => Vec::new(),
            };

            let days = availability::month_calendar(year, month, today, &all, &own)
                .ok_or_else(|| anyhow!("no such month: {year}-{month:02}"))?;
            println!("{year}-{month:02}");
            for day in days {
                let mark = match day.status {
                    DayStatus::Owned => "yours",
                    DayStatus::Occupied => "booked",
                    DayStatus::Past => "past",
                    DayStatus::Available => "free",
                };
                println!("  {}  {mark}", day.date.format("%a %d"));
            }
        },

        Commands::CheckItem {
            item,
            date,
            quantity,
        } => {
            require_session(app)?;
            let items = app.api().items().await.map_err(user_error)?;
            let reservations = app.api().reservations().await.map_err(user_error)?;
            let item = items
                .iter()
                .find(|candidate| candidate.id == ItemId::new(item))
                .ok_or_else(|| anyhow!(BookingError::ItemNotFound(ItemId::new(item)).user_message()))?;

            let fits = availability::check_availability(item, date, quantity, &reservations);
            let left = availability::remaining_quantity(item, date, &reservations);
            println!(
                "{}: {left} of {} free on {date}; {quantity} {}",
                item.name,
                item.quantity_total,
                if fits { "fit" } else { "do not fit" }
            );
        },

        Commands::Reserve {
            item,
            event,
            quantity,
        } => {
            require_session(app)?;
            let store = app.reservation_store();
            store.send(ReservationAction::LoadSnapshot).await?;
            store.wait_idle(SETTLE_TIMEOUT).await?;
            fail_on(store.state(|s| s.last_error.clone()))?;

            store
                .send(ReservationAction::CreateReservation {
                    item_id: ItemId::new(item),
                    event_id: EventId::new(event),
                    quantity,
                })
                .await?;
            store.wait_idle(SETTLE_TIMEOUT).await?;
            fail_on(store.state(|s| s.last_error.clone()))?;
            println!("Reserved {quantity} units of item {item} for event {event}");
        },

        Commands::Stock { date } => {
            require_session(app)?;
            let date = date.unwrap_or_else(|| app.today());
            let items = app.api().items().await.map_err(user_error)?;
            let reservations = app.api().reservations().await.map_err(user_error)?;

            println!("Stock on {date}");
            for level in availability::stock_levels(&items, date, &reservations) {
                println!(
                    "  #{:<5} {:<30} {:>4} / {:<4}{}",
                    level.item_id,
                    level.name,
                    level.remaining,
                    level.total,
                    if level.low_stock { "  LOW" } else { "" }
                );
            }
        },

        Commands::Events { status } => {
            require_session(app)?;
            let status = status.map(|raw| parse_status(&raw)).transpose()?;
            let mut events = app.api().events().await.map_err(user_error)?;
            events.sort_by_key(|event| event.event_date);

            for event in events.iter().filter(|e| status.is_none_or(|s| e.status == s)) {
                println!(
                    "  #{:<5} {}  {:<10} {}",
                    event.id, event.event_date, event.status, event.title
                );
            }
        },

        Commands::ConfirmEvent { event } => {
            require_session(app)?;
            let store = app.event_store();
            store.send(EventAction::LoadEvents).await?;
            store.wait_idle(SETTLE_TIMEOUT).await?;
            fail_on(store.state(|s| s.last_error.clone()))?;

            store
                .send(EventAction::ChangeStatus {
                    event_id: EventId::new(event),
                    status: EventStatus::Confirmed,
                })
                .await?;
            store.wait_idle(SETTLE_TIMEOUT).await?;
            fail_on(store.state(|s| s.last_error.clone()))?;
            println!("Event {event} confirmed");
        },

        Commands::Notifications { mark_all_read } => {
            require_session(app)?;
            let store = app.notification_store();
            store.send(NotificationAction::Load).await?;
            store.wait_idle(SETTLE_TIMEOUT).await?;
            fail_on(store.state(|s| s.last_error.clone()))?;

            let (notifications, unread) =
                store.state(|s| (s.notifications.clone(), s.unread_count()));
            println!("{unread} unread");
            for n in &notifications {
                let flag = if n.read { " " } else { "*" };
                println!("{flag} {}  {}: {}", n.created_at.format("%d/%m %H:%M"), n.title, n.message);
            }

            if mark_all_read {
                store.send(NotificationAction::MarkAllRead).await?;
                store.wait_idle(SETTLE_TIMEOUT).await?;
                fail_on(store.state(|s| s.last_error.clone()))?;
            }
        },

        Commands::Payments { event } => {
            require_session(app)?;
            let event = app.api().event(EventId::new(event)).await.map_err(user_error)?;
            let payments = app.api().payments_by_event(event.id).await.map_err(user_error)?;

            for payment in &payments {
                println!(
                    "  #{:<5} {:<12} {:?} {:?}",
                    payment.id, payment.amount, payment.method, payment.status
                );
            }
            let summary = billing::summarize(&event, &payments, app.today());
            println!(
                "Total {}  paid {}  outstanding {}  overdue {}",
                summary.total, summary.paid, summary.outstanding, summary.overdue_count
            );
        },

        Commands::DeleteClient { client } => {
            require_session(app)?;
            let store = app.client_store();
            store.send(ClientAction::LoadClients).await?;
            store.wait_idle(SETTLE_TIMEOUT).await?;
            fail_on(store.state(|s| s.last_error.clone()))?;

            store
                .send(ClientAction::DeleteClient {
                    client_id: ClientId::new(client),
                })
                .await?;
            store.wait_idle(SETTLE_TIMEOUT).await?;
            fail_on(store.state(|s| s.last_error.clone()))?;
            println!("Client {client} deleted");
        },
    }

    Ok(())
}

fn require_session(app: &VenueApp) -> Result<()> {
    if app.session().is_authenticated() {
        Ok(())
    } else {
        bail!("not signed in; run `venue login` first")
    }
}

fn fail_on(error: Option<BookingError>) -> Result<()> {
    match error {
        Some(error) => Err(anyhow!(error.user_message())),
        None => Ok(()),
    }
}

#[allow(clippy::needless_pass_by_value)] // Used with map_err
fn user_error(error: venue_booking::ApiError) -> anyhow::Error {
    anyhow!(error.user_message())
}

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("month must look like 2026-03"))?;
    Ok((
        year.parse().context("invalid year")?,
        month.parse().context("invalid month")?,
    ))
}

fn parse_status(raw: &str) -> Result<EventStatus> {
    serde_json::from_value(serde_json::Value::String(raw.to_ascii_uppercase()))
        .map_err(|_| anyhow!("unknown status {raw}"))
}
