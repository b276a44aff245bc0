//! Experience booking client CLI
//!
//! Drives the typed procedure client from the command line. With `--mock`
//! (or `[mock] enabled = true` in config) catalog calls are answered
//! in-process and nothing reaches the network.
//!
//! Usage:
//!   cargo run --bin experience-cli -- --mock list --limit 3
//!   cargo run --bin experience-cli -- --mock show exp-1 --access ticket_holder
//!   cargo run --bin experience-cli -- book exp-1 --participants 2 --at 2026-12-01T19:00:00Z

use anyhow::Context;
use clap::{Parser, Subcommand};
use experience_booking::client::RpcClient;
use experience_booking::domain::{AccessLevel, ExperienceFilter};
use experience_booking::infra::Config;
use experience_booking::mock::{Fixtures, MockRouter, MockService, StartOutcome};
use experience_booking::services::{
    load_experience_page, submit_booking, BookingForm, ContentTier, ViewState,
};
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "experience-cli", version)]
#[command(about = "Query experiences and create bookings through the procedure client")]
struct Args {
    /// Path to TOML configuration file [default: $CONFIG_FILE, else config/dev.toml]
    #[arg(short, long)]
    config: Option<String>,

    /// Answer catalog calls from the in-process mock router
    #[arg(long)]
    mock: bool,

    /// Override the backend base URL
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check backend health
    Health,
    /// List experiences, optionally scoped to a brand
    List {
        #[arg(long, default_value = "10")]
        limit: usize,
        #[arg(long, default_value = "0")]
        offset: usize,
        #[arg(long)]
        status: Option<String>,
        #[arg(long = "type")]
        experience_type: Option<String>,
        #[arg(long)]
        brand: Option<String>,
    },
    /// Show an experience page as seen at an access level
    Show {
        id: String,
        /// public, ticket_holder or attended
        #[arg(long, default_value = "public")]
        access: String,
    },
    /// Book an experience
    Book {
        id: String,
        #[arg(long, default_value = "1")]
        participants: u32,
        /// Visit time (RFC 3339)
        #[arg(long)]
        at: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// List bookings for a user
    Bookings { user: String },
}

fn print_tier(tier: &ContentTier) {
    if tier.is_empty() {
        return;
    }
    println!("\n{} ({}/{} unlocked)", tier.title, tier.unlocked_count(), tier.assets.len());
    for entry in &tier.assets {
        let marker = if entry.unlocked { "  [open]" } else { "[locked]" };
        let hint = entry.lock_label.as_deref().unwrap_or("");
        println!("  {marker} {:<9} {} {hint}", entry.asset.kind.label(), entry.asset.title);
    }
}

async fn run(client: &RpcClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Health => {
            let health = client.health_check().await?;
            println!("{} at {}: {}", health.status, health.timestamp, health.message);
        }
        Command::List { limit, offset, status, experience_type, brand } => {
            let filter = ExperienceFilter { limit, offset, status, experience_type };
            let page = match brand {
                Some(brand) => client.experience_list_by_brand(&brand, &filter).await?,
                None => client.experience_list(&filter).await?,
            };
            for e in &page.experiences {
                println!(
                    "{:<8} {:<28} {:<12} {:<9} {}",
                    e.id, e.title, e.experience_type, e.status, e.location
                );
            }
            println!("{} of {} (more: {})", page.experiences.len(), page.total, page.has_more);
        }
        Command::Show { id, access } => {
            let viewer = AccessLevel::from_tag(&access);
            if !viewer.is_known() {
                warn!(access = %access, "unknown_access_level_gated_content_hidden");
            }
            match load_experience_page(client, &id, viewer).await {
                ViewState::Ready(page) => {
                    println!("{}\n{}", page.title, page.description);
                    println!(
                        "{} | {} | {} | {}",
                        page.location, page.duration_label, page.capacity_label, page.price_label
                    );
                    if !page.highlights.is_empty() {
                        println!("Highlights: {}", page.highlights.join(", "));
                    }
                    println!("Payment: {}", page.payment_methods.join(", "));
                    print_tier(&page.before);
                    print_tier(&page.after);
                }
                ViewState::Error(message) => anyhow::bail!(message),
                ViewState::Loading => {}
            }
        }
        Command::Book { id, participants, at, user } => {
            let experience = client.experience_get_by_id(&id).await?;
            let form = BookingForm { participants, scheduled_visit_time: at, user_id: user };
            let booking = submit_booking(client, &experience, &form).await?;
            println!(
                "{} booking {} for {}",
                booking.confirmation_code, booking.id, experience.title
            );
        }
        Command::Bookings { user } => {
            for b in client.booking_list_by_user(&user).await? {
                println!(
                    "{:<12} {:<8} x{} {} {:?}",
                    b.confirmation_code,
                    b.experience_id,
                    b.number_of_participants,
                    b.scheduled_visit_time,
                    b.status
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::load_with(args.config.as_deref());
    if let Some(base_url) = args.base_url {
        config.set_client_base_url(base_url);
    }
    if args.mock {
        config.set_mock_enabled(true);
    }

    if config.mock_enabled() {
        let fixtures = match config.fixtures_file() {
            Some(path) => Fixtures::from_file(path)?,
            None => Fixtures::default(),
        };
        let outcome = MockService::global().start(config.environment(), MockRouter::new(fixtures));
        if outcome == StartOutcome::Unsupported {
            info!(environment = %config.environment().as_str(), "mock_interception_unavailable");
        }
    }

    let client = RpcClient::from_config(&config).context("failed to build procedure client")?;
    let result = run(&client, args.command).await;
    MockService::global().stop();
    result
}
