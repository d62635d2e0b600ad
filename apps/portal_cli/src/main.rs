use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use portal_api::{
    dashboard::load_dashboard,
    flows::{
        report::{report_outcome, spawn_report_submission},
        schedule::{schedule_outcome, spawn_pickup_scheduling},
        tracking::{detail_outcome, spawn_tracking_load},
    },
    ApiContext, PortalError, SimulatedTransport,
};
use shared::{
    domain::{QuantityUnit, WasteType, TIME_SLOTS},
    error::{ApiError, ApiException},
    protocol::{
        FlowOutcome, NotificationVariant, SchedulePickupRequest, StagedFile, SubmitReportRequest,
    },
};
use storage::ReportProvider;
use tracing::{debug, info};

/// Every invocation runs against a fresh session seeded with the demo data.
#[derive(Parser, Debug)]
#[command(name = "portal-cli")]
struct Cli {
    /// Skip the simulated network latency.
    #[arg(long)]
    instant: bool,
    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[arg(long, default_value = "warn")]
    log_filter: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the tracking timeline of a pickup.
    Track { id: String },
    /// File a waste report.
    Report {
        #[arg(long)]
        waste_type: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long, default_value = "kg")]
        unit: QuantityUnit,
        /// Photo to attach; may be repeated.
        #[arg(long = "photo")]
        photos: Vec<String>,
    },
    /// Book a pickup slot.
    Schedule {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        waste_type: String,
        /// YYYY-MM-DD, at most 30 days out.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        time_slot: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        urgent: bool,
    },
    /// Summary, upcoming pickups and recent activity.
    Dashboard,
    /// List accepted waste types and time slots.
    Options,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let provider = ReportProvider::new();
    let transport = if cli.instant {
        SimulatedTransport::instant()
    } else {
        SimulatedTransport::default()
    };
    let ctx = ApiContext::new(provider.store(), Arc::new(transport));
    info!(instant = cli.instant, "portal session started");

    match cli.command {
        Command::Track { id } => {
            info!(%id, "loading pickup");
            let result = spawn_tracking_load(ctx, id).wait().await;
            print_outcome(&detail_outcome(&result));
            let view = result.map_err(into_anyhow)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let pickup = &view.pickup;
                println!("Pickup #{} [{}] {}%", pickup.id, view.badge.label, pickup.progress);
                println!("  {} at {}, {}", pickup.waste_type, pickup.date, pickup.time);
                println!("  {}", pickup.address);
                for entry in &view.timeline {
                    let marker = if entry.is_current { "*" } else { "-" };
                    println!("  {marker} {} ({}): {}", entry.status, entry.time, entry.description);
                }
                if let Some(driver) = &view.driver {
                    println!(
                        "  driver {} {} arriving {}",
                        driver.name, driver.phone, driver.estimated_arrival
                    );
                }
            }
        }
        Command::Report {
            waste_type,
            location,
            description,
            quantity,
            unit,
            photos,
        } => {
            let files = photos
                .iter()
                .map(|path| staged_file(Path::new(path)))
                .collect::<Result<Vec<_>>>()?;
            info!(%waste_type, photos = files.len(), "filing report");
            let request = SubmitReportRequest {
                waste_type,
                location,
                description,
                quantity,
                unit,
                files,
            };
            let result = spawn_report_submission(ctx, request).wait().await;
            print_outcome(&report_outcome(&result));
            let submitted = result.map_err(into_anyhow)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&submitted)?);
            } else {
                println!("created report_id={}", submitted.report.id.0);
            }
        }
        Command::Schedule {
            name,
            phone,
            address,
            waste_type,
            date,
            time_slot,
            notes,
            urgent,
        } => {
            info!(?date, %time_slot, urgent, "booking pickup");
            let request = SchedulePickupRequest {
                name,
                phone,
                address,
                waste_type,
                date,
                time_slot,
                notes,
                urgent,
            };
            let result = spawn_pickup_scheduling(ctx, request).wait().await;
            print_outcome(&schedule_outcome(&result));
            let scheduled = result.map_err(into_anyhow)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&scheduled)?);
            }
        }
        Command::Dashboard => {
            let view = load_dashboard(&ctx).await.map_err(into_anyhow)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                let summary = &view.summary;
                println!(
                    "{} reports: {} scheduled, {} in transit, {} completed",
                    summary.total_reports, summary.scheduled, summary.in_transit, summary.completed
                );
                println!("Upcoming pickups");
                for pickup in &view.upcoming {
                    let report = &pickup.report;
                    println!(
                        "  #{} {} [{}] {} {} at {}",
                        report.id.0,
                        report.waste_type,
                        pickup.badge.label,
                        report.date,
                        report.time,
                        report.address
                    );
                }
                println!("Recent activity");
                for entry in &view.activities {
                    let badge = entry.badge.map(|badge| badge.label).unwrap_or("");
                    println!(
                        "  {} ({}) {} {badge}",
                        entry.activity.title, entry.activity.date, entry.activity.description
                    );
                }
            }
        }
        Command::Options => {
            println!("Waste types");
            for kind in WasteType::ALL {
                println!("  {:<12} {}", kind.key(), kind.label());
            }
            println!("Time slots");
            for slot in TIME_SLOTS {
                println!("  {slot}");
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &FlowOutcome) {
    if let Some(note) = &outcome.notification {
        match note.variant {
            NotificationVariant::Default => println!("{}: {}", note.title, note.description),
            NotificationVariant::Destructive => {
                eprintln!("{}: {}", note.title, note.description)
            }
        }
    }
}

fn into_anyhow(err: PortalError) -> anyhow::Error {
    ApiException::from(ApiError::from(err)).into()
}

fn staged_file(path: &Path) -> Result<StagedFile> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("cannot read photo '{}'", path.display()))?;
    debug!(path = %path.display(), size = metadata.len(), "staging photo");
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(StagedFile {
        name,
        size_bytes: metadata.len(),
        mime_type: mime_for(path),
    })
}

fn mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
