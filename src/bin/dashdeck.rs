//! Operator CLI for Dashdeck.
//!
//! Every run seeds a fresh session, applies the requested command and prints
//! the result. Nothing is written unless `--export` is passed.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dashdeck_core::{
    config::Config,
    domain::{
        calendar::{EventColor, EventDraft, GridSlot, MonthCursor, WEEKDAY_LABELS},
        card::{CardDraft, CardId, Priority},
        board::LaneId,
        record::Role,
        sorting::{SortKey, SortOrder, SortState},
    },
    logging,
    DashError,
    state::{Action, Outcome, Session},
    storage::{file_storage::FileStorage, Snapshot, Storage},
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "dashdeck", version, about = "Dashdeck admin dashboard engines")]
struct Cli {
    /// Config file
    #[arg(long, default_value = Config::FILE_NAME, env = "DASHDECK_CONFIG")]
    config: PathBuf,

    /// Project root, overrides `storage.root`
    #[arg(long)]
    root: Option<PathBuf>,

    /// Write a snapshot of the session after the command
    #[arg(long)]
    export: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List users
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long, default_value = "name")]
        sort: SortKey,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
    /// Delete a user by ID
    DeleteUser { id: dashdeck_core::RecordId },
    /// Show the board
    Board,
    /// Move a card to the end of a lane
    Move { card: String, lane: String },
    /// Add a card to a lane
    AddCard {
        #[arg(long)]
        lane: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        assignee: String,
        /// YYYY-MM-DD
        #[arg(long)]
        due: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// Show a month of the calendar
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Add a calendar event
    AddEvent {
        #[arg(long)]
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "blue")]
        color: EventColor,
    },
    /// Import events from a JSON file
    ImportEvents { path: PathBuf },
    /// Overview figures and notifications
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    if let Some(root) = &cli.root {
        config.storage.root = root.clone();
    }
    logging::init(&config.logging).context("failed to initialize logging")?;

    let storage = FileStorage::new(&config.storage.root);
    let seed = storage.load_seed().await.context("failed to load seed data")?;
    let today = Local::now().date_naive();
    let mut session = Session::new(seed, today)
        .context("seed data is inconsistent")?
        .with_view(config.session.start_view)
        .with_theme(config.session.theme);

    if let Err(err) = run(&cli.command, &mut session, &storage, today).await {
        // Bad operator input exits with 2, environment failures propagate
        if err
            .downcast_ref::<DashError>()
            .is_some_and(DashError::is_rejection)
        {
            eprintln!("rejected: {:#}", err);
            std::process::exit(2);
        }
        return Err(err);
    }

    if cli.export {
        storage.initialize().await?;
        let path = storage
            .export_snapshot(&Snapshot::capture(&session))
            .await
            .context("export failed")?;
        println!("Exported to {}", path.display());
    }

    Ok(())
}

async fn run(
    command: &Command,
    session: &mut Session,
    storage: &FileStorage,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Command::Users {
            search,
            role,
            sort,
            order,
        } => {
            session.apply(Action::SetSearch(search.clone()))?;
            session.apply(Action::SetRoleFilter(*role))?;
            session.apply(Action::SetSort(SortState::new(*sort, *order)))?;
            print_users(session);
        }
        Command::DeleteUser { id } => {
            if let Outcome::RecordDeleted(record) = session.apply(Action::DeleteRecord(*id))? {
                println!("Deleted {} ({})", record.name, record.id);
            }
            print_users(session);
        }
        Command::Board => print_board(session),
        Command::Move { card, lane } => {
            session.apply(Action::PickUpCard(CardId::from(card.as_str())))?;
            session
                .apply(Action::DropCard(LaneId::from(lane.as_str())))
                .with_context(|| format!("could not move card {} to {}", card, lane))?;
            print_board(session);
        }
        Command::AddCard {
            lane,
            title,
            description,
            assignee,
            due,
            priority,
        } => {
            let draft = CardDraft::new(title, description, assignee, due).with_priority(*priority);
            let outcome = session.apply(Action::AddCard {
                lane: LaneId::from(lane.as_str()),
                draft,
            })?;
            if let Outcome::CardAdded(id) = outcome {
                println!("Added card {}", id);
            }
            print_board(session);
        }
        Command::Calendar { year, month } => {
            if year.is_some() || month.is_some() {
                let current = session.cursor();
                let cursor =
                    MonthCursor::new(year.unwrap_or(current.year), month.unwrap_or(current.month))?;
                session.apply(Action::ShowMonth(cursor))?;
            }
            print_calendar(session, today)?;
        }
        Command::AddEvent {
            title,
            date,
            time,
            color,
        } => {
            let draft = EventDraft::new(title, date, time).with_color(*color);
            if let Outcome::EventAdded(id) = session.apply(Action::AddEvent(draft))? {
                println!("Added event {}", id);
            }
        }
        Command::ImportEvents { path } => {
            let events = storage.import_events(path).await?;
            if let Outcome::EventsImported(count) = session.apply(Action::ImportEvents(events))? {
                info!(count, "imported events");
                println!("Imported {} events", count);
            }
        }
        Command::Stats => print_stats(session),
    }
    Ok(())
}

fn print_users(session: &Session) {
    let sort = session.query().sort;
    let header = |key: SortKey, label: &str| {
        format!("{}{}", label, sort.indicator_for(key).unwrap_or(""))
    };
    println!(
        "{:<4} {:<18} {:<22} {:<8} {:<9} {}",
        header(SortKey::Id, "ID"),
        header(SortKey::Name, "Name"),
        header(SortKey::Email, "Email"),
        header(SortKey::Role, "Role"),
        header(SortKey::Status, "Status"),
        header(SortKey::LastLogin, "Last Login"),
    );
    for record in session.visible_records() {
        println!(
            "{:<4} {:<18} {:<22} {:<8} {:<9} {}",
            record.id.value(),
            record.name,
            record.email,
            record.role.label(),
            record.status.label(),
            record.last_login
        );
    }
    let (shown, total) = session.record_summary();
    println!("Showing {} of {} results", shown, total);
}

fn print_board(session: &Session) {
    for lane in session.board().lanes() {
        println!("{} [{}] ({})", lane.title, lane.id, lane.len());
        for card in &lane.cards {
            println!(
                "  {:<14} {:<24} {:<6} {:<3} {}",
                card.id.as_str(),
                card.title,
                card.priority.to_string(),
                card.assignee_initials(),
                card.due_date
            );
        }
    }
}

fn print_calendar(session: &Session, today: NaiveDate) -> Result<()> {
    let grid = session.month_grid(today)?;
    println!("{}", grid.cursor.title());
    println!("{}", WEEKDAY_LABELS.map(|d| format!("{:>4}", d)).join(""));
    for week in grid.weeks() {
        let line: String = week
            .iter()
            .map(|slot| match slot {
                GridSlot::Blank => "    ".to_string(),
                GridSlot::Day(cell) => {
                    let marker = if cell.is_today {
                        '*'
                    } else if cell.events.is_empty() {
                        ' '
                    } else {
                        '•'
                    };
                    format!("{:>3}{}", cell.day(), marker)
                }
            })
            .collect();
        println!("{}", line);
    }
    for cell in grid.days.iter().filter(|c| !c.events.is_empty()) {
        let (shown, more) = cell.preview(2);
        let titles: Vec<String> = shown
            .iter()
            .map(|e| format!("{} {}", e.time, e.title))
            .collect();
        let suffix = if more > 0 {
            format!(" +{} more", more)
        } else {
            String::new()
        };
        println!("{}: {}{}", cell.date, titles.join(", "), suffix);
    }
    Ok(())
}

fn print_stats(session: &Session) {
    let metrics = session.metrics();
    for stat in &metrics.stats {
        println!("{:<12} {:>10} {}", stat.title, stat.value, stat.change_label());
    }
    println!();
    for (point, height) in metrics.sales.points.iter().zip(metrics.sales.normalized()) {
        let bar = "#".repeat((height * 30.0).round() as usize);
        println!("{:<4} {:<30} {}", point.month, bar, point.value);
    }
    println!();
    for metric in &metrics.performance {
        println!("{}", metric);
    }
    println!();
    println!("{} unread notifications", session.inbox().unread_count());
    for entry in &metrics.activity {
        println!("  {} ({})", entry.action, entry.time);
    }
}
