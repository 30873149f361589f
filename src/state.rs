//! Session state for one dashboard run.
//!
//! A [`Session`] is the only mutable state; every change goes through
//! [`Session::apply`] with an [`Action`]. A failed action leaves the session
//! as it was.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

use crate::domain::{
    board::{Board, DragSession, LaneId},
    calendar::{Calendar, Event, EventDraft, EventId, MonthCursor, MonthGrid},
    card::{CardDraft, CardId},
    collection::{Directory, ViewQuery},
    metrics::{Inbox, Metrics},
    record::{Record, RecordId, Role},
    sorting::{SortKey, SortState},
};
use crate::error::{DashError, Result};
use crate::seed::Seed;

/// Top-level page selected in the sidebar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Tables,
    Charts,
    Calendar,
    Kanban,
    Settings,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Tables,
        View::Charts,
        View::Calendar,
        View::Kanban,
        View::Settings,
    ];

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tables => "Tables",
            Self::Charts => "Charts",
            Self::Calendar => "Calendar",
            Self::Kanban => "Kanban",
            Self::Settings => "Settings",
        }
    }

    /// Page header title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tables => "Data Tables",
            Self::Charts => "Analytics Charts",
            Self::Calendar => "Calendar",
            Self::Kanban => "Kanban Board",
            Self::Settings => "Settings",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid view '{}'. Valid views: dashboard, tables, charts, calendar, kanban, settings",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme '{}'. Valid themes: light, dark", s)),
        }
    }
}

/// Dialog currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    UserDetails(RecordId),
    CreateTask(LaneId),
    CreateEvent,
    Notifications,
    Profile,
}

/// Every state change a session accepts
#[derive(Debug, Clone)]
pub enum Action {
    Navigate(View),
    SetTheme(Theme),
    ToggleTheme,
    OpenModal(Modal),
    CloseModal,
    SetSearch(String),
    SetRoleFilter(Option<Role>),
    SortBy(SortKey),
    SetSort(SortState),
    DeleteRecord(RecordId),
    PickUpCard(CardId),
    DropCard(LaneId),
    CancelDrag,
    AddCard { lane: LaneId, draft: CardDraft },
    AddEvent(EventDraft),
    PreviousMonth,
    NextMonth,
    ShowMonth(MonthCursor),
    ImportEvents(Vec<Event>),
    MarkNotificationRead(u32),
    MarkAllNotificationsRead,
}

/// What an applied action produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Updated,
    RecordDeleted(Record),
    CardMoved(CardId),
    CardAdded(CardId),
    EventAdded(EventId),
    EventsImported(usize),
    /// The action was valid but had nothing to act on
    Unchanged,
}

/// The single state container for one run
///
/// Fields are read through accessors; [`Session::apply`] is the only way to
/// change them once the session is built.
#[derive(Debug)]
pub struct Session {
    view: View,
    theme: Theme,
    modal: Option<Modal>,
    directory: Directory,
    query: ViewQuery,
    board: Board,
    drag: DragSession,
    calendar: Calendar,
    cursor: MonthCursor,
    inbox: Inbox,
    metrics: Metrics,
}

impl Session {
    /// Starts a session from seed data with the calendar on `today`'s month
    ///
    /// Fails when the seed repeats an ID, see [`Seed::validate`].
    pub fn new(seed: Seed, today: NaiveDate) -> Result<Self> {
        seed.validate()?;
        Ok(Self {
            view: View::default(),
            theme: Theme::default(),
            modal: None,
            directory: Directory::new(seed.records),
            query: ViewQuery::default(),
            board: Board::new(seed.lanes),
            drag: DragSession::new(),
            calendar: Calendar::new(seed.events),
            cursor: MonthCursor::containing(today),
            inbox: Inbox::new(seed.notifications),
            metrics: seed.metrics,
        })
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn title(&self) -> &'static str {
        self.view.title()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// `(shown, total)` for the user table footer
    pub fn record_summary(&self) -> (usize, usize) {
        self.directory.summary(&self.query)
    }

    /// Rows of the user table for the current query
    pub fn visible_records(&self) -> Vec<&Record> {
        self.directory.view(&self.query)
    }

    /// Month grid for the calendar cursor
    pub fn month_grid(&self, today: NaiveDate) -> Result<MonthGrid<'_>> {
        self.calendar.month(self.cursor, today)
    }

    /// Applies one action
    pub fn apply(&mut self, action: Action) -> Result<Outcome> {
        debug!(?action, "applying action");
        let outcome = match action {
            Action::Navigate(view) => {
                self.view = view;
                self.modal = None;
                Outcome::Updated
            }
            Action::SetTheme(theme) => {
                self.theme = theme;
                Outcome::Updated
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                Outcome::Updated
            }
            Action::OpenModal(modal) => {
                self.check_modal_target(&modal)?;
                self.modal = Some(modal);
                Outcome::Updated
            }
            Action::CloseModal => {
                self.modal = None;
                Outcome::Updated
            }
            Action::SetSearch(search) => {
                self.query.search = search;
                Outcome::Updated
            }
            Action::SetRoleFilter(role) => {
                self.query.role = role;
                Outcome::Updated
            }
            Action::SortBy(key) => {
                self.query.sort.toggle(key);
                Outcome::Updated
            }
            Action::SetSort(sort) => {
                self.query.sort = sort;
                Outcome::Updated
            }
            Action::DeleteRecord(id) => {
                let removed = self.directory.delete(id)?;
                if self.modal == Some(Modal::UserDetails(id)) {
                    self.modal = None;
                }
                Outcome::RecordDeleted(removed)
            }
            Action::PickUpCard(card_id) => {
                if self.board.find_card(&card_id).is_none() {
                    return Err(DashError::CardNotFound(card_id.to_string()));
                }
                self.drag.pick_up(card_id);
                Outcome::Updated
            }
            Action::DropCard(lane_id) => match self.drag.drop_on(&mut self.board, &lane_id)? {
                Some(card_id) => Outcome::CardMoved(card_id),
                None => Outcome::Unchanged,
            },
            Action::CancelDrag => {
                self.drag.cancel();
                Outcome::Updated
            }
            Action::AddCard { lane, draft } => {
                let id = self.board.add_card(&lane, &draft)?;
                if matches!(self.modal, Some(Modal::CreateTask(_))) {
                    self.modal = None;
                }
                Outcome::CardAdded(id)
            }
            Action::AddEvent(draft) => {
                let id = self.calendar.add_event(draft)?;
                if self.modal == Some(Modal::CreateEvent) {
                    self.modal = None;
                }
                Outcome::EventAdded(id)
            }
            Action::PreviousMonth => {
                self.cursor = self.cursor.previous();
                Outcome::Updated
            }
            Action::NextMonth => {
                self.cursor = self.cursor.next();
                Outcome::Updated
            }
            Action::ShowMonth(cursor) => {
                self.cursor = cursor;
                Outcome::Updated
            }
            Action::ImportEvents(events) => Outcome::EventsImported(self.calendar.import(events)?),
            Action::MarkNotificationRead(id) => {
                self.inbox.mark_read(id)?;
                Outcome::Updated
            }
            Action::MarkAllNotificationsRead => {
                self.inbox.mark_all_read();
                Outcome::Updated
            }
        };
        Ok(outcome)
    }

    fn check_modal_target(&self, modal: &Modal) -> Result<()> {
        match modal {
            Modal::UserDetails(id) if self.directory.get(*id).is_none() => {
                Err(DashError::RecordNotFound(id.to_string()))
            }
            Modal::CreateTask(lane) if self.board.lane(lane).is_none() => {
                Err(DashError::LaneNotFound(lane.to_string()))
            }
            _ => Ok(()),
        }
    }
}
