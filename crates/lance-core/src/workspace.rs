//! The explicit store object the rest of the application works through.
//!
//! One `Workspace` is constructed per process and passed by reference to
//! whatever needs it; there is no ambient global. Opening it acquires the
//! data-directory lock and rehydrates every collection before anything
//! else runs.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::model::{ClientDraft, ClientStatus, Project, ProjectDraft, ProjectStatus};
use crate::repo::{ClientRepository, ProjectRepository};
use crate::store::{LockError, SnapshotStore, StoreLock};
use crate::timer::TimerService;

const LOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// Deadlines are stored as the HTML date-input format.
const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Owns the repositories, the timer, and the store lock.
#[derive(Debug)]
pub struct Workspace {
    projects: ProjectRepository,
    clients: ClientRepository,
    timer: TimerService,
    _lock: StoreLock,
}

impl Workspace {
    /// Open the workspace rooted at `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`LockError`] when another process holds the store lock
    /// or the data directory cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, LockError> {
        let lock = StoreLock::acquire(data_dir, LOCK_TIMEOUT)?;
        let store = SnapshotStore::new(data_dir);

        Ok(Self {
            projects: ProjectRepository::load(store.clone()),
            clients: ClientRepository::load(store.clone()),
            timer: TimerService::load(store),
            _lock: lock,
        })
    }

    #[must_use]
    pub const fn projects(&self) -> &ProjectRepository {
        &self.projects
    }

    pub fn projects_mut(&mut self) -> &mut ProjectRepository {
        &mut self.projects
    }

    #[must_use]
    pub const fn clients(&self) -> &ClientRepository {
        &self.clients
    }

    pub fn clients_mut(&mut self) -> &mut ClientRepository {
        &mut self.clients
    }

    #[must_use]
    pub const fn timer(&self) -> &TimerService {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut TimerService {
        &mut self.timer
    }

    /// Add a project and reflect it on the owning client in one step.
    ///
    /// An existing client (case-insensitive name match, first in
    /// collection order) is credited with the project and marked active;
    /// otherwise a new active client is created with derived initials.
    /// The exclusive borrow makes the pair atomic: no caller can observe
    /// the project without the client update.
    pub fn add_project_with_client(&mut self, draft: ProjectDraft) -> Project {
        let client_name = draft.client.clone();
        let project = self.projects.add(draft);

        if !self.clients.credit(&client_name, project.budget) {
            self.clients.add(ClientDraft {
                name: client_name,
                projects: Some("1".to_string()),
                total_paid: Some(project.budget.to_string()),
                status: Some(ClientStatus::Active),
                ..ClientDraft::default()
            });
        }

        project
    }

    /// Dashboard roll-up over the whole store.
    #[must_use]
    pub fn summary(&self, clock: &dyn Clock) -> Summary {
        let projects = self.projects.list();

        let total_earnings = projects.iter().map(|p| p.budget).sum();
        let active_clients = self
            .clients
            .list()
            .iter()
            .filter(|c| c.status.is_active())
            .count();

        let today =
            DateTime::<Utc>::from_timestamp_millis(clock.now_millis()).map(|dt| dt.date_naive());
        let due_within_week = projects
            .iter()
            .filter(|p| is_due_within_week(&p.deadline, today))
            .count();

        let completion_rate = if projects.is_empty() {
            0
        } else {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            {
                (projects.iter().map(|p| p.progress).sum::<f64>() / projects.len() as f64).round()
                    as i64
            }
        };

        Summary {
            total_earnings,
            active_clients,
            due_within_week,
            completion_rate,
        }
    }
}

/// Overview statistics derived from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_earnings: f64,
    pub active_clients: usize,
    pub due_within_week: usize,
    /// Average project progress, rounded to the nearest whole percent.
    pub completion_rate: i64,
}

fn is_due_within_week(deadline: &str, today: Option<NaiveDate>) -> bool {
    let Some(today) = today else { return false };
    // "TBD" and anything else unparseable never counts as due.
    let Ok(date) = NaiveDate::parse_from_str(deadline, DEADLINE_FORMAT) else {
        return false;
    };
    let horizon = today.checked_add_days(Days::new(7)).unwrap_or(today);
    date <= horizon
}

/// Filter projects by a case-insensitive substring over name and client,
/// intersected with an optional derived-status filter.
#[must_use]
pub fn filter_projects<'a>(
    projects: &'a [Project],
    search: &str,
    status: Option<ProjectStatus>,
) -> Vec<&'a Project> {
    let needle = search.to_lowercase();
    projects
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.client.to_lowercase().contains(&needle)
        })
        .filter(|p| status.is_none_or(|s| p.status() == s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Workspace, filter_projects, is_due_within_week};
    use crate::clock::ManualClock;
    use crate::model::{ProjectDraft, ProjectStatus};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn draft(name: &str, client: &str, budget: &str) -> ProjectDraft {
        ProjectDraft {
            name: name.to_string(),
            client: client.to_string(),
            budget: Some(budget.to_string()),
            ..ProjectDraft::default()
        }
    }

    #[test]
    fn summary_over_empty_store_is_all_zero() {
        let dir = TempDir::new().expect("temp dir");
        let ws = Workspace::open(dir.path()).expect("open workspace");
        let summary = ws.summary(&ManualClock::new(0));

        assert_eq!(summary.total_earnings, 0.0);
        assert_eq!(summary.active_clients, 0);
        assert_eq!(summary.due_within_week, 0);
        assert_eq!(summary.completion_rate, 0);
    }

    #[test]
    fn summary_totals_and_rounds() {
        let dir = TempDir::new().expect("temp dir");
        let mut ws = Workspace::open(dir.path()).expect("open workspace");

        let mut first = draft("Site", "Acme", "500");
        first.progress = Some("50".to_string());
        ws.add_project_with_client(first);

        let mut second = draft("App", "Nova", "300");
        second.progress = Some("25".to_string());
        ws.add_project_with_client(second);

        let summary = ws.summary(&ManualClock::new(0));
        assert_eq!(summary.total_earnings, 800.0);
        assert_eq!(summary.active_clients, 2);
        // (50 + 25) / 2 = 37.5, rounded up.
        assert_eq!(summary.completion_rate, 38);
    }

    #[test]
    fn due_within_week_ignores_tbd_and_far_dates() {
        // 2026-08-07 in epoch millis.
        let today = NaiveDate::from_ymd_opt(2026, 8, 7);

        assert!(is_due_within_week("2026-08-10", today));
        assert!(is_due_within_week("2026-08-14", today));
        // Past-due still counts as due.
        assert!(is_due_within_week("2026-08-01", today));
        assert!(!is_due_within_week("2026-08-15", today));
        assert!(!is_due_within_week("TBD", today));
        assert!(!is_due_within_week("soonish", today));
        assert!(!is_due_within_week("2026-08-10", None));
    }

    #[test]
    fn filter_matches_name_and_client_case_insensitively() {
        let dir = TempDir::new().expect("temp dir");
        let mut ws = Workspace::open(dir.path()).expect("open workspace");
        ws.add_project_with_client(draft("Landing Page", "Acme", "100"));
        ws.add_project_with_client(draft("Brand Refresh", "Nova", "200"));

        let by_name = filter_projects(ws.projects().list(), "landing", None);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Landing Page");

        let by_client = filter_projects(ws.projects().list(), "NOVA", None);
        assert_eq!(by_client.len(), 1);
        assert_eq!(by_client[0].client, "Nova");

        let none = filter_projects(ws.projects().list(), "missing", None);
        assert!(none.is_empty());
    }

    #[test]
    fn filter_intersects_search_with_status() {
        let dir = TempDir::new().expect("temp dir");
        let mut ws = Workspace::open(dir.path()).expect("open workspace");

        let mut started = draft("Started", "Acme", "100");
        started.progress = Some("40".to_string());
        ws.add_project_with_client(started);
        ws.add_project_with_client(draft("Queued", "Acme", "100"));

        let in_progress = filter_projects(
            ws.projects().list(),
            "acme",
            Some(ProjectStatus::InProgress),
        );
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].name, "Started");

        let planning =
            filter_projects(ws.projects().list(), "", Some(ProjectStatus::Planning));
        assert_eq!(planning.len(), 1);
        assert_eq!(planning[0].name, "Queued");
    }
}
