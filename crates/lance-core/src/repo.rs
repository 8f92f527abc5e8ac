//! In-memory entity collections with persist-on-mutation snapshots.
//!
//! Both repositories keep their whole collection in a `Vec`, newest
//! first, and rewrite the corresponding snapshot file after every
//! mutation. No mutation returns an error: bad numeric input is coerced
//! to 0 at the add boundary and storage failures are absorbed by
//! [`SnapshotStore`].

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::model::{
    Client, ClientDraft, ClientPatch, ClientStatus, Project, ProjectDraft, ProjectPatch,
    avatar_initials,
};
use crate::store::SnapshotStore;

/// Snapshot key for the project collection.
pub const PROJECTS_KEY: &str = "projects";
/// Snapshot key for the client collection.
pub const CLIENTS_KEY: &str = "clients";

/// Coerce free-text numeric input to `f64`; non-numeric becomes 0.
fn parse_amount(field: &'static str, raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or_else(|_| {
        debug!(
            field,
            raw,
            code = %ErrorCode::InvalidNumericInput,
            "non-numeric input coerced to 0"
        );
        0.0
    })
}

/// Coerce free-text count input to `u32`; non-numeric or negative becomes 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(field: &'static str, raw: Option<&str>) -> u32 {
    let amount = parse_amount(field, raw);
    if amount.is_finite() && amount > 0.0 {
        amount.trunc().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Owns the ordered project collection, most recent first.
#[derive(Debug)]
pub struct ProjectRepository {
    store: SnapshotStore,
    items: Vec<Project>,
}

impl ProjectRepository {
    /// Rehydrate the collection from its snapshot. Missing or unreadable
    /// snapshots start the collection empty.
    #[must_use]
    pub fn load(store: SnapshotStore) -> Self {
        let items = store.load(PROJECTS_KEY);
        Self { store, items }
    }

    /// Store a new project and return it. The draft's numeric fields are
    /// coerced, an empty deadline becomes `"TBD"`, and a missing id gets
    /// a fresh UUID.
    pub fn add(&mut self, draft: ProjectDraft) -> Project {
        let project = Project {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            name: draft.name,
            client: draft.client,
            budget: parse_amount("budget", draft.budget.as_deref()),
            deadline: draft
                .deadline
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "TBD".to_string()),
            progress: parse_amount("progress", draft.progress.as_deref()),
        };

        self.items.insert(0, project.clone());
        self.persist();
        project
    }

    /// Merge `patch` into the project with `id`. Unknown ids are a no-op.
    pub fn update(&mut self, id: Uuid, patch: &ProjectPatch) {
        if let Some(project) = self.items.iter_mut().find(|p| p.id == id) {
            if let Some(name) = &patch.name {
                project.name = name.clone();
            }
            if let Some(client) = &patch.client {
                project.client = client.clone();
            }
            if let Some(budget) = patch.budget {
                project.budget = budget;
            }
            if let Some(deadline) = &patch.deadline {
                project.deadline = deadline.clone();
            }
            if let Some(progress) = patch.progress {
                project.progress = progress;
            }
        } else {
            debug!(%id, "update for unknown project ignored");
        }
        self.persist();
    }

    /// Remove the project with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        let removed = self.items.len() != before;
        self.persist();
        removed
    }

    /// The current ordered collection.
    #[must_use]
    pub fn list(&self) -> &[Project] {
        &self.items
    }

    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<&Project> {
        self.items.iter().find(|p| p.id == id)
    }

    fn persist(&self) {
        self.store.save(PROJECTS_KEY, &self.items);
    }
}

/// Owns the ordered client collection, most recent first.
#[derive(Debug)]
pub struct ClientRepository {
    store: SnapshotStore,
    items: Vec<Client>,
}

impl ClientRepository {
    /// Rehydrate the collection from its snapshot. Missing or unreadable
    /// snapshots start the collection empty.
    #[must_use]
    pub fn load(store: SnapshotStore) -> Self {
        let items = store.load(CLIENTS_KEY);
        Self { store, items }
    }

    /// Store a new client and return it. Count and total are coerced and
    /// a missing avatar is derived from the name.
    pub fn add(&mut self, draft: ClientDraft) -> Client {
        let avatar = draft
            .avatar
            .unwrap_or_else(|| avatar_initials(&draft.name));
        let client = Client {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            name: draft.name,
            avatar,
            projects: parse_count("projects", draft.projects.as_deref()),
            total_paid: parse_amount("totalPaid", draft.total_paid.as_deref()),
            status: draft.status.unwrap_or_default(),
        };

        self.items.insert(0, client.clone());
        self.persist();
        client
    }

    /// Merge `patch` into the client with `id`. Unknown ids are a no-op.
    pub fn update(&mut self, id: Uuid, patch: &ClientPatch) {
        if let Some(client) = self.items.iter_mut().find(|c| c.id == id) {
            if let Some(name) = &patch.name {
                client.name = name.clone();
            }
            if let Some(avatar) = &patch.avatar {
                client.avatar = avatar.clone();
            }
            if let Some(projects) = patch.projects {
                client.projects = projects;
            }
            if let Some(total_paid) = patch.total_paid {
                client.total_paid = total_paid;
            }
            if let Some(status) = patch.status {
                client.status = status;
            }
        } else {
            debug!(%id, "update for unknown client ignored");
        }
        self.persist();
    }

    /// The current ordered collection.
    #[must_use]
    pub fn list(&self) -> &[Client] {
        &self.items
    }

    /// Case-insensitive exact name lookup. When several clients share the
    /// name, the first in collection order wins.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Client> {
        let needle = name.to_lowercase();
        self.items.iter().find(|c| c.name.to_lowercase() == needle)
    }

    /// Fold one project and its budget into the client matching `name`
    /// (case-insensitive, first match wins) and mark it active. Returns
    /// `false` when no client matched.
    pub fn credit(&mut self, name: &str, budget: f64) -> bool {
        let needle = name.to_lowercase();
        let mut matches = self
            .items
            .iter_mut()
            .filter(|c| c.name.to_lowercase() == needle);

        let Some(client) = matches.next() else {
            return false;
        };
        if matches.next().is_some() {
            warn!(name, "multiple clients share this name; crediting the first");
        }

        client.projects += 1;
        client.total_paid += budget;
        client.status = ClientStatus::Active;
        self.persist();
        true
    }

    fn persist(&self) {
        self.store.save(CLIENTS_KEY, &self.items);
    }
}
