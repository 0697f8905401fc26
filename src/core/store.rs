//! Entity Store - in-memory source of truth for clients, sellers and projects
//!
//! Every collection is held behind an `Arc<Vec<_>>`. Mutations go through
//! `Arc::make_mut`, so a [`StoreSnapshot`] taken earlier keeps seeing the
//! old collection while the store moves on to a new one. The store is
//! infallible: lookups return `Option`, and updates/deletes of unknown ids
//! are silent no-ops that report `false`.
//!
//! Referential integrity is not enforced. Deleting a client or seller
//! leaves projects pointing at the missing id.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::core::clock::{Clock, SystemClock};
use crate::core::entity::{Entity, Update};
use crate::core::identity::EntityId;
use crate::entities::client::{Client, ClientUpdate, NewClient};
use crate::entities::project::{NewProject, Project, ProjectUpdate};
use crate::entities::seller::{NewSeller, Seller, SellerUpdate};

/// An ordered, copy-on-write collection of one entity kind
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Arc<Vec<T>>,
}

impl<T: Entity> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Share the current collection value
    pub fn share(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Generate an id not already present in this collection
    fn fresh_id(&self) -> EntityId {
        loop {
            let id = EntityId::new(T::PREFIX);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn push(&mut self, item: T) {
        Arc::make_mut(&mut self.items).push(item);
    }

    /// Mutate the matching record; untouched if the id is absent
    fn modify(&mut self, id: &EntityId, f: impl FnOnce(&mut T)) -> bool {
        let Some(pos) = self.items.iter().position(|item| item.id() == id) else {
            return false;
        };
        f(&mut Arc::make_mut(&mut self.items)[pos]);
        true
    }

    fn remove(&mut self, id: &EntityId) -> Option<T> {
        let pos = self.items.iter().position(|item| item.id() == id)?;
        Some(Arc::make_mut(&mut self.items).remove(pos))
    }
}

/// Immutable view of all collections at one version
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub version: u64,
    pub clients: Arc<Vec<Client>>,
    pub sellers: Arc<Vec<Seller>>,
    pub projects: Arc<Vec<Project>>,
}

/// In-memory store of clients, sellers and projects
pub struct EntityStore {
    clients: Collection<Client>,
    sellers: Collection<Seller>,
    projects: Collection<Project>,
    version: u64,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("clients", &self.clients.len())
            .field("sellers", &self.sellers.len())
            .field("projects", &self.projects.len())
            .field("version", &self.version)
            .finish()
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl EntityStore {
    /// Create a store over the given records
    pub fn new(
        clients: Vec<Client>,
        sellers: Vec<Seller>,
        projects: Vec<Project>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            clients: Collection::new(clients),
            sellers: Collection::new(sellers),
            projects: Collection::new(projects),
            version: 0,
            clock,
        }
    }

    /// An empty store on the system clock
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Box::new(SystemClock))
    }

    /// A store loaded with the sample records, on the system clock
    pub fn seeded() -> Self {
        Self::seeded_with_clock(Box::new(SystemClock))
    }

    pub fn seeded_with_clock(clock: Box<dyn Clock>) -> Self {
        Self::new(
            crate::core::seed::clients(),
            crate::core::seed::sellers(),
            crate::core::seed::projects(),
            clock,
        )
    }

    /// Current time on the store's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Counter bumped by every effective mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: self.version,
            clients: self.clients.share(),
            sellers: self.sellers.share(),
            projects: self.projects.share(),
        }
    }

    pub fn clients(&self) -> &[Client] {
        self.clients.as_slice()
    }

    pub fn sellers(&self) -> &[Seller] {
        self.sellers.as_slice()
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.as_slice()
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    // =====================================================================
    // Clients
    // =====================================================================

    /// Append a new client; the store assigns id and creation time
    pub fn add_client(&mut self, new: NewClient) -> EntityId {
        let id = self.clients.fresh_id();
        let client = new.into_client(id.clone(), self.clock.now());
        self.clients.push(client);
        self.bump();
        debug!(kind = Client::KIND, id = %id, "added");
        id
    }

    pub fn update_client(&mut self, id: &EntityId, update: ClientUpdate) -> bool {
        let applied = self.clients.modify(id, |client| update.apply(client));
        self.record_update(Client::KIND, id, applied)
    }

    pub fn delete_client(&mut self, id: &EntityId) -> bool {
        let removed = self.clients.remove(id).is_some();
        self.record_delete(Client::KIND, id, removed)
    }

    pub fn get_client(&self, id: &EntityId) -> Option<&Client> {
        self.clients.get(id)
    }

    // =====================================================================
    // Sellers
    // =====================================================================

    pub fn add_seller(&mut self, new: NewSeller) -> EntityId {
        let id = self.sellers.fresh_id();
        self.sellers.push(new.into_seller(id.clone()));
        self.bump();
        debug!(kind = Seller::KIND, id = %id, "added");
        id
    }

    pub fn update_seller(&mut self, id: &EntityId, update: SellerUpdate) -> bool {
        let applied = self.sellers.modify(id, |seller| update.apply(seller));
        self.record_update(Seller::KIND, id, applied)
    }

    pub fn delete_seller(&mut self, id: &EntityId) -> bool {
        let removed = self.sellers.remove(id).is_some();
        self.record_delete(Seller::KIND, id, removed)
    }

    pub fn get_seller(&self, id: &EntityId) -> Option<&Seller> {
        self.sellers.get(id)
    }

    // =====================================================================
    // Projects
    // =====================================================================

    /// Append a new project with `created_at == updated_at == now`
    pub fn add_project(&mut self, new: NewProject) -> EntityId {
        let id = self.projects.fresh_id();
        let project = new.into_project(id.clone(), self.clock.now());
        self.projects.push(project);
        self.bump();
        debug!(kind = Project::KIND, id = %id, "added");
        id
    }

    /// Apply the update and stamp `updated_at`, even for an empty update
    pub fn update_project(&mut self, id: &EntityId, update: ProjectUpdate) -> bool {
        let now = self.clock.now();
        let applied = self.projects.modify(id, |project| {
            let previous = project.updated_at;
            update.apply(project);
            project.updated_at = next_stamp(previous, now);
        });
        self.record_update(Project::KIND, id, applied)
    }

    pub fn delete_project(&mut self, id: &EntityId) -> bool {
        let removed = self.projects.remove(id).is_some();
        self.record_delete(Project::KIND, id, removed)
    }

    pub fn get_project(&self, id: &EntityId) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Projects owned by a client, in collection order
    pub fn projects_by_client(&self, client_id: &EntityId) -> Vec<&Project> {
        self.projects()
            .iter()
            .filter(|p| &p.client_id == client_id)
            .collect()
    }

    /// Projects handled by a seller, in collection order
    pub fn projects_by_seller(&self, seller_id: &EntityId) -> Vec<&Project> {
        self.projects()
            .iter()
            .filter(|p| &p.seller_id == seller_id)
            .collect()
    }

    fn record_update(&mut self, kind: &str, id: &EntityId, applied: bool) -> bool {
        if applied {
            self.bump();
            debug!(kind, id = %id, "updated");
        } else {
            debug!(kind, id = %id, "update skipped: not found");
        }
        applied
    }

    fn record_delete(&mut self, kind: &str, id: &EntityId, removed: bool) -> bool {
        if removed {
            self.bump();
            debug!(kind, id = %id, "deleted");
        } else {
            debug!(kind, id = %id, "delete skipped: not found");
        }
        removed
    }
}

/// `now`, nudged forward so it is strictly after `previous`
fn next_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::entities::project::{Company, ProjectStatus};
    use chrono::TimeZone;

    fn id(s: &str) -> EntityId {
        EntityId::from(s)
    }

    #[test]
    fn test_add_client_appends_with_fresh_id() {
        let mut store = EntityStore::seeded();
        let before: Vec<EntityId> = store.clients().iter().map(|c| c.id.clone()).collect();

        let new_id = store.add_client(NewClient::new("Teste", "123", "t@t.com"));

        assert_eq!(store.clients().len(), 4);
        let last = store.clients().last().unwrap();
        assert_eq!(last.name, "Teste");
        assert_eq!(last.phone, "123");
        assert_eq!(last.email, "t@t.com");
        assert_eq!(last.address, None);
        assert_eq!(last.id, new_id);
        assert!(!before.contains(&new_id));
        for seeded in ["1", "2", "3"] {
            assert_ne!(new_id, seeded);
        }
    }

    #[test]
    fn test_add_client_stamps_created_at() {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let mut store = EntityStore::seeded_with_clock(Box::new(FixedClock(at)));
        let new_id = store.add_client(NewClient::new("A", "1", "a@a.com"));
        assert_eq!(store.get_client(&new_id).unwrap().created_at, at);
    }

    #[test]
    fn test_add_project_sets_both_timestamps() {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        let mut store = EntityStore::seeded_with_clock(Box::new(FixedClock(at)));
        let new_id = store.add_project(NewProject::new("Sala", id("1"), Company::Soho, id("2")));
        let project = store.get_project(&new_id).unwrap();
        assert_eq!(project.created_at, at);
        assert_eq!(project.updated_at, at);
        assert_eq!(store.projects().last().unwrap().id, new_id);
    }

    #[test]
    fn test_update_project_status_keeps_other_fields() {
        let mut store = EntityStore::seeded();
        let before = store.get_project(&id("1")).unwrap().clone();

        assert!(store.update_project(&id("1"), ProjectUpdate::default().status(ProjectStatus::Finished)));

        let after = store.get_project(&id("1")).unwrap();
        assert_eq!(after.status, ProjectStatus::Finished);
        assert!(after.updated_at > before.updated_at);

        let mut expected = before.clone();
        expected.status = ProjectStatus::Finished;
        expected.updated_at = after.updated_at;
        assert_eq!(*after, expected);
    }

    #[test]
    fn test_update_project_stamps_even_when_empty() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut store = EntityStore::seeded_with_clock(Box::new(FixedClock(at)));

        assert!(store.update_project(&id("2"), ProjectUpdate::default()));
        let first = store.get_project(&id("2")).unwrap().updated_at;
        assert_eq!(first, at);

        // Frozen clock: the stamp still moves strictly forward
        assert!(store.update_project(&id("2"), ProjectUpdate::default()));
        let second = store.get_project(&id("2")).unwrap().updated_at;
        assert!(second > first);
    }

    #[test]
    fn test_update_client_partial() {
        let mut store = EntityStore::seeded();
        let before = store.get_client(&id("2")).unwrap().clone();

        assert!(store.update_client(&id("2"), ClientUpdate::default().email("novo@email.com")));

        let after = store.get_client(&id("2")).unwrap();
        assert_eq!(after.email, "novo@email.com");
        assert_eq!(after.name, before.name);
        assert_eq!(after.phone, before.phone);
        assert_eq!(after.address, before.address);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut store = EntityStore::seeded();
        let snapshot = store.snapshot();

        assert!(!store.update_client(&id("404"), ClientUpdate::default().name("X")));
        assert!(!store.update_seller(&id("404"), SellerUpdate::default().name("X")));
        assert!(!store.update_project(&id("404"), ProjectUpdate::default().name("X")));
        assert!(!store.delete_client(&id("404")));
        assert!(!store.delete_seller(&id("404")));
        assert!(!store.delete_project(&id("404")));

        assert_eq!(store.version(), snapshot.version);
        assert_eq!(store.clients(), snapshot.clients.as_slice());
        assert_eq!(store.sellers(), snapshot.sellers.as_slice());
        assert_eq!(store.projects(), snapshot.projects.as_slice());
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = EntityStore::seeded();
        assert!(store.delete_project(&id("2")));
        assert_eq!(store.projects().len(), 2);
        assert!(store.get_project(&id("2")).is_none());
    }

    #[test]
    fn test_delete_seller_leaves_dangling_projects() {
        let mut store = EntityStore::seeded();
        let before = store.get_project(&id("1")).unwrap().clone();

        assert!(store.delete_seller(&id("1")));

        let projects = store.projects_by_client(&id("1"));
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].seller_id, "1");
        assert_eq!(*projects[0], before);
        assert!(store.get_seller(&id("1")).is_none());
    }

    #[test]
    fn test_delete_client_leaves_projects() {
        let mut store = EntityStore::seeded();
        assert!(store.delete_client(&id("3")));
        assert_eq!(store.projects().len(), 3);
        assert_eq!(store.projects_by_client(&id("3")).len(), 1);
    }

    #[test]
    fn test_projects_by_client_preserves_order() {
        let mut store = EntityStore::seeded();
        let a = store.add_project(NewProject::new("A", id("1"), Company::Elias, id("2")));
        store.add_project(NewProject::new("B", id("2"), Company::Elias, id("2")));
        let c = store.add_project(NewProject::new("C", id("1"), Company::Soho, id("3")));

        let ids: Vec<&EntityId> = store.projects_by_client(&id("1")).into_iter().map(|p| &p.id).collect();
        assert_eq!(ids, vec![&id("1"), &a, &c]);
        assert!(store.projects_by_client(&id("nobody")).is_empty());
    }

    #[test]
    fn test_projects_by_seller() {
        let store = EntityStore::seeded();
        let projects = store.projects_by_seller(&id("2"));
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "2");
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_mutations() {
        let mut store = EntityStore::seeded();
        let snapshot = store.snapshot();

        store.add_seller(NewSeller::new("Nova", "nova@empresa.com"));
        store.update_project(&id("1"), ProjectUpdate::default().name("Renomeado"));

        assert_eq!(snapshot.sellers.len(), 3);
        assert_eq!(snapshot.projects[0].name, "Reforma Cozinha Completa");
        assert_eq!(store.sellers().len(), 4);
        assert_eq!(store.projects()[0].name, "Renomeado");
        assert_eq!(store.version(), snapshot.version + 2);
    }

    #[test]
    fn test_mutation_replaces_collection_value() {
        let mut store = EntityStore::seeded();
        let before = store.snapshot();
        store.delete_client(&id("1"));
        let after = store.snapshot();
        assert!(!Arc::ptr_eq(&before.clients, &after.clients));
        assert!(Arc::ptr_eq(&before.sellers, &after.sellers));
    }

    #[test]
    fn test_next_stamp() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(next_stamp(t, t + Duration::seconds(1)), t + Duration::seconds(1));
        assert_eq!(next_stamp(t, t), t + Duration::microseconds(1));
        assert_eq!(next_stamp(t, t - Duration::days(1)), t + Duration::microseconds(1));
    }
}
