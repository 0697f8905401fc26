//! List filtering and sorting over store contents

use std::cmp::Ordering;

use crate::core::identity::EntityId;
use crate::entities::client::Client;
use crate::entities::file::ProjectFile;
use crate::entities::project::{Company, Project, ProjectStatus};
use crate::entities::seller::Seller;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Clients whose name or email contains `term` (case-insensitive)
pub fn search_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    let term = term.to_lowercase();
    clients
        .iter()
        .filter(|c| contains_ci(&c.name, &term) || contains_ci(&c.email, &term))
        .collect()
}

/// Sellers whose name or email contains `term` (case-insensitive)
pub fn search_sellers<'a>(sellers: &'a [Seller], term: &str) -> Vec<&'a Seller> {
    let term = term.to_lowercase();
    sellers
        .iter()
        .filter(|s| contains_ci(&s.name, &term) || contains_ci(&s.email, &term))
        .collect()
}

/// Conjunctive project list filter; unset criteria match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    /// Substring of the project name (case-insensitive)
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub company: Option<Company>,
    pub client_id: Option<EntityId>,
    pub seller_id: Option<EntityId>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        let search_ok = self
            .search
            .as_ref()
            .map_or(true, |s| contains_ci(&project.name, &s.to_lowercase()));
        search_ok
            && self.status.map_or(true, |s| project.status == s)
            && self.company.map_or(true, |c| project.company == c)
            && self.client_id.as_ref().map_or(true, |id| &project.client_id == id)
            && self.seller_id.as_ref().map_or(true, |id| &project.seller_id == id)
    }

    /// Matching projects in collection order
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Field a file list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSortField {
    Name,
    Type,
    #[default]
    UploadedAt,
}

impl FileSortField {
    /// Direction used when this field is first selected
    pub fn initial_direction(&self) -> SortDirection {
        match self {
            FileSortField::Name => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Search and sort state of a project's file list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListView {
    pub search: String,
    pub field: FileSortField,
    pub direction: SortDirection,
}

impl FileListView {
    /// Select a sort column: the current one flips direction, a new one
    /// starts at its initial direction
    pub fn select_field(&mut self, field: FileSortField) {
        if field == self.field {
            self.direction = self.direction.flip();
        } else {
            self.field = field;
            self.direction = field.initial_direction();
        }
    }

    pub fn apply<'a>(&self, files: &'a [ProjectFile]) -> Vec<&'a ProjectFile> {
        let term = self.search.to_lowercase();
        let mut out: Vec<&ProjectFile> = files
            .iter()
            .filter(|f| contains_ci(&f.name, &term))
            .collect();

        out.sort_by(|a, b| {
            let ord = match self.field {
                FileSortField::Name => compare_names(&a.name, &b.name),
                FileSortField::Type => a.file_type.as_str().cmp(b.file_type.as_str()),
                FileSortField::UploadedAt => a.uploaded_at.cmp(&b.uploaded_at),
            };
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        out
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed;
    use crate::entities::file::ProjectFileType;
    use chrono::{Duration, TimeZone, Utc};

    fn file(name: &str, minutes: i64) -> ProjectFile {
        ProjectFile {
            id: EntityId::from(name),
            name: name.to_string(),
            url: format!("file:///tmp/{}", name),
            size: 1,
            mime_type: String::new(),
            file_type: ProjectFileType::from_name(name),
            uploaded_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
            uploaded_by: "teste".to_string(),
        }
    }

    #[test]
    fn test_search_clients_by_name_or_email() {
        let clients = seed::clients();
        let hits = search_clients(&clients, "MARIA");
        assert_eq!(hits.len(), 1);
        let hits = search_clients(&clients, "@email.com");
        assert_eq!(hits.len(), 3);
        assert!(search_clients(&clients, "zzz").is_empty());
    }

    #[test]
    fn test_search_sellers() {
        let sellers = seed::sellers();
        let hits = search_sellers(&sellers, "fernanda@");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Fernanda Lima");
    }

    #[test]
    fn test_project_filter_is_conjunctive() {
        let projects = seed::projects();
        let filter = ProjectFilter {
            status: Some(ProjectStatus::InProgress),
            ..Default::default()
        };
        assert_eq!(filter.apply(&projects).len(), 2);

        let filter = ProjectFilter {
            status: Some(ProjectStatus::InProgress),
            company: Some(Company::Elias),
            ..Default::default()
        };
        let hits = filter.apply(&projects);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");

        let filter = ProjectFilter {
            search: Some("quarto".to_string()),
            client_id: Some(EntityId::from("1")),
            ..Default::default()
        };
        assert!(filter.apply(&projects).is_empty());
    }

    #[test]
    fn test_empty_filter_matches_all_in_order() {
        let projects = seed::projects();
        let ids: Vec<&str> = ProjectFilter::default()
            .apply(&projects)
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_file_view_default_is_newest_first() {
        let files = vec![file("a.pdf", 1), file("b.png", 3), file("c.zip", 2)];
        let names: Vec<&str> = FileListView::default().apply(&files).into_iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b.png", "c.zip", "a.pdf"]);
    }

    #[test]
    fn test_file_view_sort_toggling() {
        let mut view = FileListView::default();

        view.select_field(FileSortField::Name);
        assert_eq!(view.direction, SortDirection::Asc);
        view.select_field(FileSortField::Name);
        assert_eq!(view.direction, SortDirection::Desc);

        view.select_field(FileSortField::Type);
        assert_eq!(view.direction, SortDirection::Desc);
        view.select_field(FileSortField::UploadedAt);
        assert_eq!(view.field, FileSortField::UploadedAt);
        assert_eq!(view.direction, SortDirection::Desc);
    }

    #[test]
    fn test_file_view_search_and_name_sort() {
        let files = vec![file("Planta.pdf", 1), file("foto.png", 2), file("planta-2.pdf", 3)];
        let view = FileListView {
            search: "PLANTA".to_string(),
            field: FileSortField::Name,
            direction: SortDirection::Asc,
        };
        let names: Vec<&str> = view.apply(&files).into_iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["planta-2.pdf", "Planta.pdf"]);
    }
}
