//! Dashboard statistics derived from a store snapshot

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::core::store::StoreSnapshot;
use crate::entities::project::{Company, Project, ProjectStatus};

/// Number of projects shown in the "recent" panel by default
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Creation-date window for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// The last 7 days up to now
    Week,
    /// The current calendar month
    #[default]
    Month,
    /// The current calendar year
    Year,
}

impl DateRange {
    /// Inclusive `[start, end]` bounds relative to `now`
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let day_start = |d: NaiveDate| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
        let today = now.date_naive();
        match self {
            DateRange::Week => (now - Duration::days(7), now),
            DateRange::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let next = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                }
                .unwrap_or(first);
                (day_start(first), day_start(next) - Duration::nanoseconds(1))
            }
            DateRange::Year => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let next = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(first);
                (day_start(first), day_start(next) - Duration::nanoseconds(1))
            }
        }
    }

    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds(now);
        at >= start && at <= end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRange::Week => write!(f, "week"),
            DateRange::Month => write!(f, "month"),
            DateRange::Year => write!(f, "year"),
        }
    }
}

impl std::str::FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            _ => Err(format!("Unknown range: {} (valid: week, month, year)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ProjectStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyCount {
    pub company: Company,
    pub count: usize,
}

/// One row of the recent-projects panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentProject {
    pub id: String,
    pub name: String,
    /// `None` when the client reference dangles
    pub client_name: Option<String>,
    pub status: ProjectStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_clients: usize,
    pub in_progress: usize,
    pub finished: usize,
    /// Statuses with at least one project
    pub by_status: Vec<StatusCount>,
    /// Every company, zeros included
    pub by_company: Vec<CompanyCount>,
    pub recent: Vec<RecentProject>,
    pub range: DateRange,
    pub created_in_range: usize,
}

fn count_status(projects: &[Project], status: ProjectStatus) -> usize {
    projects.iter().filter(|p| p.status == status).count()
}

impl DashboardStats {
    pub fn compute(
        snapshot: &StoreSnapshot,
        range: DateRange,
        now: DateTime<Utc>,
        recent_limit: usize,
    ) -> Self {
        let projects = snapshot.projects.as_slice();

        let by_status = ProjectStatus::all()
            .iter()
            .map(|&status| StatusCount {
                status,
                count: count_status(projects, status),
            })
            .filter(|s| s.count > 0)
            .collect();

        let by_company = Company::all()
            .iter()
            .map(|&company| CompanyCount {
                company,
                count: projects.iter().filter(|p| p.company == company).count(),
            })
            .collect();

        let mut recent: Vec<&Project> = projects.iter().collect();
        recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let recent = recent
            .into_iter()
            .take(recent_limit)
            .map(|p| RecentProject {
                id: p.id.to_string(),
                name: p.name.clone(),
                client_name: snapshot
                    .clients
                    .iter()
                    .find(|c| c.id == p.client_id)
                    .map(|c| c.name.clone()),
                status: p.status,
                updated_at: p.updated_at,
            })
            .collect();

        Self {
            total_projects: projects.len(),
            total_clients: snapshot.clients.len(),
            in_progress: count_status(projects, ProjectStatus::InProgress),
            finished: count_status(projects, ProjectStatus::Finished),
            by_status,
            by_company,
            recent,
            range,
            created_in_range: projects
                .iter()
                .filter(|p| range.contains(p.created_at, now))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityId;
    use crate::core::store::EntityStore;
    use crate::entities::project::ProjectUpdate;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seeded_counts() {
        let store = EntityStore::seeded();
        let stats = DashboardStats::compute(&store.snapshot(), DateRange::Month, at(2024, 3, 20), 5);

        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.total_clients, 3);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.finished, 1);
        assert_eq!(
            stats.by_status,
            vec![
                StatusCount { status: ProjectStatus::InProgress, count: 2 },
                StatusCount { status: ProjectStatus::Finished, count: 1 },
            ]
        );
        assert_eq!(stats.by_company.len(), 3);
        assert!(stats.by_company.iter().all(|c| c.count == 1));
        // Only project 3 was created in March 2024
        assert_eq!(stats.created_in_range, 1);
    }

    #[test]
    fn test_company_zero_counts_kept() {
        let mut store = EntityStore::seeded();
        store.delete_project(&EntityId::from("2"));
        let stats = DashboardStats::compute(&store.snapshot(), DateRange::Year, at(2024, 6, 1), 5);
        let soho = stats.by_company.iter().find(|c| c.company == Company::Soho).unwrap();
        assert_eq!(soho.count, 0);
        assert_eq!(stats.created_in_range, 2);
    }

    #[test]
    fn test_recent_sorted_by_update_and_limited() {
        let mut store = EntityStore::seeded();
        store.update_project(&EntityId::from("1"), ProjectUpdate::default());
        let stats = DashboardStats::compute(&store.snapshot(), DateRange::Week, Utc::now(), 2);

        let ids: Vec<&str> = stats.recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(stats.recent[0].client_name.as_deref(), Some("Maria Silva"));
    }

    #[test]
    fn test_recent_dangling_client() {
        let mut store = EntityStore::seeded();
        store.delete_client(&EntityId::from("2"));
        let stats = DashboardStats::compute(&store.snapshot(), DateRange::Week, Utc::now(), 5);
        let row = stats.recent.iter().find(|r| r.id == "2").unwrap();
        assert_eq!(row.client_name, None);
    }

    #[test]
    fn test_range_bounds() {
        let now = at(2024, 12, 15);
        let (start, end) = DateRange::Month.bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert!(end < Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert!(DateRange::Month.contains(Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap(), now));

        assert!(DateRange::Week.contains(at(2024, 12, 9), now));
        assert!(!DateRange::Week.contains(at(2024, 12, 7), now));
        assert!(DateRange::Year.contains(at(2024, 1, 1), now));
        assert!(!DateRange::Year.contains(at(2023, 12, 31), now));
    }

    #[test]
    fn test_range_parse() {
        assert_eq!("Week".parse::<DateRange>().unwrap(), DateRange::Week);
        assert!("decade".parse::<DateRange>().is_err());
    }
}
