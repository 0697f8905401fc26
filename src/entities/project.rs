//! Project entity type

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{set, Entity, Update};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::file::ProjectFile;

/// Normalize a user-supplied enum token: lowercase, ASCII-folded, dashed
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            ' ' | '_' => '-',
            other => other,
        })
        .collect()
}

/// Company brand the project is sold under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Company {
    #[serde(rename = "Caza 43")]
    Caza43,
    #[serde(rename = "SOHO")]
    Soho,
    #[serde(rename = "ELIAS")]
    Elias,
}

impl Company {
    pub fn all() -> &'static [Company] {
        &[Company::Caza43, Company::Soho, Company::Elias]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Company::Caza43 => "Caza 43",
            Company::Soho => "SOHO",
            Company::Elias => "ELIAS",
        }
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Company {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "caza-43" | "caza43" => Ok(Company::Caza43),
            "soho" => Ok(Company::Soho),
            "elias" => Ok(Company::Elias),
            _ => Err(format!("Unknown company: {} (valid: caza-43, soho, elias)", s)),
        }
    }
}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Em andamento")]
    InProgress,
    #[serde(rename = "Finalizado")]
    Finished,
    #[serde(rename = "Aguardando")]
    Waiting,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl ProjectStatus {
    pub fn all() -> &'static [ProjectStatus] {
        &[
            ProjectStatus::InProgress,
            ProjectStatus::Finished,
            ProjectStatus::Waiting,
            ProjectStatus::Cancelled,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "Em andamento",
            ProjectStatus::Finished => "Finalizado",
            ProjectStatus::Waiting => "Aguardando",
            ProjectStatus::Cancelled => "Cancelado",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "em-andamento" | "in-progress" => Ok(ProjectStatus::InProgress),
            "finalizado" | "finished" => Ok(ProjectStatus::Finished),
            "aguardando" | "waiting" => Ok(ProjectStatus::Waiting),
            "cancelado" | "cancelled" | "canceled" => Ok(ProjectStatus::Cancelled),
            _ => Err(format!(
                "Unknown status: {} (valid: in-progress, finished, waiting, cancelled)",
                s
            )),
        }
    }
}

/// Room or space a project covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "Cozinha")]
    Kitchen,
    #[serde(rename = "Quarto")]
    Bedroom,
    #[serde(rename = "Banheiro")]
    Bathroom,
    #[serde(rename = "Área social")]
    SocialArea,
    #[serde(rename = "Escritório")]
    Office,
    #[serde(rename = "Churrasqueira")]
    Barbecue,
}

impl Environment {
    pub fn all() -> &'static [Environment] {
        &[
            Environment::Kitchen,
            Environment::Bedroom,
            Environment::Bathroom,
            Environment::SocialArea,
            Environment::Office,
            Environment::Barbecue,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Environment::Kitchen => "Cozinha",
            Environment::Bedroom => "Quarto",
            Environment::Bathroom => "Banheiro",
            Environment::SocialArea => "Área social",
            Environment::Office => "Escritório",
            Environment::Barbecue => "Churrasqueira",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "cozinha" | "kitchen" => Ok(Environment::Kitchen),
            "quarto" | "bedroom" => Ok(Environment::Bedroom),
            "banheiro" | "bathroom" => Ok(Environment::Bathroom),
            "area-social" | "social-area" => Ok(Environment::SocialArea),
            "escritorio" | "office" => Ok(Environment::Office),
            "churrasqueira" | "barbecue" => Ok(Environment::Barbecue),
            _ => Err(format!(
                "Unknown environment: {} (valid: kitchen, bedroom, bathroom, social-area, office, barbecue)",
                s
            )),
        }
    }
}

/// A named, quantified add-on item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    pub id: EntityId,
    pub name: String,
    pub quantity: u32,
}

impl Extra {
    /// A blank row as the form adds it: fresh id, quantity 1
    pub fn blank() -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Ext),
            name: String::new(),
            quantity: 1,
        }
    }

    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            ..Self::blank()
        }
    }
}

/// A named dimension/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: EntityId,
    pub name: String,
    pub value: String,
}

impl Measurement {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Mea),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An image attached to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImage {
    pub id: EntityId,
    pub url: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ProjectImage {
    pub const KIND: &'static str = "image";
}

/// A furniture/renovation project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: EntityId,

    /// Short title
    pub name: String,

    /// Owning client (not enforced to exist)
    pub client_id: EntityId,

    pub company: Company,

    /// Responsible seller (not enforced to exist)
    pub seller_id: EntityId,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<Environment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_deadline: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,

    /// Free-text list of appliances to fit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliances: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<Extra>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measurements: Vec<Measurement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ProjectImage>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ProjectFile>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Entity for Project {
    const PREFIX: EntityPrefix = EntityPrefix::Prj;
    const KIND: &'static str = "project";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Project {
    /// Look up an attached file by id
    pub fn file(&self, file_id: &EntityId) -> Option<&ProjectFile> {
        self.files.iter().find(|f| &f.id == file_id)
    }
}

/// Fields supplied when creating a project
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub client_id: EntityId,
    pub company: Company,
    pub seller_id: EntityId,
    pub status: ProjectStatus,
    pub observations: Option<String>,
    pub environments: Vec<Environment>,
    pub measurement_date: Option<NaiveDate>,
    pub measurement_deadline: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub appliances: Option<String>,
    pub extras: Vec<Extra>,
    pub measurements: Vec<Measurement>,
    pub images: Vec<ProjectImage>,
    pub files: Vec<ProjectFile>,
}

impl NewProject {
    pub fn new(
        name: impl Into<String>,
        client_id: EntityId,
        company: Company,
        seller_id: EntityId,
    ) -> Self {
        Self {
            name: name.into(),
            client_id,
            company,
            seller_id,
            status: ProjectStatus::default(),
            observations: None,
            environments: Vec::new(),
            measurement_date: None,
            measurement_deadline: None,
            delivery_address: None,
            appliances: None,
            extras: Vec::new(),
            measurements: Vec::new(),
            images: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_environments(mut self, environments: Vec<Environment>) -> Self {
        self.environments = environments;
        self
    }

    pub fn with_extras(mut self, extras: Vec<Extra>) -> Self {
        self.extras = extras;
        self
    }

    pub(crate) fn into_project(self, id: EntityId, now: DateTime<Utc>) -> Project {
        Project {
            id,
            name: self.name,
            client_id: self.client_id,
            company: self.company,
            seller_id: self.seller_id,
            status: self.status,
            observations: self.observations,
            environments: self.environments,
            measurement_date: self.measurement_date,
            measurement_deadline: self.measurement_deadline,
            delivery_address: self.delivery_address,
            appliances: self.appliances,
            extras: self.extras,
            measurements: self.measurements,
            images: self.images,
            files: self.files,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a project
///
/// The store stamps `updated_at` on every applied update, even an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub client_id: Option<EntityId>,
    pub company: Option<Company>,
    pub seller_id: Option<EntityId>,
    pub status: Option<ProjectStatus>,
    pub observations: Option<Option<String>>,
    pub environments: Option<Vec<Environment>>,
    pub measurement_date: Option<Option<NaiveDate>>,
    pub measurement_deadline: Option<Option<NaiveDate>>,
    pub delivery_address: Option<Option<String>>,
    pub appliances: Option<Option<String>>,
    pub extras: Option<Vec<Extra>>,
    pub measurements: Option<Vec<Measurement>>,
    pub images: Option<Vec<ProjectImage>>,
    pub files: Option<Vec<ProjectFile>>,
}

impl ProjectUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn client_id(mut self, id: EntityId) -> Self {
        self.client_id = Some(id);
        self
    }

    pub fn company(mut self, company: Company) -> Self {
        self.company = Some(company);
        self
    }

    pub fn seller_id(mut self, id: EntityId) -> Self {
        self.seller_id = Some(id);
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn observations(mut self, value: Option<String>) -> Self {
        self.observations = Some(value);
        self
    }

    pub fn environments(mut self, environments: Vec<Environment>) -> Self {
        self.environments = Some(environments);
        self
    }

    pub fn measurement_date(mut self, date: Option<NaiveDate>) -> Self {
        self.measurement_date = Some(date);
        self
    }

    pub fn measurement_deadline(mut self, date: Option<NaiveDate>) -> Self {
        self.measurement_deadline = Some(date);
        self
    }

    pub fn delivery_address(mut self, value: Option<String>) -> Self {
        self.delivery_address = Some(value);
        self
    }

    pub fn appliances(mut self, value: Option<String>) -> Self {
        self.appliances = Some(value);
        self
    }

    pub fn extras(mut self, extras: Vec<Extra>) -> Self {
        self.extras = Some(extras);
        self
    }

    pub fn measurements(mut self, measurements: Vec<Measurement>) -> Self {
        self.measurements = Some(measurements);
        self
    }

    pub fn images(mut self, images: Vec<ProjectImage>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn files(mut self, files: Vec<ProjectFile>) -> Self {
        self.files = Some(files);
        self
    }
}

impl Update<Project> for ProjectUpdate {
    fn apply(self, target: &mut Project) {
        set(&mut target.name, self.name);
        set(&mut target.client_id, self.client_id);
        set(&mut target.company, self.company);
        set(&mut target.seller_id, self.seller_id);
        set(&mut target.status, self.status);
        set(&mut target.observations, self.observations);
        set(&mut target.environments, self.environments);
        set(&mut target.measurement_date, self.measurement_date);
        set(&mut target.measurement_deadline, self.measurement_deadline);
        set(&mut target.delivery_address, self.delivery_address);
        set(&mut target.appliances, self.appliances);
        set(&mut target.extras, self.extras);
        set(&mut target.measurements, self.measurements);
        set(&mut target.images, self.images);
        set(&mut target.files, self.files);
    }

    fn is_empty(&self) -> bool {
        *self == ProjectUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_labels_roundtrip_through_serde() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"Em andamento\"");
        let env: Environment = serde_json::from_str("\"Área social\"").unwrap();
        assert_eq!(env, Environment::SocialArea);
        let company: Company = serde_json::from_str("\"Caza 43\"").unwrap();
        assert_eq!(company, Company::Caza43);
    }

    #[test]
    fn test_enum_parsing_accepts_labels_and_tokens() {
        assert_eq!("Finalizado".parse::<ProjectStatus>().unwrap(), ProjectStatus::Finished);
        assert_eq!("in-progress".parse::<ProjectStatus>().unwrap(), ProjectStatus::InProgress);
        assert_eq!("caza 43".parse::<Company>().unwrap(), Company::Caza43);
        assert_eq!("Escritório".parse::<Environment>().unwrap(), Environment::Office);
        assert_eq!("area_social".parse::<Environment>().unwrap(), Environment::SocialArea);
        assert!("garage".parse::<Environment>().is_err());
    }

    #[test]
    fn test_default_status_is_in_progress() {
        let new = NewProject::new("P", EntityId::from("1"), Company::Soho, EntityId::from("2"));
        assert_eq!(new.status, ProjectStatus::InProgress);
    }

    #[test]
    fn test_blank_extra() {
        let extra = Extra::blank();
        assert_eq!(extra.quantity, 1);
        assert!(extra.name.is_empty());
        assert_eq!(extra.id.prefix(), Some(EntityPrefix::Ext));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ProjectUpdate::default().is_empty());
        assert!(!ProjectUpdate::default().status(ProjectStatus::Waiting).is_empty());
    }

    #[test]
    fn test_update_applies_present_fields() {
        let now = Utc::now();
        let mut project = NewProject::new("Cozinha", EntityId::from("1"), Company::Soho, EntityId::from("2"))
            .into_project(EntityId::from("9"), now);
        ProjectUpdate::default()
            .status(ProjectStatus::Finished)
            .appliances(Some("Cooktop".to_string()))
            .apply(&mut project);
        assert_eq!(project.status, ProjectStatus::Finished);
        assert_eq!(project.appliances.as_deref(), Some("Cooktop"));
        assert_eq!(project.name, "Cozinha");
    }
}
