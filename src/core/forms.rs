//! Form layer - collects user input and validates it before it reaches the store
//!
//! A form holds raw field values (blank strings allowed) the way an input
//! screen does. Submitting either produces the typed store input or a
//! [`ValidationError`] naming every missing required field; the store is
//! never called with an invalid form.

use chrono::NaiveDate;
use miette::Diagnostic;
use thiserror::Error;

use crate::core::identity::EntityId;
use crate::entities::client::{Client, ClientUpdate, NewClient};
use crate::entities::project::{
    Company, Environment, Extra, Measurement, NewProject, Project, ProjectStatus, ProjectUpdate,
};
use crate::entities::seller::{NewSeller, Seller, SellerUpdate};

/// Required form fields were left blank
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
#[error("required fields missing: {}", .missing.join(", "))]
#[diagnostic(
    code(obra::form::required),
    help("fill in every required field and submit again; nothing was saved")
)]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

impl ValidationError {
    fn check(fields: &[(&'static str, bool)]) -> Result<(), Self> {
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Self { missing })
        }
    }
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Blank text becomes `None`
fn optional(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =========================================================================
// Client
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl ClientForm {
    /// Prefill from an existing client for editing
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            address: client.address.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check(&[
            ("name", filled(&self.name)),
            ("phone", filled(&self.phone)),
            ("email", filled(&self.email)),
        ])
    }

    pub fn into_new(self) -> Result<NewClient, ValidationError> {
        self.validate()?;
        Ok(NewClient {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: optional(self.address),
        })
    }

    /// Every form field overwrites the stored one
    pub fn into_update(self) -> Result<ClientUpdate, ValidationError> {
        let new = self.into_new()?;
        Ok(ClientUpdate::default()
            .name(new.name)
            .phone(new.phone)
            .email(new.email)
            .address(new.address))
    }
}

// =========================================================================
// Seller
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SellerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl SellerForm {
    pub fn from_seller(seller: &Seller) -> Self {
        Self {
            name: seller.name.clone(),
            email: seller.email.clone(),
            phone: seller.phone.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check(&[("name", filled(&self.name)), ("email", filled(&self.email))])
    }

    pub fn into_new(self) -> Result<NewSeller, ValidationError> {
        self.validate()?;
        Ok(NewSeller {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(self.phone),
        })
    }

    pub fn into_update(self) -> Result<SellerUpdate, ValidationError> {
        let new = self.into_new()?;
        Ok(SellerUpdate::default()
            .name(new.name)
            .email(new.email)
            .phone(new.phone))
    }
}

// =========================================================================
// Project
// =========================================================================

/// The project create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub client_id: Option<EntityId>,
    pub company: Option<Company>,
    pub seller_id: Option<EntityId>,
    pub status: ProjectStatus,
    pub observations: String,
    pub environments: Vec<Environment>,
    pub measurement_date: Option<NaiveDate>,
    pub measurement_deadline: Option<NaiveDate>,
    pub delivery_address: String,
    pub appliances: String,
    pub extras: Vec<Extra>,
    pub measurements: Vec<Measurement>,
}

impl ProjectForm {
    /// Prefill from an existing project for editing
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            client_id: Some(project.client_id.clone()),
            company: Some(project.company),
            seller_id: Some(project.seller_id.clone()),
            status: project.status,
            observations: project.observations.clone().unwrap_or_default(),
            environments: project.environments.clone(),
            measurement_date: project.measurement_date,
            measurement_deadline: project.measurement_deadline,
            delivery_address: project.delivery_address.clone().unwrap_or_default(),
            appliances: project.appliances.clone().unwrap_or_default(),
            extras: project.extras.clone(),
            measurements: project.measurements.clone(),
        }
    }

    /// Add the environment if absent, remove it if present
    pub fn toggle_environment(&mut self, env: Environment) {
        if let Some(pos) = self.environments.iter().position(|e| *e == env) {
            self.environments.remove(pos);
        } else {
            self.environments.push(env);
        }
    }

    /// Append a blank extra row and return its index
    pub fn add_extra(&mut self) -> usize {
        self.extras.push(Extra::blank());
        self.extras.len() - 1
    }

    pub fn set_extra_name(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.extras.get_mut(index) {
            Some(extra) => {
                extra.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_extra_quantity(&mut self, index: usize, quantity: u32) -> bool {
        match self.extras.get_mut(index) {
            Some(extra) => {
                extra.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove_extra(&mut self, index: usize) -> Option<Extra> {
        (index < self.extras.len()).then(|| self.extras.remove(index))
    }

    pub fn add_measurement(&mut self, name: impl Into<String>, value: impl Into<String>) -> usize {
        self.measurements.push(Measurement::new(name, value));
        self.measurements.len() - 1
    }

    pub fn set_measurement(&mut self, index: usize, name: Option<String>, value: Option<String>) -> bool {
        let Some(measurement) = self.measurements.get_mut(index) else {
            return false;
        };
        if let Some(name) = name {
            measurement.name = name;
        }
        if let Some(value) = value {
            measurement.value = value;
        }
        true
    }

    pub fn remove_measurement(&mut self, index: usize) -> Option<Measurement> {
        (index < self.measurements.len()).then(|| self.measurements.remove(index))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check(&[
            ("name", filled(&self.name)),
            ("client", self.client_id.is_some()),
            ("company", self.company.is_some()),
            ("seller", self.seller_id.is_some()),
        ])
    }

    /// Validate and build the store input; blank extras/measurements are dropped
    pub fn into_new_project(self) -> Result<NewProject, ValidationError> {
        self.validate()?;
        let (Some(client_id), Some(company), Some(seller_id)) =
            (self.client_id, self.company, self.seller_id)
        else {
            return Err(ValidationError {
                missing: vec!["client", "company", "seller"],
            });
        };

        let mut new = NewProject::new(self.name.trim(), client_id, company, seller_id)
            .with_status(self.status)
            .with_environments(self.environments)
            .with_extras(
                self.extras
                    .into_iter()
                    .filter(|e| filled(&e.name))
                    .collect(),
            );
        new.observations = optional(self.observations);
        new.measurement_date = self.measurement_date;
        new.measurement_deadline = self.measurement_deadline;
        new.delivery_address = optional(self.delivery_address);
        new.appliances = optional(self.appliances);
        new.measurements = self
            .measurements
            .into_iter()
            .filter(|m| filled(&m.name))
            .collect();
        Ok(new)
    }

    /// Validate and build an update covering every form field
    ///
    /// Images and files are not part of the form and stay untouched.
    pub fn into_update(self) -> Result<ProjectUpdate, ValidationError> {
        let new = self.into_new_project()?;
        Ok(ProjectUpdate::default()
            .name(new.name)
            .client_id(new.client_id)
            .company(new.company)
            .seller_id(new.seller_id)
            .status(new.status)
            .observations(new.observations)
            .environments(new.environments)
            .measurement_date(new.measurement_date)
            .measurement_deadline(new.measurement_deadline)
            .delivery_address(new.delivery_address)
            .appliances(new.appliances)
            .extras(new.extras)
            .measurements(new.measurements))
    }
}
