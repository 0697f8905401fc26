//! Interactive form filling for `new`/`edit --interactive`
//!
//! Each prompt is prefilled with the form's current value, so the same
//! functions serve creation (blank form) and editing (prefilled form).
//! Validation happens afterwards, when the form is submitted.

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::forms::{ClientForm, ProjectForm, SellerForm};
use crate::core::store::EntityStore;
use crate::entities::project::{Company, Environment, ProjectStatus};

pub struct FormWizard {
    theme: ColorfulTheme,
}

impl Default for FormWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn text(&self, prompt: &str, current: &str, required: bool) -> Result<String> {
        let prompt = if required {
            format!("{} *", prompt)
        } else {
            prompt.to_string()
        };
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(!required);
        if !current.is_empty() {
            input = input.default(current.to_string());
        }
        input.interact_text().into_diagnostic()
    }

    fn date(&self, prompt: &str, current: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
        let current = current.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        let value = self.text(&format!("{} (YYYY-MM-DD)", prompt), &current, false)?;
        if value.trim().is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| miette::miette!("invalid date '{}' (expected YYYY-MM-DD)", value))
    }

    fn pick<T: Copy + PartialEq + std::fmt::Display>(
        &self,
        prompt: &str,
        items: &[T],
        current: Option<T>,
    ) -> Result<T> {
        let default = current
            .and_then(|c| items.iter().position(|i| *i == c))
            .unwrap_or(0);
        let labels: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(default)
            .interact()
            .into_diagnostic()?;
        Ok(items[selection])
    }

    pub fn client(&self, mut form: ClientForm) -> Result<ClientForm> {
        form.name = self.text("Name", &form.name, true)?;
        form.phone = self.text("Phone", &form.phone, true)?;
        form.email = self.text("Email", &form.email, true)?;
        form.address = self.text("Address", &form.address, false)?;
        Ok(form)
    }

    pub fn seller(&self, mut form: SellerForm) -> Result<SellerForm> {
        form.name = self.text("Name", &form.name, true)?;
        form.email = self.text("Email", &form.email, true)?;
        form.phone = self.text("Phone", &form.phone, false)?;
        Ok(form)
    }

    /// Client and seller are chosen from the store's current records
    pub fn project(&self, mut form: ProjectForm, store: &EntityStore) -> Result<ProjectForm> {
        if store.clients().is_empty() || store.sellers().is_empty() {
            return Err(miette::miette!(
                "a project needs at least one client and one seller; create them first"
            ));
        }

        form.name = self.text("Name", &form.name, true)?;

        let client_labels: Vec<String> = store.clients().iter().map(|c| c.name.clone()).collect();
        let client_default = form
            .client_id
            .as_ref()
            .and_then(|id| store.clients().iter().position(|c| &c.id == id))
            .unwrap_or(0);
        let client = Select::with_theme(&self.theme)
            .with_prompt("Client *")
            .items(&client_labels)
            .default(client_default)
            .interact()
            .into_diagnostic()?;
        form.client_id = Some(store.clients()[client].id.clone());

        form.company = Some(self.pick("Company *", Company::all(), form.company)?);

        let seller_labels: Vec<String> = store.sellers().iter().map(|s| s.name.clone()).collect();
        let seller_default = form
            .seller_id
            .as_ref()
            .and_then(|id| store.sellers().iter().position(|s| &s.id == id))
            .unwrap_or(0);
        let seller = Select::with_theme(&self.theme)
            .with_prompt("Seller *")
            .items(&seller_labels)
            .default(seller_default)
            .interact()
            .into_diagnostic()?;
        form.seller_id = Some(store.sellers()[seller].id.clone());

        form.status = self.pick("Status", ProjectStatus::all(), Some(form.status))?;

        let env_labels: Vec<&str> = Environment::all().iter().map(|e| e.label()).collect();
        let checked: Vec<bool> = Environment::all()
            .iter()
            .map(|e| form.environments.contains(e))
            .collect();
        let chosen = MultiSelect::with_theme(&self.theme)
            .with_prompt("Environments")
            .items(&env_labels)
            .defaults(&checked)
            .interact()
            .into_diagnostic()?;
        form.environments = chosen.into_iter().map(|i| Environment::all()[i]).collect();

        form.measurement_date = self.date("Measurement date", form.measurement_date)?;
        form.measurement_deadline = self.date("Measurement deadline", form.measurement_deadline)?;
        form.delivery_address = self.text("Delivery address", &form.delivery_address, false)?;
        form.appliances = self.text("Appliances", &form.appliances, false)?;
        form.observations = self.text("Observations", &form.observations, false)?;
        Ok(form)
    }
}
