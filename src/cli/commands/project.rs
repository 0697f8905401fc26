//! `obra project` command - Project management
//!
//! Besides list/new/show/edit/delete, the nested `extra`, `measurement`,
//! `env` and `image` groups edit one part of a project. Each of them loads
//! the project into a [`ProjectForm`], changes it, and submits it through
//! the same validated update path as `edit`.

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::{miette, Result};
use std::path::PathBuf;

use crate::cli::helpers::{confirm, or_dash, parse_date};
use crate::cli::output::{field, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::wizard::FormWizard;
use crate::cli::{App, GlobalOpts, OutputFormat};
use crate::core::attachments;
use crate::core::entity::Entity;
use crate::core::forms::ProjectForm;
use crate::core::identity::EntityId;
use crate::core::query::ProjectFilter;
use crate::entities::file::format_file_size;
use crate::entities::client::Client;
use crate::entities::project::{Company, Environment, Project, ProjectImage, ProjectStatus};
use crate::entities::seller::Seller;

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects with filtering
    List(ListArgs),

    /// Create a new project
    New(NewArgs),

    /// Show a project's details
    Show(ShowArgs),

    /// Edit a project
    Edit(EditArgs),

    /// Delete a project
    Delete(DeleteArgs),

    /// Manage a project's extra items
    #[command(subcommand)]
    Extra(ExtraCommands),

    /// Manage a project's measurements
    #[command(subcommand)]
    Measurement(MeasurementCommands),

    /// Manage a project's environments
    #[command(subcommand)]
    Env(EnvCommands),

    /// Manage a project's image gallery
    #[command(subcommand)]
    Image(ImageCommands),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in project name
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by status (in-progress, finished, waiting, cancelled)
    #[arg(long)]
    pub status: Option<ProjectStatus>,

    /// Filter by company (caza-43, soho, elias)
    #[arg(long, short = 'c')]
    pub company: Option<Company>,

    /// Filter by client ID or short ID
    #[arg(long)]
    pub client: Option<String>,

    /// Filter by seller ID or short ID
    #[arg(long)]
    pub seller: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

/// Fields shared by `new` and `edit`
#[derive(clap::Args, Debug, Default)]
pub struct ProjectFields {
    /// Project name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Client ID or short ID
    #[arg(long)]
    pub client: Option<String>,

    /// Company (caza-43, soho, elias)
    #[arg(long)]
    pub company: Option<Company>,

    /// Seller ID or short ID
    #[arg(long)]
    pub seller: Option<String>,

    /// Status (default: in-progress)
    #[arg(long)]
    pub status: Option<ProjectStatus>,

    /// Environments, comma-separated (kitchen, bedroom, bathroom, social-area, office, barbecue)
    #[arg(long = "env", value_delimiter = ',')]
    pub environments: Vec<Environment>,

    #[arg(long)]
    pub observations: Option<String>,

    #[arg(long)]
    pub delivery_address: Option<String>,

    /// Appliances to fit (free text)
    #[arg(long)]
    pub appliances: Option<String>,

    /// Measurement date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub measurement_date: Option<NaiveDate>,

    /// Measurement deadline (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub measurement_deadline: Option<NaiveDate>,
}

impl ProjectFields {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.client.is_none()
            && self.company.is_none()
            && self.seller.is_none()
            && self.status.is_none()
            && self.environments.is_empty()
            && self.observations.is_none()
            && self.delivery_address.is_none()
            && self.appliances.is_none()
            && self.measurement_date.is_none()
            && self.measurement_deadline.is_none()
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: ProjectFields,

    /// Extra item as NAME:QUANTITY (repeatable)
    #[arg(long = "extra", value_parser = parse_extra)]
    pub extras: Vec<(String, u32)>,

    /// Measurement as NAME=VALUE (repeatable)
    #[arg(long = "measurement", value_parser = parse_measurement)]
    pub measurements: Vec<(String, String)>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Project ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Project ID or short ID (@N)
    pub id: String,

    #[command(flatten)]
    pub fields: ProjectFields,

    /// Clear optional fields (observations, delivery-address, appliances,
    /// measurement-date, measurement-deadline)
    #[arg(long, value_delimiter = ',')]
    pub clear: Vec<ClearableField>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearableField {
    Observations,
    DeliveryAddress,
    Appliances,
    MeasurementDate,
    MeasurementDeadline,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Project ID or short ID (@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum ExtraCommands {
    /// Add an extra item
    Add {
        /// Project ID or short ID
        project: String,
        name: String,
        #[arg(long, short = 'n', default_value_t = 1)]
        quantity: u32,
    },
    /// Change an extra item's name or quantity
    Set {
        project: String,
        /// Extra ID
        extra: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short = 'n')]
        quantity: Option<u32>,
    },
    /// Remove an extra item
    Remove { project: String, extra: String },
}

#[derive(Subcommand, Debug)]
pub enum MeasurementCommands {
    /// Add a measurement
    Add {
        /// Project ID or short ID
        project: String,
        name: String,
        value: String,
    },
    /// Change a measurement's name or value
    Set {
        project: String,
        /// Measurement ID
        measurement: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        value: Option<String>,
    },
    /// Remove a measurement
    Remove { project: String, measurement: String },
}

#[derive(Subcommand, Debug)]
pub enum EnvCommands {
    /// Add the environment if absent, remove it if present
    Toggle {
        /// Project ID or short ID
        project: String,
        environment: Environment,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImageCommands {
    /// Add a local image (jpg, jpeg, png, webp) to the gallery
    Add {
        /// Project ID or short ID
        project: String,
        path: PathBuf,
    },
    /// Remove an image from the gallery
    Remove {
        project: String,
        /// Image ID
        image: String,
    },
}

fn parse_extra(s: &str) -> std::result::Result<(String, u32), String> {
    match s.rsplit_once(':') {
        Some((name, qty)) => {
            let qty = qty
                .trim()
                .parse()
                .map_err(|_| format!("invalid quantity in '{}' (expected NAME:QUANTITY)", s))?;
            Ok((name.trim().to_string(), qty))
        }
        None => Ok((s.trim().to_string(), 1)),
    }
}

fn parse_measurement(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("invalid measurement '{}' (expected NAME=VALUE)", s))
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("client", "CLIENT", 20),
    ColumnDef::new("seller", "SELLER", 16),
    ColumnDef::new("company", "COMPANY", 8),
    ColumnDef::new("status", "STATUS", 13),
    ColumnDef::new("updated", "UPDATED", 10),
];

pub fn run(app: &mut App, cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::List(args) => run_list(app, args, global),
        ProjectCommands::New(args) => run_new(app, args),
        ProjectCommands::Show(args) => run_show(app, args, global),
        ProjectCommands::Edit(args) => run_edit(app, args),
        ProjectCommands::Delete(args) => run_delete(app, args),
        ProjectCommands::Extra(cmd) => run_extra(app, cmd),
        ProjectCommands::Measurement(cmd) => run_measurement(app, cmd),
        ProjectCommands::Env(cmd) => run_env(app, cmd),
        ProjectCommands::Image(cmd) => run_image(app, cmd, global),
    }
}

pub(crate) fn find<'a>(app: &'a App, reference: &str) -> Result<&'a Project> {
    let id = app.resolve_as::<Project>(reference)?;
    app.store
        .get_project(&id)
        .ok_or_else(|| miette!("No project found matching '{}'", reference))
}

fn existing_client(app: &App, reference: &str) -> Result<EntityId> {
    let id = app.resolve_as::<Client>(reference)?;
    if app.store.get_client(&id).is_none() {
        return Err(miette!("No client found matching '{}'", reference));
    }
    Ok(id)
}

fn existing_seller(app: &App, reference: &str) -> Result<EntityId> {
    let id = app.resolve_as::<Seller>(reference)?;
    if app.store.get_seller(&id).is_none() {
        return Err(miette!("No seller found matching '{}'", reference));
    }
    Ok(id)
}

fn run_list(app: &mut App, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let filter = ProjectFilter {
        search: args.search,
        status: args.status,
        company: args.company,
        client_id: args.client.as_deref().map(|c| app.resolve_as::<Client>(c)).transpose()?,
        seller_id: args.seller.as_deref().map(|s| app.resolve_as::<Seller>(s)).transpose()?,
    };
    list_filtered(app, &filter, args.count, global)
}

/// Render the projects matching `filter`; shared with `client/seller projects`
pub(crate) fn list_filtered(
    app: &mut App,
    filter: &ProjectFilter,
    count: bool,
    global: &GlobalOpts,
) -> Result<()> {
    let format = app.format(global);
    let projects = filter.apply(app.store.projects());

    if count {
        println!("{}", projects.len());
        return Ok(());
    }
    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    app.short_ids.rebuild(Project::KIND, projects.iter().map(|p| &p.id));

    if print_structured(&projects, format)? {
        return Ok(());
    }

    let rows: Vec<TableRow> = projects
        .iter()
        .map(|p| {
            let client = app
                .store
                .get_client(&p.client_id)
                .map_or_else(|| "client not found".to_string(), |c| c.name.clone());
            let seller = app
                .store
                .get_seller(&p.seller_id)
                .map_or_else(|| "seller not found".to_string(), |s| s.name.clone());
            TableRow::new(Project::KIND, &p.id, &app.short_ids)
                .cell("id", CellValue::Text(p.id.to_string()))
                .cell("name", CellValue::Text(p.name.clone()))
                .cell("client", CellValue::Text(client))
                .cell("seller", CellValue::Text(seller))
                .cell("company", CellValue::Text(p.company.to_string()))
                .cell("status", CellValue::Status(p.status))
                .cell("updated", CellValue::Date(p.updated_at.date_naive()))
        })
        .collect();

    TableFormatter::new(COLUMNS, "project")
        .quiet(global.quiet)
        .output(&rows, format)
}

/// Apply command-line fields onto a form, resolving references
fn apply_fields(app: &App, form: &mut ProjectForm, fields: ProjectFields) -> Result<()> {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(ref client) = fields.client {
        form.client_id = Some(existing_client(app, client)?);
    }
    if let Some(company) = fields.company {
        form.company = Some(company);
    }
    if let Some(ref seller) = fields.seller {
        form.seller_id = Some(existing_seller(app, seller)?);
    }
    if let Some(status) = fields.status {
        form.status = status;
    }
    if !fields.environments.is_empty() {
        let mut envs = Vec::new();
        for env in fields.environments {
            if !envs.contains(&env) {
                envs.push(env);
            }
        }
        form.environments = envs;
    }
    if let Some(observations) = fields.observations {
        form.observations = observations;
    }
    if let Some(address) = fields.delivery_address {
        form.delivery_address = address;
    }
    if let Some(appliances) = fields.appliances {
        form.appliances = appliances;
    }
    if fields.measurement_date.is_some() {
        form.measurement_date = fields.measurement_date;
    }
    if fields.measurement_deadline.is_some() {
        form.measurement_deadline = fields.measurement_deadline;
    }
    Ok(())
}

fn run_new(app: &mut App, args: NewArgs) -> Result<()> {
    let mut form = ProjectForm::default();
    apply_fields(app, &mut form, args.fields)?;
    for (name, quantity) in args.extras {
        let idx = form.add_extra();
        form.set_extra_name(idx, name);
        form.set_extra_quantity(idx, quantity);
    }
    for (name, value) in args.measurements {
        form.add_measurement(name, value);
    }
    if args.interactive {
        form = FormWizard::new().project(form, &app.store)?;
    }

    let new = form.into_new_project()?;
    let name = new.name.clone();
    let id = app.store.add_project(new);
    let short_id = app.short_ids.add(Project::KIND, id.clone());

    println!(
        "{} Created project {} {}",
        style("✓").green(),
        style(format!("@{}", short_id)).cyan(),
        style(&id).dim()
    );
    println!("   Name: {}", style(name).yellow());
    Ok(())
}

fn run_show(app: &mut App, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let format = app.format(global);
    let p = find(app, &args.id)?;

    if print_structured(p, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", p.id);
        return Ok(());
    }

    let client = app.store.get_client(&p.client_id).map(|c| c.name.as_str());
    let seller = app.store.get_seller(&p.seller_id).map(|s| s.name.as_str());
    let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());

    field("ID", style(&p.id).cyan());
    field("Name", style(&p.name).yellow());
    field("Client", format!("{} ({})", client.unwrap_or("not found"), p.client_id));
    field("Company", p.company);
    field("Seller", format!("{} ({})", seller.unwrap_or("not found"), p.seller_id));
    field("Status", p.status);
    let envs: Vec<&str> = p.environments.iter().map(|e| e.label()).collect();
    field("Environments", if envs.is_empty() { "-".to_string() } else { envs.join(", ") });
    field("Measurement date", or_dash(date(p.measurement_date).as_deref()));
    field("Measurement deadline", or_dash(date(p.measurement_deadline).as_deref()));
    field("Delivery address", or_dash(p.delivery_address.as_deref()));
    field("Appliances", or_dash(p.appliances.as_deref()));
    field("Observations", or_dash(p.observations.as_deref()));
    field("Created", p.created_at.format("%Y-%m-%d %H:%M"));
    field("Updated", p.updated_at.format("%Y-%m-%d %H:%M"));

    if !p.extras.is_empty() {
        println!();
        println!("{}", style("Extras").bold());
        for e in &p.extras {
            println!("  {:<3} x{:<4} {}", style(&e.id).dim(), e.quantity, e.name);
        }
    }
    if !p.measurements.is_empty() {
        println!();
        println!("{}", style("Measurements").bold());
        for m in &p.measurements {
            println!("  {} {}: {}", style(&m.id).dim(), m.name, m.value);
        }
    }
    if !p.images.is_empty() {
        println!();
        println!("{}", style(format!("Images ({})", p.images.len())).bold());
        for i in &p.images {
            println!("  {} {}", style(&i.id).dim(), i.name);
        }
    }
    if !p.files.is_empty() {
        println!();
        println!("{}", style(format!("Files ({})", p.files.len())).bold());
        for f in &p.files {
            println!(
                "  {} {} ({}, {})",
                style(&f.id).dim(),
                f.name,
                f.file_type,
                format_file_size(f.size)
            );
        }
    }
    Ok(())
}

fn run_edit(app: &mut App, args: EditArgs) -> Result<()> {
    let project = find(app, &args.id)?;
    let id = project.id.clone();
    if args.fields.is_empty() && args.clear.is_empty() && !args.interactive {
        return Err(miette!("Nothing to change; pass field options or --interactive"));
    }

    let mut form = ProjectForm::from_project(project);
    apply_fields(app, &mut form, args.fields)?;
    for field in &args.clear {
        match field {
            ClearableField::Observations => form.observations.clear(),
            ClearableField::DeliveryAddress => form.delivery_address.clear(),
            ClearableField::Appliances => form.appliances.clear(),
            ClearableField::MeasurementDate => form.measurement_date = None,
            ClearableField::MeasurementDeadline => form.measurement_deadline = None,
        }
    }
    if args.interactive {
        form = FormWizard::new().project(form, &app.store)?;
    }

    app.store.update_project(&id, form.into_update()?);
    println!("{} Updated project {}", style("✓").green(), style(&id).cyan());
    Ok(())
}

fn run_delete(app: &mut App, args: DeleteArgs) -> Result<()> {
    let project = find(app, &args.id)?;
    let id = project.id.clone();
    let prompt = format!("Delete project '{}'?", project.name);

    if !confirm(&prompt, args.yes)? {
        return Ok(());
    }

    app.store.delete_project(&id);
    println!("{} Deleted project {}", style("✓").green(), style(&id).cyan());
    Ok(())
}

/// Load a project's form, let `change` edit it, and submit the result
fn edit_form<T>(
    app: &mut App,
    reference: &str,
    change: impl FnOnce(&mut ProjectForm) -> Result<T>,
) -> Result<(EntityId, T)> {
    let project = find(app, reference)?;
    let id = project.id.clone();
    let mut form = ProjectForm::from_project(project);
    let out = change(&mut form)?;
    app.store.update_project(&id, form.into_update()?);
    Ok((id, out))
}

fn position_of<T>(items: &[T], id: &str, key: impl Fn(&T) -> &EntityId, what: &str) -> Result<usize> {
    items
        .iter()
        .position(|item| key(item) == id.trim())
        .ok_or_else(|| miette!("No {} '{}' on this project", what, id))
}

/// A given row name must not be blank; blank rows are dropped on submit
fn require_name(name: Option<&str>, what: &str) -> Result<()> {
    match name {
        Some(n) if n.trim().is_empty() => Err(miette!("{} name must not be blank", what)),
        _ => Ok(()),
    }
}

fn run_extra(app: &mut App, cmd: ExtraCommands) -> Result<()> {
    match cmd {
        ExtraCommands::Add { project, name, quantity } => {
            require_name(Some(name.as_str()), "Extra")?;
            let (_, extra_id) = edit_form(app, &project, |form| {
                let idx = form.add_extra();
                form.set_extra_name(idx, name.trim());
                form.set_extra_quantity(idx, quantity);
                Ok(form.extras[idx].id.clone())
            })?;
            println!("{} Added extra {}", style("✓").green(), style(extra_id).cyan());
        }
        ExtraCommands::Set { project, extra, name, quantity } => {
            require_name(name.as_deref(), "Extra")?;
            edit_form(app, &project, |form| {
                let idx = position_of(&form.extras, &extra, |e| &e.id, "extra")?;
                if let Some(name) = name {
                    form.set_extra_name(idx, name);
                }
                if let Some(quantity) = quantity {
                    form.set_extra_quantity(idx, quantity);
                }
                Ok(())
            })?;
            println!("{} Updated extra {}", style("✓").green(), style(extra).cyan());
        }
        ExtraCommands::Remove { project, extra } => {
            edit_form(app, &project, |form| {
                let idx = position_of(&form.extras, &extra, |e| &e.id, "extra")?;
                form.remove_extra(idx);
                Ok(())
            })?;
            println!("{} Removed extra {}", style("✓").green(), style(extra).cyan());
        }
    }
    Ok(())
}

fn run_measurement(app: &mut App, cmd: MeasurementCommands) -> Result<()> {
    match cmd {
        MeasurementCommands::Add { project, name, value } => {
            require_name(Some(name.as_str()), "Measurement")?;
            let (_, mea_id) = edit_form(app, &project, |form| {
                let idx = form.add_measurement(name.trim(), value.trim());
                Ok(form.measurements[idx].id.clone())
            })?;
            println!("{} Added measurement {}", style("✓").green(), style(mea_id).cyan());
        }
        MeasurementCommands::Set { project, measurement, name, value } => {
            require_name(name.as_deref(), "Measurement")?;
            edit_form(app, &project, |form| {
                let idx = position_of(&form.measurements, &measurement, |m| &m.id, "measurement")?;
                form.set_measurement(idx, name, value);
                Ok(())
            })?;
            println!("{} Updated measurement {}", style("✓").green(), style(measurement).cyan());
        }
        MeasurementCommands::Remove { project, measurement } => {
            edit_form(app, &project, |form| {
                let idx = position_of(&form.measurements, &measurement, |m| &m.id, "measurement")?;
                form.remove_measurement(idx);
                Ok(())
            })?;
            println!("{} Removed measurement {}", style("✓").green(), style(measurement).cyan());
        }
    }
    Ok(())
}

fn run_env(app: &mut App, cmd: EnvCommands) -> Result<()> {
    match cmd {
        EnvCommands::Toggle { project, environment } => {
            let (_, on) = edit_form(app, &project, |form| {
                form.toggle_environment(environment);
                Ok(form.environments.contains(&environment))
            })?;
            let state = if on { style("on").green() } else { style("off").dim() };
            println!("{} {} {}", style("✓").green(), environment, state);
        }
    }
    Ok(())
}

fn run_image(app: &mut App, cmd: ImageCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ImageCommands::Add { project, path } => {
            let id = find(app, &project)?.id.clone();
            let image_id = attachments::add_image(&mut app.store, &id, &path)?;
            if !global.quiet {
                println!("{} Added image {}", style("✓").green(), style(image_id).cyan());
            }
        }
        ImageCommands::Remove { project, image } => {
            let id = find(app, &project)?.id.clone();
            let image_id = app.resolve_kind(ProjectImage::KIND, &image)?;
            let removed = attachments::remove_image(&mut app.store, &id, &image_id)?;
            println!("{} Removed image {}", style("✓").green(), style(removed.name).cyan());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra() {
        assert_eq!(parse_extra("Puxadores:12"), Ok(("Puxadores".to_string(), 12)));
        assert_eq!(parse_extra("Bancada"), Ok(("Bancada".to_string(), 1)));
        assert!(parse_extra("LED:muitos").is_err());
    }

    #[test]
    fn test_require_name() {
        assert!(require_name(None, "Extra").is_ok());
        assert!(require_name(Some("Espelho"), "Extra").is_ok());
        let err = require_name(Some("  "), "Extra").unwrap_err();
        assert_eq!(err.to_string(), "Extra name must not be blank");
    }

    #[test]
    fn test_parse_measurement() {
        assert_eq!(
            parse_measurement("Parede A = 3,20 m"),
            Ok(("Parede A".to_string(), "3,20 m".to_string()))
        );
        assert!(parse_measurement("sem valor").is_err());
    }
}
