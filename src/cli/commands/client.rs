//! `obra client` command - Client management

use clap::Subcommand;
use console::style;
use miette::{miette, Result};

use crate::cli::helpers::{confirm, or_dash};
use crate::cli::output::{field, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::wizard::FormWizard;
use crate::cli::{App, GlobalOpts, OutputFormat};
use crate::core::forms::ClientForm;
use crate::core::query::search_clients;
use crate::core::entity::Entity;
use crate::entities::client::Client;

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// List clients
    List(ListArgs),

    /// Create a new client
    New(NewArgs),

    /// Show a client's details
    Show(ShowArgs),

    /// Edit a client
    Edit(EditArgs),

    /// Delete a client (their projects are kept)
    Delete(DeleteArgs),

    /// List the projects of a client
    Projects(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name and email
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct NewArgs {
    /// Full name (required)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Phone (required)
    #[arg(long, short = 'p')]
    pub phone: Option<String>,

    /// Email (required)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Postal address
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Client ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Client ID or short ID (@N)
    pub id: String,

    #[command(flatten)]
    pub fields: NewArgs,

    /// Remove the stored address
    #[arg(long, conflicts_with = "address")]
    pub clear_address: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Client ID or short ID (@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("phone", "PHONE", 18),
    ColumnDef::new("email", "EMAIL", 28),
    ColumnDef::new("projects", "PROJECTS", 8),
];

pub fn run(app: &mut App, cmd: ClientCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ClientCommands::List(args) => run_list(app, args, global),
        ClientCommands::New(args) => run_new(app, args),
        ClientCommands::Show(args) => run_show(app, args, global),
        ClientCommands::Edit(args) => run_edit(app, args),
        ClientCommands::Delete(args) => run_delete(app, args),
        ClientCommands::Projects(args) => run_projects(app, args, global),
    }
}

fn find<'a>(app: &'a App, reference: &str) -> Result<&'a Client> {
    let id = app.resolve_as::<Client>(reference)?;
    app.store
        .get_client(&id)
        .ok_or_else(|| miette!("No client found matching '{}'", reference))
}

fn run_list(app: &mut App, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let format = app.format(global);
    let clients: Vec<&Client> = match args.search {
        Some(ref term) => search_clients(app.store.clients(), term),
        None => app.store.clients().iter().collect(),
    };

    if args.count {
        println!("{}", clients.len());
        return Ok(());
    }

    if clients.is_empty() {
        println!("No clients found.");
        return Ok(());
    }

    app.short_ids.rebuild(Client::KIND, clients.iter().map(|c| &c.id));

    if print_structured(&clients, format)? {
        return Ok(());
    }

    let rows: Vec<TableRow> = clients
        .iter()
        .map(|c| {
            TableRow::new(Client::KIND, &c.id, &app.short_ids)
                .cell("id", CellValue::Text(c.id.to_string()))
                .cell("name", CellValue::Text(c.name.clone()))
                .cell("phone", CellValue::Text(c.phone.clone()))
                .cell("email", CellValue::Text(c.email.clone()))
                .cell(
                    "projects",
                    CellValue::Number(app.store.projects_by_client(&c.id).len() as u64),
                )
        })
        .collect();

    TableFormatter::new(COLUMNS, "client")
        .quiet(global.quiet)
        .output(&rows, format)
}

fn form_from_args(mut form: ClientForm, args: &NewArgs) -> ClientForm {
    if let Some(ref name) = args.name {
        form.name = name.clone();
    }
    if let Some(ref phone) = args.phone {
        form.phone = phone.clone();
    }
    if let Some(ref email) = args.email {
        form.email = email.clone();
    }
    if let Some(ref address) = args.address {
        form.address = address.clone();
    }
    form
}

fn run_new(app: &mut App, args: NewArgs) -> Result<()> {
    let mut form = form_from_args(ClientForm::default(), &args);
    if args.interactive {
        form = FormWizard::new().client(form)?;
    }

    let new = form.into_new()?;
    let name = new.name.clone();
    let id = app.store.add_client(new);
    let short_id = app.short_ids.add(Client::KIND, id.clone());

    println!(
        "{} Created client {} {}",
        style("✓").green(),
        style(format!("@{}", short_id)).cyan(),
        style(&id).dim()
    );
    println!("   Name: {}", style(name).yellow());
    Ok(())
}

fn run_show(app: &mut App, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let format = app.format(global);
    let client = find(app, &args.id)?;

    if print_structured(client, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", client.id);
        return Ok(());
    }

    field("ID", style(&client.id).cyan());
    field("Name", style(&client.name).yellow());
    field("Phone", &client.phone);
    field("Email", &client.email);
    field("Address", or_dash(client.address.as_deref()));
    field("Created", client.created_at.format("%Y-%m-%d"));

    let projects = app.store.projects_by_client(&client.id);
    field("Projects", projects.len());
    for p in projects {
        println!("  {} {} ({})", style("•").dim(), p.name, p.status);
    }
    Ok(())
}

fn run_edit(app: &mut App, args: EditArgs) -> Result<()> {
    let client = find(app, &args.id)?;
    let id = client.id.clone();
    let f = &args.fields;
    let any_field = f.name.is_some() || f.phone.is_some() || f.email.is_some() || f.address.is_some();
    if !any_field && !args.clear_address && !f.interactive {
        return Err(miette!("Nothing to change; pass field options or --interactive"));
    }

    let mut form = form_from_args(ClientForm::from_client(client), f);
    if args.clear_address {
        form.address.clear();
    }
    if f.interactive {
        form = FormWizard::new().client(form)?;
    }

    let update = form.into_update()?;
    app.store.update_client(&id, update);
    println!("{} Updated client {}", style("✓").green(), style(&id).cyan());
    Ok(())
}

fn run_delete(app: &mut App, args: DeleteArgs) -> Result<()> {
    let client = find(app, &args.id)?;
    let id = client.id.clone();
    let prompt = format!("Delete client '{}'?", client.name);

    if !confirm(&prompt, args.yes)? {
        return Ok(());
    }

    app.store.delete_client(&id);
    println!("{} Deleted client {}", style("✓").green(), style(&id).cyan());

    let orphaned = app.store.projects_by_client(&id).len();
    if orphaned > 0 {
        println!(
            "{} {} project(s) still reference this client",
            style("!").yellow(),
            orphaned
        );
    }
    Ok(())
}

fn run_projects(app: &mut App, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let client = find(app, &args.id)?;
    let filter = crate::core::query::ProjectFilter {
        client_id: Some(client.id.clone()),
        ..Default::default()
    };
    crate::cli::commands::project::list_filtered(app, &filter, false, global)
}
