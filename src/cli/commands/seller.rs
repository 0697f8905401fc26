//! `obra seller` command - Seller management

use clap::Subcommand;
use console::style;
use miette::{miette, Result};

use crate::cli::helpers::{confirm, or_dash};
use crate::cli::output::{field, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::wizard::FormWizard;
use crate::cli::{App, GlobalOpts, OutputFormat};
use crate::core::forms::SellerForm;
use crate::core::query::{search_sellers, ProjectFilter};
use crate::core::entity::Entity;
use crate::entities::seller::Seller;

#[derive(Subcommand, Debug)]
pub enum SellerCommands {
    /// List sellers
    List(ListArgs),

    /// Create a new seller
    New(NewArgs),

    /// Show a seller's details
    Show(ShowArgs),

    /// Edit a seller
    Edit(EditArgs),

    /// Delete a seller (their projects are kept)
    Delete(DeleteArgs),

    /// List the projects a seller is responsible for
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

    /// Email (required)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Phone
    #[arg(long, short = 'p')]
    pub phone: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Seller ID or short ID (@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Seller ID or short ID (@N)
    pub id: String,

    #[command(flatten)]
    pub fields: NewArgs,

    /// Remove the stored phone
    #[arg(long, conflicts_with = "phone")]
    pub clear_phone: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Seller ID or short ID (@N)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("email", "EMAIL", 28),
    ColumnDef::new("phone", "PHONE", 18),
    ColumnDef::new("projects", "PROJECTS", 8),
];

pub fn run(app: &mut App, cmd: SellerCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SellerCommands::List(args) => run_list(app, args, global),
        SellerCommands::New(args) => run_new(app, args),
        SellerCommands::Show(args) => run_show(app, args, global),
        SellerCommands::Edit(args) => run_edit(app, args),
        SellerCommands::Delete(args) => run_delete(app, args),
        SellerCommands::Projects(args) => {
            let seller = find(app, &args.id)?;
            let filter = ProjectFilter {
                seller_id: Some(seller.id.clone()),
                ..Default::default()
            };
            crate::cli::commands::project::list_filtered(app, &filter, false, global)
        }
    }
}

fn find<'a>(app: &'a App, reference: &str) -> Result<&'a Seller> {
    let id = app.resolve_as::<Seller>(reference)?;
    app.store
        .get_seller(&id)
        .ok_or_else(|| miette!("No seller found matching '{}'", reference))
}

fn run_list(app: &mut App, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let format = app.format(global);
    let sellers: Vec<&Seller> = match args.search {
        Some(ref term) => search_sellers(app.store.sellers(), term),
        None => app.store.sellers().iter().collect(),
    };

    if args.count {
        println!("{}", sellers.len());
        return Ok(());
    }
    if sellers.is_empty() {
        println!("No sellers found.");
        return Ok(());
    }

    app.short_ids.rebuild(Seller::KIND, sellers.iter().map(|s| &s.id));

    if print_structured(&sellers, format)? {
        return Ok(());
    }

    let rows: Vec<TableRow> = sellers
        .iter()
        .map(|s| {
            TableRow::new(Seller::KIND, &s.id, &app.short_ids)
                .cell("id", CellValue::Text(s.id.to_string()))
                .cell("name", CellValue::Text(s.name.clone()))
                .cell("email", CellValue::Text(s.email.clone()))
                .cell("phone", CellValue::Maybe(s.phone.clone()))
                .cell(
                    "projects",
                    CellValue::Number(app.store.projects_by_seller(&s.id).len() as u64),
                )
        })
        .collect();

    TableFormatter::new(COLUMNS, "seller")
        .quiet(global.quiet)
        .output(&rows, format)
}

fn form_from_args(mut form: SellerForm, args: &NewArgs) -> SellerForm {
    if let Some(ref name) = args.name {
        form.name = name.clone();
    }
    if let Some(ref email) = args.email {
        form.email = email.clone();
    }
    if let Some(ref phone) = args.phone {
        form.phone = phone.clone();
    }
    form
}

fn run_new(app: &mut App, args: NewArgs) -> Result<()> {
    let mut form = form_from_args(SellerForm::default(), &args);
    if args.interactive {
        form = FormWizard::new().seller(form)?;
    }

    let new = form.into_new()?;
    let name = new.name.clone();
    let id = app.store.add_seller(new);
    let short_id = app.short_ids.add(Seller::KIND, id.clone());

    println!(
        "{} Created seller {} {}",
        style("✓").green(),
        style(format!("@{}", short_id)).cyan(),
        style(&id).dim()
    );
    println!("   Name: {}", style(name).yellow());
    Ok(())
}

fn run_show(app: &mut App, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let format = app.format(global);
    let seller = find(app, &args.id)?;

    if print_structured(seller, format)? {
        return Ok(());
    }
    if format == OutputFormat::Id {
        println!("{}", seller.id);
        return Ok(());
    }

    field("ID", style(&seller.id).cyan());
    field("Name", style(&seller.name).yellow());
    field("Email", &seller.email);
    field("Phone", or_dash(seller.phone.as_deref()));
    field("Projects", app.store.projects_by_seller(&seller.id).len());
    Ok(())
}

fn run_edit(app: &mut App, args: EditArgs) -> Result<()> {
    let seller = find(app, &args.id)?;
    let id = seller.id.clone();
    let f = &args.fields;
    if f.name.is_none() && f.email.is_none() && f.phone.is_none() && !args.clear_phone && !f.interactive {
        return Err(miette!("Nothing to change; pass field options or --interactive"));
    }

    let mut form = form_from_args(SellerForm::from_seller(seller), f);
    if args.clear_phone {
        form.phone.clear();
    }
    if f.interactive {
        form = FormWizard::new().seller(form)?;
    }

    app.store.update_seller(&id, form.into_update()?);
    println!("{} Updated seller {}", style("✓").green(), style(&id).cyan());
    Ok(())
}

fn run_delete(app: &mut App, args: DeleteArgs) -> Result<()> {
    let seller = find(app, &args.id)?;
    let id = seller.id.clone();
    let prompt = format!("Delete seller '{}'?", seller.name);

    if !confirm(&prompt, args.yes)? {
        return Ok(());
    }

    app.store.delete_seller(&id);
    println!("{} Deleted seller {}", style("✓").green(), style(&id).cyan());

    let orphaned = app.store.projects_by_seller(&id).len();
    if orphaned > 0 {
        println!(
            "{} {} project(s) still reference this seller",
            style("!").yellow(),
            orphaned
        );
    }
    Ok(())
}
