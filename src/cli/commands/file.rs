//! `obra file` command - Project file attachments

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::helpers::confirm;
use crate::cli::output::print_structured;
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{App, GlobalOpts};
use crate::core::attachments;
use crate::core::progress;
use crate::core::query::{FileListView, FileSortField, SortDirection};
use crate::entities::file::{format_file_size, ProjectFile};

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// List a project's files
    List(ListArgs),

    /// Attach local files to a project
    Attach(AttachArgs),

    /// Rename an attached file
    Rename(RenameArgs),

    /// Remove an attached file
    Remove(RemoveArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name,
    Type,
    UploadedAt,
}

impl From<SortBy> for FileSortField {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Name => FileSortField::Name,
            SortBy::Type => FileSortField::Type,
            SortBy::UploadedAt => FileSortField::UploadedAt,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Project ID or short ID (@N)
    pub project: String,

    /// Search in file name
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort field (default: uploaded-at, newest first); naming the
    /// current field again flips the direction
    #[arg(long)]
    pub sort: Option<SortBy>,

    /// Ascending order
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,

    /// Descending order
    #[arg(long)]
    pub desc: bool,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct AttachArgs {
    /// Project ID or short ID (@N)
    pub project: String,

    /// Files to attach (pdf, jpg, jpeg, png, webp, doc, docx, xls, xlsx, zip, rar)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Skip the upload progress display
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    /// Project ID or short ID (@N)
    pub project: String,

    /// File ID or short ID (@N)
    pub file: String,

    /// New display name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Project ID or short ID (@N)
    pub project: String,

    /// File ID or short ID (@N)
    pub file: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("type", "TYPE", 11),
    ColumnDef::new("size", "SIZE", 9),
    ColumnDef::new("preview", "PREVIEW", 7),
    ColumnDef::new("uploaded_at", "UPLOADED", 16),
    ColumnDef::new("uploaded_by", "BY", 14),
];

pub fn run(app: &mut App, cmd: FileCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        FileCommands::List(args) => run_list(app, args, global),
        FileCommands::Attach(args) => run_attach(app, args, global),
        FileCommands::Rename(args) => run_rename(app, args),
        FileCommands::Remove(args) => run_remove(app, args),
    }
}

/// Next view of a project's file list: the sort carries over from the
/// previous listing, the search does not
fn view_from_args(previous: FileListView, args: &ListArgs) -> FileListView {
    let mut view = FileListView {
        search: args.search.clone().unwrap_or_default(),
        ..previous
    };
    if let Some(sort) = args.sort {
        view.select_field(sort.into());
    }
    if args.asc {
        view.direction = SortDirection::Asc;
    } else if args.desc {
        view.direction = SortDirection::Desc;
    }
    view
}

fn run_list(app: &mut App, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let format = app.format(global);
    let project_id = super::project::find(app, &args.project)?.id.clone();
    let previous = app.file_views.get(&project_id).cloned().unwrap_or_default();
    let view = view_from_args(previous, &args);
    app.file_views.insert(project_id.clone(), view.clone());

    let project = super::project::find(app, project_id.as_str())?;
    let files: Vec<&ProjectFile> = view.apply(&project.files);

    if args.count {
        println!("{}", files.len());
        return Ok(());
    }
    if files.is_empty() {
        println!("No files found.");
        return Ok(());
    }

    let ids: Vec<_> = files.iter().map(|f| f.id.clone()).collect();
    let rows_source: Vec<ProjectFile> = files.into_iter().cloned().collect();
    app.short_ids.rebuild(ProjectFile::KIND, &ids);

    if print_structured(&rows_source, format)? {
        return Ok(());
    }

    let rows: Vec<TableRow> = rows_source
        .iter()
        .map(|f| {
            TableRow::new(ProjectFile::KIND, &f.id, &app.short_ids)
                .cell("id", CellValue::Text(f.id.to_string()))
                .cell("name", CellValue::Text(f.name.clone()))
                .cell("type", CellValue::Text(f.file_type.to_string()))
                .cell("size", CellValue::Text(format_file_size(f.size)))
                .cell(
                    "preview",
                    CellValue::Text(if f.file_type.can_preview() { "yes" } else { "-" }.to_string()),
                )
                .cell("uploaded_at", CellValue::DateTime(f.uploaded_at))
                .cell("uploaded_by", CellValue::Text(f.uploaded_by.clone()))
        })
        .collect();

    debug!(project = %project_id, files = rows.len(), "listed files");
    TableFormatter::new(COLUMNS, "file")
        .quiet(global.quiet)
        .output(&rows, format)
}

fn run_attach(app: &mut App, args: AttachArgs, global: &GlobalOpts) -> Result<()> {
    let project_id = super::project::find(app, &args.project)?.id.clone();
    let user = app.config.user();
    let now = app.store.now();

    // Every path is checked before anything is attached
    let files = args
        .paths
        .iter()
        .map(|p| attachments::intake(p, &user, now))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let summary: Vec<(String, u64)> = files.iter().map(|f| (f.name.clone(), f.size)).collect();
    let count = attachments::attach_files(&mut app.store, &project_id, files)?;

    if !global.quiet && !args.no_progress {
        progress::run(&format!("Uploading {} file(s)", count), progress::random_duration());
    }

    if !global.quiet {
        for (name, size) in summary {
            println!(
                "{} Attached {} ({})",
                style("✓").green(),
                style(name).cyan(),
                format_file_size(size)
            );
        }
    }
    Ok(())
}

fn run_rename(app: &mut App, args: RenameArgs) -> Result<()> {
    let project_id = super::project::find(app, &args.project)?.id.clone();
    let file_id = app.resolve_kind(ProjectFile::KIND, &args.file)?;
    attachments::rename_file(&mut app.store, &project_id, &file_id, &args.name)?;
    println!(
        "{} Renamed file {} to {}",
        style("✓").green(),
        style(&file_id).dim(),
        style(args.name.trim()).cyan()
    );
    Ok(())
}

fn run_remove(app: &mut App, args: RemoveArgs) -> Result<()> {
    let project = super::project::find(app, &args.project)?;
    let project_id = project.id.clone();
    let file_id = app.resolve_kind(ProjectFile::KIND, &args.file)?;
    let name = project
        .file(&file_id)
        .map(|f| f.name.clone())
        .unwrap_or_else(|| file_id.to_string());

    if !confirm(&format!("Remove file '{}'?", name), args.yes)? {
        return Ok(());
    }

    let removed = attachments::remove_file(&mut app.store, &project_id, &file_id)?;
    println!("{} Removed file {}", style("✓").green(), style(removed.name).cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_args(sort: Option<SortBy>, asc: bool, desc: bool) -> ListArgs {
        ListArgs {
            project: "1".to_string(),
            search: None,
            sort,
            asc,
            desc,
            count: false,
        }
    }

    #[test]
    fn test_first_view_defaults_per_field() {
        let view = view_from_args(FileListView::default(), &list_args(None, false, false));
        assert_eq!(view.field, FileSortField::UploadedAt);
        assert_eq!(view.direction, SortDirection::Desc);

        let view = view_from_args(FileListView::default(), &list_args(Some(SortBy::Name), false, false));
        assert_eq!(view.field, FileSortField::Name);
        assert_eq!(view.direction, SortDirection::Asc);
    }

    #[test]
    fn test_repeating_sort_field_flips_direction() {
        let first = view_from_args(FileListView::default(), &list_args(Some(SortBy::Name), false, false));
        let second = view_from_args(first.clone(), &list_args(Some(SortBy::Name), false, false));
        assert_eq!(second.direction, SortDirection::Desc);

        // No --sort keeps the previous ordering
        let third = view_from_args(second.clone(), &list_args(None, false, false));
        assert_eq!(third, second);

        let other = view_from_args(second, &list_args(Some(SortBy::Type), false, false));
        assert_eq!(other.field, FileSortField::Type);
        assert_eq!(other.direction, SortDirection::Desc);
    }

    #[test]
    fn test_explicit_direction_wins() {
        let view = view_from_args(FileListView::default(), &list_args(Some(SortBy::Name), false, true));
        assert_eq!(view.direction, SortDirection::Desc);
        let view = view_from_args(view, &list_args(Some(SortBy::Name), true, false));
        assert_eq!(view.direction, SortDirection::Asc);
    }

    #[test]
    fn test_search_does_not_carry_over() {
        let previous = FileListView {
            search: "planta".to_string(),
            ..FileListView::default()
        };
        let view = view_from_args(previous, &list_args(None, false, false));
        assert_eq!(view.search, "");
    }
}
