//! Application context shared by every command
//!
//! Owns the store, the loaded configuration, and the session's short-ID
//! index. One-shot runs build it once in `main`; the shell keeps the same
//! value alive for the whole session.

use clap::ValueEnum;
use miette::{miette, Result};
use std::collections::HashMap;

use crate::cli::commands;
use crate::cli::{Commands, GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::core::query::FileListView;
use crate::core::shortid::ShortIdIndex;
use crate::core::store::EntityStore;

#[derive(Debug)]
pub struct App {
    pub store: EntityStore,
    pub config: Config,
    pub short_ids: ShortIdIndex,
    /// Per-project file list sort, kept across listings in a session
    pub file_views: HashMap<EntityId, FileListView>,
    in_shell: bool,
}

impl App {
    pub fn new(store: EntityStore, config: Config) -> Self {
        Self {
            store,
            config,
            short_ids: ShortIdIndex::new(),
            file_views: HashMap::new(),
            in_shell: false,
        }
    }

    pub fn in_shell(&self) -> bool {
        self.in_shell
    }

    pub(crate) fn set_in_shell(&mut self, value: bool) {
        self.in_shell = value;
    }

    /// Effective output format: the flag, else the configured default
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        if global.format != OutputFormat::Auto {
            return global.format;
        }
        self.config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }

    /// Turn a user reference (`@N` or a full ID) into an ID of `kind`
    ///
    /// An `@N` listed as another kind is rejected.
    pub fn resolve_kind(&self, kind: &'static str, reference: &str) -> Result<EntityId> {
        EntityId::parse(reference).map_err(|e| miette!("{}", e))?;
        self.short_ids
            .resolve(kind, reference)
            .map_err(|e| miette!("{}", e))
    }

    pub fn resolve_as<E: Entity>(&self, reference: &str) -> Result<EntityId> {
        self.resolve_kind(E::KIND, reference)
    }

    pub fn run(&mut self, command: Commands, global: &GlobalOpts) -> Result<()> {
        match command {
            Commands::Client(cmd) => commands::client::run(self, cmd, global),
            Commands::Seller(cmd) => commands::seller::run(self, cmd, global),
            Commands::Project(cmd) => commands::project::run(self, cmd, global),
            Commands::File(cmd) => commands::file::run(self, cmd, global),
            Commands::Dashboard(args) => commands::dashboard::run(self, args, global),
            Commands::Shell(args) => commands::shell::run(self, args, global),
            Commands::Completions(args) => commands::completions::run(args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Client, Project, ProjectFile};

    fn app() -> App {
        App::new(EntityStore::seeded(), Config::default())
    }

    #[test]
    fn test_format_falls_back_to_config() {
        let mut app = app();
        let global = GlobalOpts::default();
        assert_eq!(app.format(&global), OutputFormat::Auto);

        app.config.default_format = Some("JSON".to_string());
        assert_eq!(app.format(&global), OutputFormat::Json);

        let explicit = GlobalOpts {
            format: OutputFormat::Yaml,
            ..Default::default()
        };
        assert_eq!(app.format(&explicit), OutputFormat::Yaml);
    }

    #[test]
    fn test_resolve() {
        let mut app = app();
        assert_eq!(app.resolve_as::<Client>("2").unwrap(), EntityId::from("2"));
        assert!(app.resolve_as::<Client>("  ").is_err());
        assert!(app.resolve_as::<Client>("@1").is_err());

        let ids: Vec<EntityId> = app.store.clients().iter().map(|c| c.id.clone()).collect();
        app.short_ids.rebuild(Client::KIND, &ids);
        assert_eq!(app.resolve_as::<Client>("@3").unwrap(), EntityId::from("3"));
    }

    #[test]
    fn test_resolve_rejects_alias_of_other_kind() {
        let mut app = app();
        app.short_ids.rebuild(Client::KIND, [&EntityId::from("3")]);

        let err = app.resolve_as::<Project>("@1").unwrap_err();
        assert_eq!(err.to_string(), "@1 refers to a client, not a project");
        assert!(app.resolve_kind(ProjectFile::KIND, "@1").is_err());
        assert_eq!(app.resolve_as::<Project>("3").unwrap(), EntityId::from("3"));
    }
}
