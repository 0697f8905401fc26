use clap::Parser;
use miette::Result;
use obra::cli::{logging, App, Cli};
use obra::core::{Config, EntityStore};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    logging::init(&cli.global);

    let mut app = App::new(EntityStore::seeded(), Config::load());
    app.run(cli.command, &cli.global)
}
