use clap::Parser;
use miette::Result;
use mstudy::cli::commands;
use mstudy::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so `mstudy ... | head` exits quietly.
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
    let global = cli.global;
    mstudy::logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Overview(args) => commands::overview::run(args, &global),
        Commands::Project(args) => commands::project::run(args, &global),
        Commands::Inquiry(args) => commands::inquiry::run(args, &global),
        Commands::Suppliers(args) => commands::suppliers::run(args, &global),
        Commands::Critical(args) => commands::critical::run(args, &global),
        Commands::Readiness(args) => commands::readiness::run(args, &global),
        Commands::Push(args) => commands::push::run(args, &global),
        Commands::Config(cmd) => commands::config::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
