use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lectern::app::AppContext;
use lectern::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `show` and `meta` output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New(args) => {
            commands::new_article(&args)?;
        }
        Commands::Show { path, title } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let ctx = AppContext::new(&config, cli.base)?;
            commands::show(&ctx, &path, title).await?;
        }
        Commands::Meta { path, json } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let ctx = AppContext::new(&config, cli.base)?;
            commands::meta(&ctx, &path, json).await?;
        }
        Commands::Tui { paths } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let ctx = AppContext::new(&config, cli.base)?;
            let mut articles = ctx.library.articles.clone();
            articles.extend(paths.iter().map(|p| commands::source_for(p)));
            lectern::tui::run(Arc::new(ctx), Arc::new(config), articles).await?;
        }
    }

    Ok(())
}
