use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use yatube::{app, db, AppState, Config};

#[derive(Parser)]
#[command(name = "yatube", about = "Yatube blog server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site (the default)
    Serve,
    /// Create a group posts can be filed under
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatube=debug,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let db_pool = db::connect(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let addr = config.bind_addr();
            let app = app(AppState::new(db_pool, config));

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("yatube listening on {addr}");
            axum::serve(listener, app).await?;
        }
        Command::CreateGroup { title, slug, description } => {
            if title.trim().is_empty() || slug.trim().is_empty() {
                bail!("a group needs a title and a slug");
            }
            match db::groups::create_group(&db_pool, &title, &slug, &description).await? {
                Some(group) => info!("created group #{} /group/{}/", group.id, group.slug),
                None => bail!("a group with slug {slug:?} already exists"),
            }
        }
    }

    Ok(())
}
