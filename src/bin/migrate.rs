//! Applies or reverts the schema migrations in `./migrations`.
//!
//! ```text
//! migrate [--path <dir>] up|down|version
//! ```

use std::path::PathBuf;

use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

const USAGE: &str = "usage: migrate [--path <dir>] up|down|version";

struct Args {
    path: PathBuf,
    command: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut path = PathBuf::from("./migrations");
    let mut command = None;
    while let Some(arg) = args.next() {
        if arg == "--path" || arg == "-path" {
            path = args.next().context("--path requires a value")?.into();
        } else if command.is_none() {
            command = Some(arg);
        } else {
            anyhow::bail!("unexpected argument {arg:?}\n{USAGE}");
        }
    }
    Ok(Args { path, command })
}

async fn latest_version(db: &PgPool) -> anyhow::Result<Option<(i64, bool)>> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = '_sqlx_migrations')",
    )
    .fetch_one(db)
    .await?;
    if !exists {
        return Ok(None);
    }

    let row = sqlx::query_as::<_, (i64, bool)>(
        "SELECT version, success FROM _sqlx_migrations ORDER BY version DESC LIMIT 1",
    )
    .fetch_optional(db)
    .await?;
    Ok(row)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".to_string()),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let Some(command) = args.command else {
        println!("{USAGE}");
        return Ok(());
    };
    if !matches!(command.as_str(), "up" | "down" | "version") {
        println!("{USAGE}");
        return Ok(());
    }

    let dsn = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let db = PgPoolOptions::new()
        .max_connections(1)
        .connect(&dsn)
        .await
        .context("connect to database")?;

    let migrator = Migrator::new(args.path.as_path())
        .await
        .with_context(|| format!("load migrations from {}", args.path.display()))?;

    match command.as_str() {
        "up" => {
            migrator.run(&db).await?;
            println!("Up success");
        }
        "down" => {
            migrator.undo(&db, 0).await?;
            println!("Down success");
        }
        _ => match latest_version(&db).await? {
            Some((version, success)) => println!("Version: {version} (dirty: {})", !success),
            None => println!("Version: none"),
        },
    }

    tracing::debug!(command = %command, "migrate finished");
    Ok(())
}
