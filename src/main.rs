use anyhow::{bail, Context};
use clap::{arg, Command};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use reins_cache::summary::{line_summary, location_summary};
use reins_cache::{
    CacheStats, DatabaseConfig, Environment, LineCache, LocationCache, MetadataStore, Migrator,
};

fn cli() -> Command {
    Command::new("REINS cache")
        .about("Maintains the location and line option caches used by the REINS search")
        .subcommand_required(true)
        .arg(arg!(--db <DATABASE_URI> "database URI, overrides the environment default"))
        .arg(arg!(--env <ENV> "development, production or test").default_value("development"))
        .subcommand(Command::new("migrate").about("Apply pending migrations"))
        .subcommand(Command::new("rollback").about("Revert the last applied migration"))
        .subcommand(Command::new("refresh").about("Revert all migrations, then apply them again"))
        .subcommand(Command::new("status").about("Show migration status"))
        .subcommand(Command::new("stats").about("Count cached locations and lines"))
        .subcommand(
            Command::new("summary")
                .about("Print the cached options of a prefecture")
                .arg(arg!(<KIND> "locations or lines"))
                .arg(arg!(<PREFECTURE>)),
        )
        .subcommand(
            Command::new("meta")
                .about("Read or write metadata entries")
                .subcommand_required(true)
                .subcommand(Command::new("get").arg(arg!(<KEY>)))
                .subcommand(Command::new("set").arg(arg!(<KEY>)).arg(arg!(<VALUE>)))
                .subcommand(Command::new("delete").arg(arg!(<KEY>))),
        )
}

async fn connect(matches: &clap::ArgMatches) -> anyhow::Result<DatabaseConnection> {
    let environment: Environment = matches
        .get_one::<String>("env")
        .expect("defaulted in clap")
        .parse()
        .map_err(anyhow::Error::msg)?;

    let mut config = DatabaseConfig::from_env(environment);
    match matches.get_one::<String>("db") {
        Some(db_uri) => config = config.with_url(db_uri),
        None if environment == Environment::Development => {
            std::fs::create_dir_all("data").context("creating data directory")?;
        }
        None => {}
    }

    log::info!("using {environment} database");
    Ok(config.connect().await?)
}

async fn run(matches: clap::ArgMatches) -> anyhow::Result<()> {
    let db = connect(&matches).await?;

    match matches.subcommand() {
        Some(("migrate", _)) => Migrator::up(&db, None).await?,
        Some(("rollback", _)) => Migrator::down(&db, Some(1)).await?,
        Some(("refresh", _)) => Migrator::refresh(&db).await?,
        Some(("status", _)) => Migrator::status(&db).await?,
        Some(("stats", _)) => {
            let stats = CacheStats::collect(&db).await?;
            println!("locations: {} prefectures, {} wards, {} towns", stats.prefectures, stats.wards, stats.towns);
            println!("lines: {} lines, {} stations", stats.lines, stats.stations);
        }
        Some(("summary", args)) => {
            let kind = args.get_one::<String>("KIND").expect("required in clap");
            let prefecture = args.get_one::<String>("PREFECTURE").expect("required in clap");
            let summary = match kind.as_str() {
                "locations" => {
                    let locations = LocationCache::new(db.clone())
                        .find_by_prefecture(prefecture)
                        .collect_all()
                        .await?;
                    location_summary(prefecture, &locations)
                }
                "lines" => {
                    let lines = LineCache::new(db.clone())
                        .find_by_prefecture(prefecture)
                        .collect_all()
                        .await?;
                    line_summary(prefecture, &lines)
                }
                other => bail!("unknown summary kind: {other}"),
            };
            println!("{summary}");
        }
        Some(("meta", args)) => {
            let store = MetadataStore::new(db.clone());
            match args.subcommand() {
                Some(("get", args)) => {
                    let key = args.get_one::<String>("KEY").expect("required in clap");
                    match store.get(key).await? {
                        Some(value) => println!("{value}"),
                        None => println!("(unset)"),
                    }
                }
                Some(("set", args)) => {
                    let key = args.get_one::<String>("KEY").expect("required in clap");
                    let value = args.get_one::<String>("VALUE").expect("required in clap");
                    store.set(key, Some(value.as_str())).await?;
                }
                Some(("delete", args)) => {
                    let key = args.get_one::<String>("KEY").expect("required in clap");
                    if !store.delete(key).await? {
                        println!("{key} was not set");
                    }
                }
                _ => unreachable!("subcommand_required"),
            }
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    run(cli().get_matches()).await
}
