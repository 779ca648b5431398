use std::str::FromStr;

use clap::Parser;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use eyre::{Context, Result};
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug, Parser)]
#[command(name = "pgjson", about = "Run a query and print its rows as json")]
struct Args {
    #[arg(long = "pg", env = "PG_URL", default_value = "postgres://localhost/postgres")]
    pg_url: String,

    /// Use the simple query protocol; every value is returned as text
    #[clap(long, action = clap::ArgAction::SetTrue)]
    simple: bool,

    #[clap(long, action = clap::ArgAction::SetTrue)]
    pretty: bool,

    sql: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).compact();
    let filter_layer = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .init();

    let args = Args::parse();
    let pool = pool(&args.pg_url)?;
    let doc = run(&pool, &args).await?;
    let out = if args.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    println!("{out}");
    Ok(())
}

/// One connection is all a single query needs. TLS is used when the
/// server offers it, without verifying the certificate.
fn pool(url: &str) -> Result<Pool> {
    let pg_config = tokio_postgres::Config::from_str(url).wrap_err("parsing pg url")?;
    let mut builder = SslConnector::builder(SslMethod::tls())?;
    builder.set_verify(SslVerifyMode::NONE);
    let manager = Manager::from_config(
        pg_config,
        MakeTlsConnector::new(builder.build()),
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    Pool::builder(manager)
        .max_size(1)
        .build()
        .wrap_err("building pool")
}

async fn run(pool: &Pool, args: &Args) -> Result<Value> {
    let pg = pool.get().await.wrap_err("connecting to pg")?;
    let doc = if args.simple {
        pgjson::simple_query_json(&**pg, &args.sql).await?
    } else {
        pgjson::query_json(&**pg, &args.sql, &[]).await?
    };
    tracing::info!(
        rows = doc[pgjson::DATA].as_array().map(Vec::len).unwrap_or_default(),
        "done"
    );
    Ok(doc)
}
