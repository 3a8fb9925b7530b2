//! `fetch-chain` command line client.
//!
//! ```text
//! fetch-chain https://example.com/api -H "Accept: application/json" \
//!     --query page=2 --timeout 5 --fail-on 404 -i
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use fetch_chain::config::{load_config, ClientConfig};
use fetch_chain::observability::logging;
use fetch_chain::{CallOptions, Client, ClientBuilder, Context, Request, Response};

#[derive(Parser, Debug)]
#[command(name = "fetch-chain")]
#[command(about = "Send an HTTP request through the fetch-chain pipeline", long_about = None)]
struct Cli {
    /// Target URL
    url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request payload
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(long)]
    query: Vec<String>,

    /// Timeout for this call in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat responses with this status as an error (repeatable)
    #[arg(long = "fail-on")]
    fail_on: Vec<u16>,

    /// Print status line and response headers
    #[arg(short = 'i', long)]
    include: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };

    logging::init(&config.observability)?;
    tracing::debug!(config = ?cli.config, "Starting fetch-chain");

    let mut builder = ClientBuilder::from_config(&config)?;
    for status in &cli.fail_on {
        let status = *status;
        builder = builder.error_handler(status, move |_| {
            Err(format!("server answered {status}").into())
        });
    }
    let client: Client = builder.build()?;

    let request = build_request(&cli)?;
    let options = match cli.timeout {
        Some(secs) => CallOptions::new().with_timeout(Duration::try_from_secs_f64(secs)?),
        None => CallOptions::new(),
    };

    let ctx = Context::background();
    let cancel = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let response = client.fetch_with(&ctx, request, options).await?;
    print_response(response, cli.include).await
}

fn build_request(cli: &Cli) -> Result<Request, Box<dyn std::error::Error>> {
    let mut builder = Request::builder(cli.url.as_str(), cli.method.as_str());

    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("invalid header {header:?}, expected \"Name: value\""))?;
        builder = builder.header(name.trim(), value.trim());
    }
    for pair in &cli.query {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid query parameter {pair:?}, expected key=value"))?;
        builder = builder.query_param(key, value);
    }
    if let Some(data) = &cli.data {
        builder = builder.payload(data.clone());
    }

    Ok(builder.build()?)
}

async fn print_response(
    mut response: Response,
    include: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = response.body().bytes().await?;
    let mut stdout = std::io::stdout().lock();

    if include {
        writeln!(stdout, "HTTP {}", response.status())?;
        let mut headers: Vec<_> = response.headers().values().into_iter().collect();
        headers.sort();
        for (name, values) in headers {
            for value in values {
                writeln!(stdout, "{}: {}", name, value)?;
            }
        }
        writeln!(stdout)?;
    }

    stdout.write_all(&body)?;
    stdout.flush()?;
    Ok(())
}
