use clap::{Parser, Subcommand};
use ct_bills::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scrape and reconcile Connecticut General Assembly bills
#[derive(Parser, Debug)]
#[command(name = "ct-bills")]
#[command(about = "Scrape one session of Connecticut bills into JSON records")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a session and write one JSON record per bill
    Scrape {
        /// Session year, e.g. 2011 (overrides the config file)
        #[arg(long)]
        session: Option<String>,

        /// Chambers to scrape (upper, lower). Defaults to both.
        #[arg(long = "chamber", num_args = 1..)]
        chambers: Vec<String>,

        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write <chamber>_<bill_id>.json files here instead of JSON lines on stdout
        #[arg(long = "output-dir")]
        output_dir: Option<PathBuf>,

        /// HTTP mirror serving the legislature's FTP tree
        #[arg(long = "ftp-mirror")]
        ftp_mirror: Option<String>,

        /// Root of the data dumps (default: ftp://ftp.cga.ct.gov)
        #[arg(long = "data-url")]
        data_url: Option<String>,

        /// Root of the status pages (default: http://www.cga.ct.gov)
        #[arg(long = "web-url")]
        web_url: Option<String>,

        /// Which page's bill links a subject is attributed to
        #[arg(long = "subject-links", value_parser = ["index-page", "subject-page"])]
        subject_links: Option<String>,
    },
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  scrape  Scrape a session and write one JSON record per bill");
}

fn build_config(cmd: &Command) -> anyhow::Result<ScrapeConfig> {
    let Command::Scrape {
        session,
        chambers,
        config,
        ftp_mirror,
        data_url,
        web_url,
        subject_links,
        ..
    } = cmd;

    let base = match config {
        Some(path) => ScrapeConfig::from_yaml_file(path)?,
        None => ScrapeConfig::default(),
    };
    let mut builder = ConfigBuilder::from_config(base);

    if let Some(session) = session {
        builder = builder.session(session.as_str());
    }
    if !chambers.is_empty() {
        builder = builder.chambers_str(&chambers.join(","))?;
    }
    if let Some(mirror) = ftp_mirror {
        builder = builder.ftp_mirror(mirror.as_str());
    }
    if let Some(url) = data_url {
        builder = builder.data_url(url.as_str());
    }
    if let Some(url) = web_url {
        builder = builder.web_url(url.as_str());
    }
    if let Some(source) = subject_links {
        builder = builder.subject_links(SubjectLinkSource::from(source.as_str()));
    }

    Ok(builder.build()?)
}

async fn run_scrape_command(cmd: Command) -> anyhow::Result<()> {
    let config = build_config(&cmd)?;
    let Command::Scrape { output_dir, .. } = cmd;

    let transport = HttpTransport::new(config.timeout_secs, config.ftp_mirror.clone())?;
    let processor = SessionProcessor::new(config, Arc::new(transport));

    let mut sink: Box<dyn BillSink> = match output_dir {
        Some(dir) => Box::new(DirectorySink::new(dir)?),
        None => Box::new(JsonLinesSink::new(io::stdout().lock())),
    };

    let mut stream = processor.process();
    let mut saved = 0;
    while let Some(result) = stream.next().await {
        match result {
            Ok(bill) => {
                sink.save_bill(&bill)?;
                saved += 1;
            }
            Err(e) if e.is_no_data() => {
                tracing::warn!(error = %e, "no data for requested session");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(bills = saved, "saved bills");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Some(cmd @ Command::Scrape { .. }) => run_scrape_command(cmd).await,
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
