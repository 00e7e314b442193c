use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use helm_release::config;
use helm_release::patch;
use helm_release::ui;
use helm_release::{run_release, Environment, ReleaseOptions};

#[derive(clap::Parser)]
#[command(
    name = "helm-release",
    version,
    about = "Set a Helm chart's version from its git history"
)]
struct Args {
    #[arg(default_value = ".", help = "Chart directory")]
    chart_path: PathBuf,

    #[arg(short, long, help = "Image tag to write into the values file")]
    tag: Option<String>,

    #[arg(long, value_name = "PATH", help = "Dotted path of the image tag [default: image.tag]")]
    path: Option<String>,

    #[arg(long, help = "Only print the next version, modify nothing")]
    print: bool,

    #[arg(long, help = "Suppress status output")]
    silent: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,
}

fn init_logging(silent: bool) {
    let filter = if silent {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let env = Environment::from_env();

    let options = ReleaseOptions {
        chart_dir: args.chart_path,
        tag: args.tag,
        tag_path: args.path,
        print_only: args.print,
        silent: args.silent,
    };

    let outcome = run_release(&options, &config, &env)?;

    if options.print_only {
        println!("{}", outcome.version);
    } else {
        tracing::info!(version = %outcome.version, "release prepared");
    }
    Ok(())
}

const EXIT_SIGINT: i32 = 130;

fn main() {
    let args = Args::parse();
    init_logging(args.silent);

    let _ = ctrlc::set_handler(|| {
        patch::remove_in_flight();
        std::process::exit(EXIT_SIGINT);
    });

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
