//! a compact network, cpu, and memory monitor.

use {
    anyhow::{Context, Result},
    clap::Parser,
    log::{info, warn},
    resmon::{
        HttpUpdater, Monitor, MonitorOptions, ProcProbe, RenderConfig, Updater,
        markup::DEFAULT_PREFIX,
    },
    std::{io, time::Duration},
};

/// a compact, single-line network, cpu, and memory monitor.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// refresh rate, in milliseconds
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    rate: u64,

    /// emit terminal colors and attributes
    #[arg(short, long)]
    fancy: bool,

    /// skip the banner and the header
    #[arg(short, long)]
    tiny: bool,

    /// show byte columns in bits
    #[arg(short, long)]
    bits: bool,

    /// replace this executable with the release at `--update-url`, then exit
    #[arg(short, long, requires = "update_url")]
    update: bool,

    /// where the latest release can be fetched from (http only)
    #[arg(long, value_name = "URL")]
    update_url: Option<String>,

    /// do not keep a `.bak` copy of the executable when updating
    #[arg(long)]
    no_backup: bool,

    /// log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_str()),
    )
    .init();
    info!("{args:?}");

    if args.update {
        return update(&args);
    }

    let config = RenderConfig {
        styled: args.fancy,
        prefix: DEFAULT_PREFIX,
    };
    let options = MonitorOptions {
        rate: Duration::from_millis(args.rate),
        banner: !args.tiny,
        bits: args.bits,
    };
    let monitor = Monitor::new(ProcProbe::default(), config, options)
        .context("failed to lay out the columns")?;

    let (trigger, shutdown) = resmon::shutdown();
    ctrlc::set_handler(move || trigger.fire()).context("failed to install interrupt handler")?;

    let stdout = io::stdout();
    monitor
        .run(&mut stdout.lock(), &shutdown)
        .context("monitor stopped")?;

    info!("interrupted, exiting");
    Ok(())
}

fn update(args: &Args) -> Result<()> {
    let Some(url) = args.update_url.as_deref() else {
        // clap enforces this, through `requires`.
        warn!("--update given without --update-url");
        return Ok(());
    };

    let exe = std::env::current_exe().context("failed to locate the running executable")?;
    let outcome = HttpUpdater::new(url, exe, !args.no_backup)?
        .update()
        .context("update failed")?;
    println!("{outcome}");
    Ok(())
}
