use anyhow::{bail, Result};
use pico_args::Arguments;
use powerline_segments::*;
use std::env;
use std::path::PathBuf;

const SEGMENT_NAMES: &[&str] = &["fossil", "nightscout"];

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    segments: Vec<String>,
    separator: Option<String>,
    help: bool,
}

impl Args {
    fn from_env() -> Result<Self> {
        let mut args = Arguments::from_env();

        let parsed = Self {
            help: args.contains(["-h", "--help"]),
            config: args
                .opt_value_from_str::<_, PathBuf>("--config")?
                .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from)),
            segments: args.values_from_str("--segment")?,
            separator: args.opt_value_from_str("--separator")?,
        };

        let rest = args.finish();
        if !rest.is_empty() {
            bail!("unexpected arguments: {:?}", rest);
        }
        for name in &parsed.segments {
            if !SEGMENT_NAMES.contains(&name.as_str()) {
                bail!("unknown segment {:?} (expected one of {:?})", name, SEGMENT_NAMES);
            }
        }

        Ok(parsed)
    }

    fn wants(&self, segment: &str) -> bool {
        self.segments.is_empty() || self.segments.iter().any(|s| s == segment)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::from_env()?;

    if args.help {
        print_help();
        return Ok(());
    }

    let config = config::load_config(args.config.clone()).await?;
    debug(&format!(
        "segments requested: {}",
        if args.segments.is_empty() { "all".to_string() } else { args.segments.join(",") }
    ));
    let env = SystemEnvironment::new();

    let line = generate_statusline(&config, &args, env).await;
    println!("{}", line);

    Ok(())
}

async fn generate_statusline(config: &Config, args: &Args, env: SystemEnvironment) -> String {
    let fossil_config = config.segments.fossil.clone().unwrap_or_default();
    let nightscout_config = config.segments.nightscout.clone().unwrap_or_default();

    let fossil_env = env.clone();
    let fossil = async move {
        if !fossil_config.enabled || !args.wants("fossil") {
            return None;
        }
        let mut segment = FossilSegment::new(fossil_config, fossil_env);
        evaluate(&mut segment).await
    };

    let nightscout = async move {
        if !nightscout_config.enabled || !args.wants("nightscout") {
            return None;
        }
        let mut segment = NightscoutSegment::new(nightscout_config, env);
        evaluate(&mut segment).await
    };

    let (fossil, nightscout) = futures::join!(fossil, nightscout);

    let separator = args
        .separator
        .as_deref()
        .or(config.separator.as_deref())
        .unwrap_or(DEFAULT_SEPARATOR);

    [fossil, nightscout]
        .into_iter()
        .flatten()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

async fn evaluate<S: Segment>(segment: &mut S) -> Option<String> {
    if !segment.enabled().await {
        return None;
    }
    segment.render()
}

fn print_help() {
    println!("powerline-segments - prompt status segments");
    println!();
    println!("USAGE:");
    println!("    powerline-segments [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <FILE>        Custom config file path");
    println!("    --segment <NAME>       Only evaluate this segment (fossil, nightscout); repeatable");
    println!("    --separator <SEP>      Text placed between rendered segments [default: two spaces]");
    println!("    -h, --help             Show this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    POWERLINE_SEGMENTS_CONFIG             Override config path");
    println!("    POWERLINE_SEGMENTS_NIGHTSCOUT_URL     Override nightscout entries URL");
    println!("    POWERLINE_SEGMENTS_FOSSIL_COMMAND     Override fossil executable");
    println!("    POWERLINE_SEGMENTS_DEBUG              Enable debug logging");
}
