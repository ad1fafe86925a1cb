use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stormtrack::{pipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Extract the first recorded location of every IBTrACS storm in a year window"
)]
struct Args {
    /// YAML file with pipeline settings; flags below take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Source IBTrACS CSV.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Destination CSV.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// First season year to keep (inclusive).
    #[arg(long)]
    year_min: Option<i32>,
    /// Last season year to keep (inclusive).
    #[arg(long)]
    year_max: Option<i32>,
    /// Create the output directory if it does not exist.
    #[arg(long)]
    create_output_dir: bool,
    /// Also write the run summary as JSON to this path.
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<(PipelineConfig, Option<PathBuf>)> {
        let mut cfg = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(p) = self.input {
            cfg.input_path = p;
        }
        if let Some(p) = self.output {
            cfg.output_path = p;
        }
        if let Some(y) = self.year_min {
            cfg.year_min = y;
        }
        if let Some(y) = self.year_max {
            cfg.year_max = y;
        }
        if self.create_output_dir {
            cfg.create_output_dir = true;
        }
        Ok((cfg, self.summary_json))
    }
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let (cfg, summary_json) = Args::parse().into_config()?;
    info!(?cfg, "startup");

    let summary = pipeline::run(&cfg).with_context(|| {
        format!(
            "processing {} -> {}",
            cfg.input_path.display(),
            cfg.output_path.display()
        )
    })?;
    print!("{}", summary.render());

    if let Some(path) = summary_json {
        summary
            .write_json(&path)
            .with_context(|| format!("writing summary {}", path.display()))?;
        info!(path = %path.display(), "wrote summary report");
    }

    Ok(())
}
