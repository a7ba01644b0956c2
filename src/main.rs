use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use climb_log::chart::ChartFormat;
use climb_log::pipeline::{self, RunConfig, TableFormat};
use climb_log::{LogError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;

    let config = RunConfig {
        input: cli.input,
        out_dir: cli.out_dir,
        chart_format: (!cli.no_charts).then(|| cli.chart_format.into()),
        table_format: cli.format.into(),
    };

    let mut stdout = std::io::stdout().lock();
    let written = pipeline::run(&config, &mut stdout)?;
    for path in written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn init_logging(verbose: u8) -> Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| LogError::Logging(err.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reshape a monthly climbing logbook and chart average climbs per grade."
)]
struct Cli {
    /// Logbook workbook with one `MMYY` sheet per month.
    #[arg(long, default_value = "./data/Kletter-Tagebuch.xlsx")]
    input: PathBuf,

    /// Directory the chart images are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Image format of the charts.
    #[arg(long, value_enum, default_value_t = ChartFormatKind::Png)]
    chart_format: ChartFormatKind,

    /// Only print the long table.
    #[arg(long)]
    no_charts: bool,

    /// How the long table is printed.
    #[arg(long, value_enum, default_value_t = TableFormatKind::Table)]
    format: TableFormatKind,

    /// Raise log verbosity (`-v` info, `-vv` debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ChartFormatKind {
    Png,
    Svg,
}

impl From<ChartFormatKind> for ChartFormat {
    fn from(kind: ChartFormatKind) -> Self {
        match kind {
            ChartFormatKind::Png => ChartFormat::Png,
            ChartFormatKind::Svg => ChartFormat::Svg,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TableFormatKind {
    Table,
    Json,
}

impl From<TableFormatKind> for TableFormat {
    fn from(kind: TableFormatKind) -> Self {
        match kind {
            TableFormatKind::Table => TableFormat::Table,
            TableFormatKind::Json => TableFormat::Json,
        }
    }
}
