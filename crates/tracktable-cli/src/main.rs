//! tracktable CLI: query, export, and inspect a track dataset.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracktable_core::config::TableConfig;
use tracktable_core::dataset::Dataset;
use tracktable_core::query::{Query, QueryRequest, QueryResult, SortRequest};
use tracktable_core::schema::Field;
use tracktable_exec::{run_query, FacetCache, TrackService};
use tracktable_io::readers::dataset::load_dataset;
use tracktable_io::readers::request::{read_config, read_request};
use tracktable_io::writers::csv::{export_csv, ExportOptions};
use tracktable_io::writers::jsonl::JsonlWriter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "tracktable")]
#[command(about = "Paginate, sort, filter, and search a music-track table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and print one page
    Query {
        #[command(flatten)]
        query: QueryArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Go through the simulated service (latency, failures, retries)
        #[arg(long)]
        simulate: bool,
    },

    /// Export rows as CSV
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// Column to leave out (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Selected track id (repeatable); only selected rows are exported
        #[arg(long = "selected")]
        selected: Vec<String>,

        /// Export every matching row instead of the requested page
        #[arg(long)]
        all: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the distinct values of a column
    Facets {
        /// Path to the dataset (JSON array or NDJSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Column name
        #[arg(long, default_value = "playlist_genre")]
        field: String,
    },

    /// Check that a dataset (and optionally a request) parses
    Validate {
        /// Path to the dataset (JSON array or NDJSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Request document to check against the field registry
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct QueryArgs {
    /// Path to the dataset (JSON array or NDJSON)
    #[arg(short, long)]
    data: PathBuf,

    /// Request document (JSON or YAML, table wire shape)
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Config document (JSON or YAML); overrides TRACKTABLE_* variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page index, 0-based (overrides the request)
    #[arg(long)]
    page: Option<i64>,

    /// Page size (overrides the request and config)
    #[arg(long)]
    size: Option<i64>,

    /// Sort key as `field` or `field:desc` (repeatable, replaces the request's sorting)
    #[arg(long = "sort")]
    sort: Vec<String>,

    /// Column filter as `field=value`; value is JSON when it parses, text otherwise
    #[arg(long = "filter")]
    filter: Vec<String>,

    /// Global search term
    #[arg(long)]
    search: Option<String>,

    /// Simulated latency in ms (overrides config)
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Simulated failure rate in [0, 1] (overrides config)
    #[arg(long)]
    failure_rate: Option<f64>,

    /// Seed for the failure injector (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Retries after a failed fetch (overrides config)
    #[arg(long)]
    retries: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ndjson,
    Csv,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Query {
            query,
            format,
            simulate,
        } => run_query_command(&query, format, simulate),
        Commands::Export {
            query,
            exclude,
            selected,
            all,
            output,
        } => run_export(&query, &exclude, selected, all, output),
        Commands::Facets { data, field } => run_facets(&data, &field),
        Commands::Validate { data, request } => {
            run_validate(&data, request.as_deref()).map(|_| println!("✓ Dataset is valid"))
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Defaults < `TRACKTABLE_*` variables < config file < flags.
fn resolve_config(args: &QueryArgs) -> CliResult<TableConfig> {
    let mut config = TableConfig::from_env();
    if let Some(path) = &args.config {
        config = read_config(path, &config)?;
    }
    apply_flag_config(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_flag_config(cfg: &mut TableConfig, args: &QueryArgs) {
    if let Some(size) = args.size.filter(|s| *s > 0) {
        cfg.default_page_size = size as usize;
    }
    if let Some(latency) = args.latency_ms {
        cfg.latency_ms = latency;
    }
    if let Some(rate) = args.failure_rate {
        cfg.failure_rate = rate;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(retries) = args.retries {
        cfg.retry_attempts = retries;
    }
}

/// Start from the request document (or an empty request sized by config) and
/// layer the flags on top.
fn build_request(args: &QueryArgs, config: &TableConfig) -> CliResult<QueryRequest> {
    let mut request = match &args.request {
        Some(path) => read_request(path)?,
        None => QueryRequest {
            page_size: config.default_page_size as i64,
            ..QueryRequest::default()
        },
    };
    apply_flag_request(&mut request, args)?;
    Ok(request)
}

fn apply_flag_request(request: &mut QueryRequest, args: &QueryArgs) -> CliResult<()> {
    if let Some(page) = args.page {
        request.page_index = page;
    }
    if let Some(size) = args.size {
        request.page_size = size;
    }
    if !args.sort.is_empty() {
        request.sorting = args
            .sort
            .iter()
            .map(|s| parse_sort(s))
            .collect::<CliResult<_>>()?;
    }
    for raw in &args.filter {
        let (name, value) = parse_filter(raw)?;
        request.filters.insert(name, value);
    }
    if let Some(term) = &args.search {
        request.search_term = Some(term.clone());
    }
    Ok(())
}

fn parse_sort(arg: &str) -> CliResult<SortRequest> {
    let (id, desc) = match arg.split_once(':') {
        None => (arg, false),
        Some((id, "asc")) => (id, false),
        Some((id, "desc")) => (id, true),
        Some((_, dir)) => {
            return Err(format!("sort direction must be asc or desc, got {dir:?}").into());
        }
    };
    Ok(SortRequest {
        id: id.to_string(),
        desc,
    })
}

fn parse_filter(arg: &str) -> CliResult<(String, Value)> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("filter must look like field=value, got {arg:?}"))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((name.trim().to_string(), value))
}

fn prepare(args: &QueryArgs) -> CliResult<(TableConfig, Dataset, Query)> {
    let config = resolve_config(args)?;
    let query = build_request(args, &config)?.into_query()?;
    let dataset = load_dataset(&args.data)?;
    tracing::debug!(tracks = dataset.len(), ?query, "prepared query");
    Ok((config, dataset, query))
}

fn run_query_command(args: &QueryArgs, format: OutputFormat, simulate: bool) -> CliResult<()> {
    let (config, dataset, query) = prepare(args)?;

    let result = if simulate {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let service = TrackService::new(dataset, &config);
        runtime.block_on(service.fetch_with_retry(&query))?
    } else {
        run_query(dataset.tracks(), &query)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
        OutputFormat::Ndjson => {
            let mut writer = JsonlWriter::to_writer(out, None);
            writer.write_tracks(&result.data)?;
        }
        OutputFormat::Csv => {
            export_csv(&result.data, &ExportOptions::default(), out)?;
        }
        OutputFormat::Table => print_table(&mut out, &result, &query)?,
    }
    Ok(())
}

const TABLE_COLUMNS: [Field; 5] = [
    Field::TrackName,
    Field::TrackArtist,
    Field::TrackAlbumReleaseDate,
    Field::PlaylistGenre,
    Field::TrackPopularity,
];

fn print_table<W: Write>(out: &mut W, result: &QueryResult, query: &Query) -> io::Result<()> {
    let rows: Vec<Vec<String>> = result
        .data
        .iter()
        .map(|t| TABLE_COLUMNS.iter().map(|f| t.get(*f).to_text().into_owned()).collect())
        .collect();
    let widths: Vec<usize> = TABLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, f)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain([f.name().len()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .zip(&widths)
        .map(|(f, w)| format!("{:<w$}", f.name(), w = *w))
        .collect();
    writeln!(out, "{}", header.join("  "))?;
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        writeln!(out, "{}", cells.join("  ").trim_end())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Page {} of {} ({} rows)",
        if result.page_count == 0 { 0 } else { query.page_index + 1 },
        result.page_count,
        result.total_count
    )
}

fn run_export(
    args: &QueryArgs,
    exclude: &[String],
    selected: Vec<String>,
    all: bool,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let (_, dataset, mut query) = prepare(args)?;
    if all {
        query.page_index = 0;
        query.page_size = dataset.len().max(1);
    }
    let result = run_query(dataset.tracks(), &query)?;

    let options = ExportOptions {
        exclude: exclude
            .iter()
            .map(|name| Field::from_name(name))
            .collect::<Result<_, _>>()?,
        selected,
    };

    let written = match output {
        Some(path) => export_csv(&result.data, &options, std::fs::File::create(&path)?)?,
        None => export_csv(&result.data, &options, io::stdout().lock())?,
    };
    eprintln!("✓ Exported {} rows", written);
    Ok(())
}

fn run_facets(data: &Path, field: &str) -> CliResult<()> {
    let field = Field::from_name(field)?;
    let dataset = load_dataset(data)?;
    let cache = FacetCache::new();
    for value in cache.options(&dataset, field).iter() {
        println!("{}", value);
    }
    Ok(())
}

fn run_validate(data: &Path, request: Option<&Path>) -> CliResult<()> {
    let dataset = load_dataset(data)?;
    if let Some(path) = request {
        let query = read_request(path)?.into_query()?;
        run_query(dataset.tracks(), &query)?;
    }
    eprintln!(
        "  {} tracks, content hash {}",
        dataset.len(),
        dataset.content_hash()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> QueryArgs {
        QueryArgs::default()
    }

    #[test]
    fn flags_override_config_values() {
        let mut config = TableConfig {
            latency_ms: 50,
            retry_attempts: 4,
            ..TableConfig::default()
        };
        let flags = QueryArgs {
            latency_ms: Some(0),
            seed: Some(7),
            size: Some(10),
            ..args()
        };
        apply_flag_config(&mut config, &flags);
        assert_eq!(config.latency_ms, 0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.retry_attempts, 4);
    }

    #[test]
    fn flags_layer_over_request_document() {
        let mut request = QueryRequest {
            page_index: 3,
            sorting: vec![SortRequest {
                id: "track_name".into(),
                desc: false,
            }],
            ..QueryRequest::default()
        };
        let flags = QueryArgs {
            page: Some(0),
            sort: vec!["track_popularity:desc".into(), "track_id".into()],
            filter: vec![
                "playlist_genre=[\"pop\",\"rap\"]".into(),
                "track_name=love".into(),
            ],
            search: Some("lo".into()),
            ..args()
        };
        apply_flag_request(&mut request, &flags).unwrap();
        assert_eq!(request.page_index, 0);
        assert_eq!(request.page_size, 25);
        assert_eq!(
            request.sorting,
            vec![
                SortRequest {
                    id: "track_popularity".into(),
                    desc: true
                },
                SortRequest {
                    id: "track_id".into(),
                    desc: false
                },
            ]
        );
        assert_eq!(request.filters["playlist_genre"], serde_json::json!(["pop", "rap"]));
        assert_eq!(request.filters["track_name"], serde_json::json!("love"));
        assert_eq!(request.search_term.as_deref(), Some("lo"));

        let query = request.into_query().unwrap();
        assert_eq!(query.filters.len(), 2);
    }

    #[test]
    fn malformed_flags_are_rejected() {
        assert!(parse_sort("track_name:sideways").is_err());
        assert!(parse_filter("track_name").is_err());
        let (name, value) = parse_filter("duration_ms=[2,4]").unwrap();
        assert_eq!(name, "duration_ms");
        assert_eq!(value, serde_json::json!([2, 4]));
    }

    #[test]
    fn table_output_reports_page_position() {
        let result = QueryResult {
            data: vec![],
            page_count: 0,
            total_count: 0,
        };
        let mut buf = Vec::new();
        print_table(&mut buf, &result, &Query::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("track_name"));
        assert!(text.ends_with("Page 0 of 0 (0 rows)\n"));
    }
}
