use anyhow::Result;
use clap::Parser;
use splitcheck::cli::{Cli, OutputFormat};
use splitcheck::comparison::{compare, ComparisonReport};
use splitcheck::config::AnalysisConfig;
use splitcheck::dataset::Dataset;
use splitcheck::describe::{self, DatasetProfile};
use splitcheck::json_output::JsonOutput;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    let analysis = &mut config.analysis;
    if let Some(metric) = &args.metric {
        analysis.metric = metric.clone();
    }
    if let Some(column) = &args.group_column {
        analysis.group_column = column.clone();
    }
    if let Some(label) = &args.control_label {
        analysis.control_label = label.clone();
    }
    if let Some(label) = &args.test_label {
        analysis.test_label = label.clone();
    }
    if let Some(alpha) = args.alpha {
        config.comparison.significance_level = alpha;
    }
    if let Some(center) = args.levene_center {
        config.comparison.levene_center = center.into();
    }

    config.comparison.validate()?;
    Ok(config)
}

/// Load either one labeled table or a control/test pair
fn load_dataset(args: &Cli, config: &AnalysisConfig) -> Result<Dataset> {
    let settings = &config.analysis;
    match (&args.data, &args.control, &args.test) {
        (Some(path), None, None) => Dataset::from_csv_path(path),
        (None, Some(control), Some(test)) => {
            let control = Dataset::from_csv_path(control)?;
            let test = Dataset::from_csv_path(test)?;
            Ok(Dataset::concat_groups(
                &control,
                &test,
                &settings.group_column,
                &settings.control_label,
                &settings.test_label,
            ))
        }
        _ => anyhow::bail!(
            "Must specify either --data FILE or --control FILE --test FILE. \
             Usage: splitcheck --data ab.csv or splitcheck --control c.csv --test t.csv"
        ),
    }
}

fn print_output(
    format: OutputFormat,
    metric: &str,
    report: ComparisonReport,
    profile: Option<DatasetProfile>,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if let Some(profile) = &profile {
                println!("{}", profile.to_report_string());
            }
            println!("Metric: {}\n", metric);
            print!("{}", report.to_report_string());
        }
        OutputFormat::Json => {
            let mut output = JsonOutput::new(metric, report);
            if let Some(profile) = profile {
                output.set_profile(profile);
            }
            println!("{}", output.to_json()?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = resolve_config(&args)?;
    let dataset = load_dataset(&args, &config)?;
    let settings = &config.analysis;

    let profile = if args.profile {
        Some(describe::profile(&dataset)?)
    } else {
        None
    };

    let control = dataset.sample(
        &settings.group_column,
        &settings.control_label,
        &settings.metric,
    )?;
    let test = dataset.sample(
        &settings.group_column,
        &settings.test_label,
        &settings.metric,
    )?;

    let report = compare(&control, &test, &config.comparison)?;
    print_output(args.format, &settings.metric, report, profile)
}
