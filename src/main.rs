use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use receivables::config::{
    config_dir, load_config, resolve_output_dir, FileDataProvider, CONFIG_FILE,
    CONFIG_TEMPLATE, CUSTOMERS_FILE, CUSTOMERS_TEMPLATE, INVOICES_FILE, INVOICES_TEMPLATE,
    PAYMENTS_FILE, PAYMENTS_TEMPLATE,
};
use receivables::engine::OverdueOrder;
use receivables::error::{ReportError, Result};
use receivables::render::{generate_report_pdf, render_json, render_table, write_csv, PdfReport};
use receivables::{build_report, logging, DataProvider, RecordSet, ReportRequest};

#[derive(Parser)]
#[command(name = "receivables")]
#[command(version, about = "Accounts receivable reporting CLI", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.receivables)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Emit log events as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template and sample record files
    Init,

    /// Show configuration and record counts
    Status {
        /// Date used to derive days overdue (YYYY-MM-DD, default: today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Check records for unknown references and duplicate customers
    Check {
        /// Date used to derive days overdue (YYYY-MM-DD, default: today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Build a report
    Report {
        /// Report to build
        #[arg(value_enum)]
        kind: KindArg,

        /// Collections only: include payments from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Collections only: include payments up to this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Overdue only: order of the invoice listing
        #[arg(long, value_enum, default_value_t = SortArg::Input)]
        sort: SortArg,

        /// Date used to derive days overdue (YYYY-MM-DD, default: today)
        #[arg(long)]
        as_of: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Table)]
        format: FormatArg,

        /// Write to this file instead of stdout (pdf default: output dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Aging,
    Overdue,
    Collections,
    Balances,
    Patterns,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Input,
    Days,
    Balance,
}

impl From<SortArg> for OverdueOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Input => OverdueOrder::Input,
            SortArg::Days => OverdueOrder::DaysOverdue,
            SortArg::Balance => OverdueOrder::Balance,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Table,
    Csv,
    Json,
    Pdf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status { as_of } => cmd_status(&cfg_dir, as_of),
        Commands::Check { as_of } => cmd_check(&cfg_dir, as_of),
        Commands::Report {
            kind,
            from,
            to,
            sort,
            as_of,
            format,
            output,
            open,
        } => {
            let from = parse_date_opt("from", from)?;
            let to = parse_date_opt("to", to)?;
            if !matches!(kind, KindArg::Collections) && (from.is_some() || to.is_some()) {
                tracing::warn!("--from and --to only apply to the collections report; ignoring them");
            }

            let request = match kind {
                KindArg::Aging => ReportRequest::Aging,
                KindArg::Overdue => ReportRequest::Overdue { order: sort.into() },
                KindArg::Collections => {
                    if from.is_some() != to.is_some() {
                        tracing::warn!("both --from and --to are needed to filter; reporting all payments");
                    }
                    ReportRequest::Collections { from, to }
                }
                KindArg::Balances => ReportRequest::Balances,
                KindArg::Patterns => ReportRequest::Patterns,
            };
            cmd_report(&cfg_dir, request, as_of, format, output, open)
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn parse_date_opt(flag: &'static str, value: Option<String>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|_| ReportError::InvalidDate { flag, value: s })
        })
        .transpose()
}

/// Load every record file, logging integrity problems without failing.
fn load_records(cfg_dir: &Path, as_of: Option<String>) -> Result<RecordSet> {
    if !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let as_of = parse_date_opt("as-of", as_of)?.unwrap_or_else(today);
    let records = FileDataProvider::new(cfg_dir, as_of).snapshot()?;
    for issue in records.integrity_issues() {
        tracing::warn!(%issue, "record integrity issue");
    }
    Ok(records)
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(ReportError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join(CUSTOMERS_FILE), CUSTOMERS_TEMPLATE)?;
    fs::write(cfg_dir.join(INVOICES_FILE), INVOICES_TEMPLATE)?;
    fs::write(cfg_dir.join(PAYMENTS_FILE), PAYMENTS_TEMPLATE)?;

    println!("Initialized receivables config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/{CONFIG_FILE}",
        cfg_dir.display()
    );
    println!(
        "  2. Replace the sample records: {}/{{{CUSTOMERS_FILE},{INVOICES_FILE},{PAYMENTS_FILE}}}",
        cfg_dir.display()
    );
    println!();
    println!("Then build your first report:");
    println!("  receivables report aging");

    Ok(())
}

/// Show configuration and record counts
fn cmd_status(cfg_dir: &Path, as_of: Option<String>) -> Result<()> {
    let records = load_records(cfg_dir, as_of)?;
    let config = load_config(cfg_dir)?;

    let open_invoices = records.invoices.iter().filter(|i| i.is_open()).count();

    println!("Receivables Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Company:          {}", config.company.name);
    println!("Customers:        {}", records.customers.len());
    println!(
        "Invoices:         {} ({} open)",
        records.invoices.len(),
        open_invoices
    );
    println!("Payments:         {}", records.payments.len());
    println!(
        "Output directory: {}",
        resolve_output_dir(&config.output.dir, cfg_dir).display()
    );

    Ok(())
}

/// Report integrity issues in the record files
fn cmd_check(cfg_dir: &Path, as_of: Option<String>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let as_of = parse_date_opt("as-of", as_of)?.unwrap_or_else(today);
    let records = FileDataProvider::new(cfg_dir, as_of).snapshot()?;
    let issues = records.integrity_issues();

    if issues.is_empty() {
        println!("No integrity issues found.");
        return Ok(());
    }

    println!("{} integrity issue(s):", issues.len());
    for issue in &issues {
        println!("  - {issue}");
    }
    println!("Reports still run; affected records are skipped or merged as described.");

    Ok(())
}

/// Build a report and hand it to the selected renderer
fn cmd_report(
    cfg_dir: &Path,
    request: ReportRequest,
    as_of: Option<String>,
    format: FormatArg,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let records = load_records(cfg_dir, as_of)?;
    let config = load_config(cfg_dir)?;
    let ctx = config.report_context(today());
    let kind = request.kind();

    let sections = build_report(&records, &request, &ctx);

    match format {
        FormatArg::Table => write_output(output.as_deref(), render_table(&sections).as_bytes()),
        FormatArg::Json => {
            let mut json = render_json(&sections)?;
            json.push('\n');
            write_output(output.as_deref(), json.as_bytes())
        }
        FormatArg::Csv => match output {
            Some(path) => {
                write_csv(&sections, fs::File::create(&path)?)?;
                println!("Saved: {}", path.display());
                Ok(())
            }
            None => write_csv(&sections, std::io::stdout().lock()),
        },
        FormatArg::Pdf => {
            let pdf_path = match output {
                Some(path) => path,
                None => {
                    let output_dir = resolve_output_dir(&config.output.dir, cfg_dir);
                    fs::create_dir_all(&output_dir)?;
                    output_dir.join(format!(
                        "{}-{}.pdf",
                        kind.slug(),
                        ctx.generated_on.format("%Y-%m-%d")
                    ))
                }
            };

            let report = PdfReport {
                title: kind.title(),
                company: &ctx.company,
                generated_date: ctx.date(ctx.generated_on),
                sections: &sections,
            };
            generate_report_pdf(&report, &pdf_path)?;

            println!("Generated {} report", kind.slug());
            println!("  Saved: {}", pdf_path.display());

            if open {
                open_path(&pdf_path)?;
            }
            Ok(())
        }
    }
}

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes)?;
            println!("Saved: {}", path.display());
        }
        None => std::io::stdout().lock().write_all(bytes)?,
    }
    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()?;
    }
    Ok(())
}
