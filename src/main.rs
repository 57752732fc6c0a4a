use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

use logistics::aggregate::{
    month_key, month_label, top_n, total_amount, total_quantity, unique_count, Dashboard,
};
use logistics::bill::{build_bill_now, BillData};
use logistics::config::{
    config_dir, load_config, open_store, resolve_data_dir, Config, CONFIG_TEMPLATE,
};
use logistics::error::{LogisticsError, Result};
use logistics::export::{default_file_name, write_csv};
use logistics::pdf::generate_bill_pdf;
use logistics::query::{filter, parse_bound, EntryFilter};
use logistics::store::{
    coerce_amount, coerce_quantity, Entry, EntryField, EntryInput, EntryStore, EntryUpdate,
    FileBlobStore,
};

#[derive(Parser)]
#[command(name = "logistics")]
#[command(version, about = "Local logbook for trips and shipments", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.logistics or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Diagnostics level on stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "LOGISTICS_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config
    Init,

    /// Record a new trip
    Add(AddArgs),

    /// List entries, optionally filtered
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of entries to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show in chronological order instead of insertion order
        #[arg(long)]
        by_date: bool,
    },

    /// Show every field of one entry
    Show {
        /// Entry id or row number from 'list'
        entry: String,
    },

    /// Change fields of an existing entry
    Edit {
        /// Entry id or row number from 'list'
        entry: String,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete an entry
    Delete {
        /// Entry id or row number from 'list'
        entry: String,
    },

    /// Headline figures, top vehicles and drivers, last 6 months
    Dashboard {
        /// Restrict headline figures to one month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Rank values of a field by number of trips
    Top {
        /// Field to rank
        #[arg(short, long, value_enum, default_value_t = FieldArg::Vehicle)]
        field: FieldArg,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Build the GST bill for one month
    Bill {
        /// Billing month (YYYY-MM)
        #[arg(short, long)]
        month: String,

        /// Customer name printed under "Bill To"
        #[arg(short, long)]
        bill_to: String,

        /// Also render the bill as a PDF at this path (requires Typst)
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Open the generated PDF with the system default viewer
        #[arg(long, requires = "pdf")]
        open: bool,
    },

    /// Export entries as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (default: ./logistics-entries-<today>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show config, storage and entry counts
    Status,
}

#[derive(Args)]
struct AddArgs {
    /// Trip date (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    date: Option<String>,

    /// What was carried
    #[arg(short, long)]
    particular: String,

    /// Vehicle number (stored uppercase)
    #[arg(short, long)]
    vehicle: String,

    #[arg(long, default_value = "")]
    chalan: String,

    #[arg(long, default_value = "")]
    driver: String,

    /// Route start
    #[arg(long, default_value = "")]
    from: String,

    /// Route end
    #[arg(long, default_value = "")]
    to: String,

    /// Quantity carried (invalid or blank becomes 0)
    #[arg(short, long, default_value = "")]
    quantity: String,

    /// Billed amount (invalid or blank means not billed)
    #[arg(short, long, default_value = "")]
    amount: String,

    /// Serial number (default: next row number)
    #[arg(long, default_value = "", allow_negative_numbers = true)]
    sr_no: String,
}

#[derive(Args)]
struct EditArgs {
    #[arg(short, long)]
    date: Option<String>,

    #[arg(short, long)]
    particular: Option<String>,

    #[arg(short, long)]
    vehicle: Option<String>,

    #[arg(long)]
    chalan: Option<String>,

    #[arg(long)]
    driver: Option<String>,

    #[arg(long)]
    from: Option<String>,

    #[arg(long)]
    to: Option<String>,

    #[arg(short, long)]
    quantity: Option<String>,

    #[arg(short, long, conflicts_with = "clear_amount")]
    amount: Option<String>,

    /// Mark the entry as not billed
    #[arg(long)]
    clear_amount: bool,

    #[arg(long, allow_negative_numbers = true)]
    sr_no: Option<i64>,
}

/// Filters shared by list, top and export
#[derive(Args)]
struct FilterArgs {
    /// Month prefix (YYYY-MM)
    #[arg(long)]
    month: Option<String>,

    /// Vehicle number contains (case-insensitive)
    #[arg(long)]
    vehicle: Option<String>,

    #[arg(long)]
    driver: Option<String>,

    #[arg(long)]
    from: Option<String>,

    #[arg(long)]
    to: Option<String>,

    #[arg(long)]
    particular: Option<String>,

    #[arg(long)]
    chalan: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    min_amount: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    max_amount: Option<String>,

    #[arg(long, value_name = "QTY")]
    min_quantity: Option<String>,

    #[arg(long, value_name = "QTY")]
    max_quantity: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> EntryFilter {
        let bound = |text: &Option<String>| text.as_deref().and_then(parse_bound);
        EntryFilter {
            month: self.month.clone(),
            vehicle_no: self.vehicle.clone(),
            driver_name: self.driver.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            particular: self.particular.clone(),
            chalan_no: self.chalan.clone(),
            min_amount: bound(&self.min_amount),
            max_amount: bound(&self.max_amount),
            min_quantity: bound(&self.min_quantity),
            max_quantity: bound(&self.max_quantity),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Vehicle,
    Driver,
    From,
    To,
    Particular,
    Chalan,
}

impl From<FieldArg> for EntryField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Vehicle => EntryField::VehicleNo,
            FieldArg::Driver => EntryField::DriverName,
            FieldArg::From => EntryField::From,
            FieldArg::To => EntryField::To,
            FieldArg::Particular => EntryField::Particular,
            FieldArg::Chalan => EntryField::ChalanNo,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("logistics={}", cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    debug!(config_dir = %cfg_dir.display(), "resolved config directory");

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Add(args) => cmd_add(&cfg_dir, args),
        Commands::List {
            filters,
            limit,
            by_date,
        } => cmd_list(&cfg_dir, &filters.to_filter(), limit, by_date),
        Commands::Show { entry } => cmd_show(&cfg_dir, &entry),
        Commands::Edit { entry, changes } => cmd_edit(&cfg_dir, &entry, changes),
        Commands::Delete { entry } => cmd_delete(&cfg_dir, &entry),
        Commands::Dashboard { month } => cmd_dashboard(&cfg_dir, month.as_deref()),
        Commands::Top {
            field,
            limit,
            filters,
        } => cmd_top(&cfg_dir, field.into(), limit, &filters.to_filter()),
        Commands::Bill {
            month,
            bill_to,
            pdf,
            open,
        } => cmd_bill(&cfg_dir, &month, &bill_to, pdf, open),
        Commands::Export { filters, output } => cmd_export(&cfg_dir, &filters.to_filter(), output),
        Commands::Status => cmd_status(&cfg_dir),
    }
}

/// Load config and open the entry store, failing if `init` was never run
fn open(cfg_dir: &Path) -> Result<(Config, EntryStore<FileBlobStore>)> {
    if !cfg_dir.exists() {
        return Err(LogisticsError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let config = load_config(cfg_dir)?;
    let store = open_store(&config, cfg_dir)?;
    Ok((config, store))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(LogisticsError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("data"))?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized logistics config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company and GST details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Record your first trip:");
    println!("     logistics add --particular Sand --vehicle MH12AB1234 --quantity 10 --amount 4500");

    Ok(())
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| LogisticsError::InvalidDate(input.to_string()))
}

/// Record a new trip
fn cmd_add(cfg_dir: &Path, args: AddArgs) -> Result<()> {
    let (config, mut store) = open(cfg_dir)?;

    let date = match args.date {
        Some(d) => parse_date(&d)?,
        None => Local::now().date_naive(),
    };

    let entry = store.create(EntryInput {
        sr_no: args.sr_no,
        date,
        particular: args.particular,
        chalan_no: args.chalan,
        vehicle_no: args.vehicle,
        driver_name: args.driver,
        from: args.from,
        to: args.to,
        quantity: args.quantity,
        amount: args.amount,
    })?;

    println!("Added entry SR {}", entry.sr_no);
    println!("  ID:      {}", entry.id);
    println!("  Date:    {}", entry.display_date());
    println!("  Vehicle: {}", entry.vehicle_no);
    println!("  Qty:     {}", format_quantity(entry.quantity));
    println!(
        "  Amount:  {}",
        format_amount(entry.amount, &config.billing.currency_symbol)
    );

    Ok(())
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "SR")]
    sr_no: i64,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "PARTICULAR")]
    particular: String,
    #[tabled(rename = "CHALAN")]
    chalan_no: String,
    #[tabled(rename = "VEHICLE")]
    vehicle_no: String,
    #[tabled(rename = "DRIVER")]
    driver_name: String,
    #[tabled(rename = "ROUTE")]
    route: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "TRIPS")]
    trips: usize,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "MONTH")]
    month: String,
    #[tabled(rename = "ENTRIES")]
    entries: usize,
    #[tabled(rename = "QUANTITY")]
    quantity: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "SR.")]
    index: usize,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "PARTICULAR")]
    particular: String,
    #[tabled(rename = "VEHICLE")]
    vehicle_no: String,
    #[tabled(rename = "ROUTE")]
    route: String,
    #[tabled(rename = "QTY")]
    quantity: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn format_money(value: f64, currency_symbol: &str) -> String {
    let paise = (value * 100.0).round() as i64;
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!(
        "{}{}{}.{:02}",
        currency_symbol,
        sign,
        format_grouped_int((abs / 100) as i64),
        abs % 100
    )
}

fn format_amount(amount: Option<f64>, currency_symbol: &str) -> String {
    match amount {
        Some(value) => format_money(value, currency_symbol),
        None => "-".to_string(),
    }
}

/// Indian digit grouping: 12,34,567
fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i == 3 || (i > 3 && (i - 3) % 2 == 0) {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let fixed = format!("{value:.3}");
        fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Append summary rows under the last column of a rounded table, merging all
/// other columns into a single label cell.
fn add_totals_footer(table: &str, rows: &[(String, String)]) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 || rows.is_empty() {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let Some(inner) = lines[0]
        .strip_prefix('╭')
        .and_then(|s| s.strip_suffix('╮'))
    else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    let Some((&value_width, label_widths)) = widths.split_last() else {
        return table.to_string();
    };
    if label_widths.is_empty() {
        return table.to_string();
    }
    let left_width = label_widths.iter().sum::<usize>() + label_widths.len() - 1;

    let fits = rows.iter().all(|(label, value)| {
        label.chars().count() + 2 <= left_width && value.chars().count() + 2 <= value_width
    });
    if !fits {
        let mut out = table.to_string();
        for (label, value) in rows {
            out.push_str(&format!("\n{label}: {value}"));
        }
        return out;
    }

    // Strip the bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    let merged: Vec<String> = label_widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!(
        "├{}┼{}┤\n",
        merged.join("┴"),
        "─".repeat(value_width)
    ));

    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>left$} │ {:>right$} │\n",
            label,
            value,
            left = left_width - 2,
            right = value_width - 2
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                "─".repeat(left_width),
                "─".repeat(value_width)
            ));
        }
    }

    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(left_width),
        "─".repeat(value_width)
    ));

    out
}

fn entry_row(index: usize, entry: &Entry, currency_symbol: &str) -> EntryRow {
    EntryRow {
        index,
        sr_no: entry.sr_no,
        date: entry.date.to_string(),
        particular: entry.particular.clone(),
        chalan_no: entry.chalan_no.clone(),
        vehicle_no: entry.vehicle_no.clone(),
        driver_name: entry.driver_name.clone(),
        route: entry.route(),
        quantity: format_quantity(entry.quantity),
        amount: format_amount(entry.amount, currency_symbol),
    }
}

/// List entries with their row numbers in the full collection
fn cmd_list(
    cfg_dir: &Path,
    filters: &EntryFilter,
    limit: Option<usize>,
    by_date: bool,
) -> Result<()> {
    let (config, store) = open(cfg_dir)?;
    let entries = store.list()?;

    if entries.is_empty() {
        println!("No entries recorded yet.");
        return Ok(());
    }

    let mut matched: Vec<(usize, &Entry)> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filters.matches(entry))
        .map(|(idx, entry)| (idx + 1, entry))
        .collect();

    if by_date {
        matched.sort_by_key(|(_, entry)| entry.date);
    }

    let matched_entries: Vec<Entry> = matched.iter().map(|(_, e)| (*e).clone()).collect();
    let shown = match limit {
        Some(n) => &matched[..n.min(matched.len())],
        None => &matched[..],
    };

    let symbol = &config.billing.currency_symbol;
    let rows: Vec<EntryRow> = shown
        .iter()
        .map(|(idx, entry)| entry_row(*idx, entry, symbol))
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();

    let active = filters.active_count();
    if active > 0 {
        println!(
            "Showing {} of {} entries ({} filter{} active)",
            shown.len(),
            entries.len(),
            active,
            if active > 1 { "s" } else { "" }
        );
    } else {
        println!("Showing {} of {} entries", shown.len(), entries.len());
    }
    println!(
        "Matched quantity: {}  Matched amount: {}",
        format_quantity(total_quantity(&matched_entries)),
        format_money(
            total_amount(&matched_entries),
            symbol
        )
    );
    println!("Use the # column with show/edit/delete (e.g., 'logistics show 1')");

    Ok(())
}

/// Resolve an entry reference: a 1-based row number from 'list' or an entry id
fn resolve_entry(entries: &[Entry], reference: &str) -> Result<(usize, Entry)> {
    if let Ok(idx) = reference.parse::<usize>() {
        if idx == 0 || idx > entries.len() {
            return Err(LogisticsError::EntryNotFound(reference.to_string()));
        }
        return Ok((idx, entries[idx - 1].clone()));
    }

    entries
        .iter()
        .position(|entry| entry.id == reference)
        .map(|pos| (pos + 1, entries[pos].clone()))
        .ok_or_else(|| LogisticsError::EntryNotFound(reference.to_string()))
}

/// Show every field of one entry
fn cmd_show(cfg_dir: &Path, reference: &str) -> Result<()> {
    let (config, store) = open(cfg_dir)?;
    let entries = store.list()?;
    let (idx, entry) = resolve_entry(&entries, reference)?;

    println!("Entry #{idx}");
    println!("{}", "-".repeat(50));
    println!("ID:          {}", entry.id);
    println!("SR No.:      {}", entry.sr_no);
    println!("Date:        {}", entry.display_date());
    println!("Particular:  {}", entry.particular);
    println!("Chalan No.:  {}", entry.chalan_no);
    println!("Vehicle No.: {}", entry.vehicle_no);
    println!("Driver:      {}", entry.driver_name);
    println!("Route:       {}", entry.route());
    println!("Quantity:    {}", format_quantity(entry.quantity));
    match entry.amount {
        Some(amount) => println!(
            "Amount:      {}",
            format_money(amount, &config.billing.currency_symbol)
        ),
        None => println!("Amount:      not billed"),
    }
    println!(
        "Created:     {}",
        entry.created_at.with_timezone(&Local).format("%d/%m/%Y %H:%M")
    );

    Ok(())
}

/// Change fields of an existing entry
fn cmd_edit(cfg_dir: &Path, reference: &str, args: EditArgs) -> Result<()> {
    let (_, mut store) = open(cfg_dir)?;
    let entries = store.list()?;
    let (idx, entry) = resolve_entry(&entries, reference)?;

    let changes = EntryUpdate {
        sr_no: args.sr_no,
        date: args.date.as_deref().map(parse_date).transpose()?,
        particular: args.particular,
        chalan_no: args.chalan,
        vehicle_no: args.vehicle,
        driver_name: args.driver,
        from: args.from,
        to: args.to,
        quantity: args.quantity.as_deref().map(coerce_quantity),
        amount: if args.clear_amount {
            Some(None)
        } else {
            args.amount.as_deref().map(coerce_amount)
        },
    };

    if changes.is_empty() {
        println!("Nothing to change for entry #{idx}");
        return Ok(());
    }

    store.update(&entry.id, changes)?;
    println!("Updated entry #{idx} ({})", entry.id);

    Ok(())
}

/// Delete an entry
fn cmd_delete(cfg_dir: &Path, reference: &str) -> Result<()> {
    let (_, mut store) = open(cfg_dir)?;
    let entries = store.list()?;
    let (idx, entry) = resolve_entry(&entries, reference)?;

    store.delete(&entry.id)?;
    println!(
        "Deleted entry #{idx} (SR {}, {} on {})",
        entry.sr_no,
        entry.vehicle_no,
        entry.display_date()
    );

    Ok(())
}

fn rank_table(ranking: &[(String, usize)]) -> String {
    let rows: Vec<RankRow> = ranking
        .iter()
        .enumerate()
        .map(|(i, (value, trips))| RankRow {
            rank: i + 1,
            value: value.clone(),
            trips: *trips,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Dashboard: headline figures, rankings and the monthly window
fn cmd_dashboard(cfg_dir: &Path, month: Option<&str>) -> Result<()> {
    let (config, store) = open(cfg_dir)?;
    let entries = store.list()?;
    let today = Local::now().date_naive();
    let dashboard = Dashboard::compute(&entries, month, today);
    let symbol = &config.billing.currency_symbol;

    match &dashboard.month {
        Some(m) => println!("Dashboard ({})", month_label(m)),
        None => println!("Dashboard (all entries)"),
    }
    println!("{}", "-".repeat(50));
    println!("Entries:          {}", dashboard.total_entries);
    println!(
        "Total amount:     {}",
        format_money(dashboard.total_amount, symbol)
    );
    println!(
        "Total quantity:   {}",
        format_quantity(dashboard.total_quantity)
    );
    println!(
        "This month:       {} entries, {}",
        dashboard.current_month_entries,
        format_money(dashboard.current_month_amount, symbol)
    );
    println!("Vehicles:         {}", dashboard.unique_vehicles);
    println!("Drivers:          {}", dashboard.unique_drivers);

    if dashboard.total_entries > 0 {
        println!();
        println!("Top Vehicles by Usage");
        println!("{}", rank_table(&dashboard.top_vehicles));
        println!();
        println!("Top Drivers by Usage");
        println!("{}", rank_table(&dashboard.top_drivers));
    }

    println!();
    println!("Last 6 months");
    let rows: Vec<MonthRow> = dashboard
        .monthly
        .iter()
        .map(|summary| MonthRow {
            month: summary.label(),
            entries: summary.total_entries,
            quantity: format_quantity(summary.total_quantity),
            amount: format_money(summary.total_amount, symbol),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));

    Ok(())
}

/// Rank values of one field by trip count
fn cmd_top(cfg_dir: &Path, field: EntryField, limit: usize, filters: &EntryFilter) -> Result<()> {
    let (_, store) = open(cfg_dir)?;
    let entries = filter(&store.list()?, filters);

    if entries.is_empty() {
        println!("No matching entries.");
        return Ok(());
    }

    let ranking = top_n(&entries, field, limit);
    println!("Top {} by Usage", field.label());
    println!("{}", rank_table(&ranking));
    println!(
        "{} distinct value(s) across {} entries",
        unique_count(&entries, field),
        entries.len()
    );

    Ok(())
}

fn print_bill(bill: &BillData) {
    println!("INVOICE #{}", bill.number);
    println!("{}", "-".repeat(50));
    println!("From:    {}", bill.company.name);
    println!("         {}", bill.company.address);
    if let Some(gst_no) = &bill.company.gst_no {
        println!("         GST: {gst_no}");
    }
    println!("Bill To: {}", bill.bill_to);
    println!("Date:    {}", bill.date);
    println!("Period:  {}", bill.period);
    println!();

    let symbol = &bill.currency_symbol;
    // Pad amounts to the widest footer value so the footer lines up under the column
    let width = format_money(bill.total, symbol).chars().count();
    let rows: Vec<BillRow> = bill
        .lines
        .iter()
        .map(|line| BillRow {
            index: line.index,
            date: line.date.clone(),
            particular: line.particular.clone(),
            vehicle_no: line.vehicle_no.clone(),
            route: line.route.clone(),
            quantity: format_quantity(line.quantity),
            amount: format!("{:>width$}", format_amount(line.amount, symbol)),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let footer = [
        ("SUBTOTAL".to_string(), format_money(bill.subtotal, symbol)),
        (
            format!("(+) GST {}%", format_quantity(bill.tax_rate)),
            format_money(bill.tax_amount, symbol),
        ),
        ("(=) TOTAL".to_string(), format_money(bill.total, symbol)),
    ];
    println!("{}", add_totals_footer(&table, &footer));
}

/// Build and print the bill for one month, optionally as a PDF
fn cmd_bill(
    cfg_dir: &Path,
    month: &str,
    bill_to: &str,
    pdf: Option<PathBuf>,
    open_pdf: bool,
) -> Result<()> {
    let (config, store) = open(cfg_dir)?;
    let entries = store.list()?;
    let bill = build_bill_now(&entries, month, bill_to, &config)?;

    print_bill(&bill);

    if let Some(pdf_path) = pdf {
        if let Some(parent) = pdf_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        generate_bill_pdf(&bill, &pdf_path)?;
        println!();
        println!("Saved: {}", pdf_path.display());
        if open_pdf {
            open_path(&pdf_path)?;
        }
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

/// Export the filtered collection as CSV
fn cmd_export(cfg_dir: &Path, filters: &EntryFilter, output: Option<PathBuf>) -> Result<()> {
    let (_, store) = open(cfg_dir)?;
    let entries = filter(&store.list()?, filters);

    let path =
        output.unwrap_or_else(|| PathBuf::from(default_file_name(Local::now().date_naive())));
    let file = File::create(&path)?;
    write_csv(&entries, BufWriter::new(file))?;

    println!("Exported {} entries to {}", entries.len(), path.display());
    Ok(())
}

/// Show config, storage and entry counts
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    let (config, store) = open(cfg_dir)?;
    let entries = store.list()?;
    let symbol = &config.billing.currency_symbol;

    let this_month = month_key(Local::now().date_naive());
    let current: Vec<Entry> = entries
        .iter()
        .filter(|entry| month_key(entry.date) == this_month)
        .cloned()
        .collect();

    println!("Logistics Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!(
        "Data directory:   {}",
        resolve_data_dir(&config, cfg_dir).display()
    );
    println!("Company:          {}", config.company.name);
    println!(
        "GST rate:         {}%",
        format_quantity(config.billing.tax_rate * 100.0)
    );
    println!("Entries:          {}", entries.len());
    println!(
        "This month:       {} entries, {}",
        current.len(),
        format_money(total_amount(&current), symbol)
    );

    if !entries.is_empty() {
        println!();
        println!("Recent entries:");
        for entry in entries.iter().rev().take(5) {
            println!(
                "  {} - {} - {} - {}",
                entry.display_date(),
                entry.vehicle_no,
                entry.particular,
                format_amount(entry.amount, symbol)
            );
        }
    }

    Ok(())
}
