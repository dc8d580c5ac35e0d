use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use iap_dashboard::dashboard::{available_periods, normalize_sila};
use iap_dashboard::format::{format_change, format_opt, format_percent};
use iap_dashboard::narrative::extremes_sentence;
use iap_dashboard::pivot::PivotTable;
use iap_dashboard::{Dashboard, DashboardConfig, Dataset, Period};
use iap_dashboard::{stats, storage, viz};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "iap",
    version,
    about = "Derive, tabulate & chart Indeks Aktualisasi Pancasila (IAP) data"
)]
struct Cli {
    /// Workbook (.xlsx/.xls/.ods), a directory of <SHEET>.csv files, or a .json file.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// JSON config overriding sheet names, baseline year, locale and colors.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Number locale for printed values (e.g. en, id).
    #[arg(long, global = true)]
    locale: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// National index: yearly trend, insight text and Sila values.
    Nasional(NationalArgs),
    /// One province: trend, Sila radar values and indicator table.
    Provinsi(ProvinceArgs),
    /// Print or export a pivot table.
    Tabel(TableArgs),
    /// Render a chart to SVG.
    Plot(PlotArgs),
    /// Summary statistics per Sila series.
    Stats,
    /// Indicator codes and names per Sila.
    Katalog,
}

#[derive(Args, Debug)]
struct NationalArgs {
    /// Year for the Sila snapshot (default: latest).
    #[arg(short, long)]
    year: Option<Period>,
    /// Also print the yearly growth of one Sila ("1" or "Sila 1").
    #[arg(short, long)]
    sila: Option<String>,
}

#[derive(Args, Debug)]
struct ProvinceArgs {
    /// Province name (case-insensitive).
    name: String,
    /// Year for the radar values (default: latest).
    #[arg(short, long)]
    year: Option<Period>,
    /// Print the indicator table of this Sila.
    #[arg(short, long)]
    sila: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TableView {
    /// Sila × year, national.
    Sila,
    /// Province × year for one Sila (or IAP).
    Provinsi,
    /// Indicator × year for one province and Sila.
    Indikator,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct TableArgs {
    #[arg(value_enum)]
    view: TableView,
    /// Sila filter for the provinsi and indikator views.
    #[arg(short, long, default_value = "IAP")]
    sila: String,
    /// Province for the indikator view.
    #[arg(short, long)]
    province: Option<String>,
    /// Save to file instead of printing (format from --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PlotKind {
    /// Sila values for one year.
    Sila,
    /// Indicator values for one year, grouped by Sila.
    Indikator,
    /// One Sila across years with growth labels.
    SilaTrend,
    /// Indicators of one Sila across years, grouped by indicator.
    IndikatorTrend,
    /// Indicators of one province and Sila across years.
    ProvinsiIndikator,
    /// Provinces ranked for one Sila and year.
    Ranking,
    /// Sila components per province, stacked.
    Stacked,
    /// Sila radar of one province.
    Radar,
}

#[derive(Args, Debug)]
struct PlotArgs {
    #[arg(value_enum)]
    kind: PlotKind,
    /// Output path (.svg).
    #[arg(long)]
    out: PathBuf,
    #[arg(short, long)]
    year: Option<Period>,
    #[arg(short, long, default_value = "1")]
    sila: String,
    #[arg(short, long)]
    province: Option<String>,
    /// Chart title (default depends on the chart).
    #[arg(long)]
    title: Option<String>,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(p) => DashboardConfig::load(p)?,
        None => DashboardConfig::default(),
    };
    if let Some(l) = &cli.locale {
        cfg.locale = l.clone();
    }
    let Some(data_path) = cli.data.as_ref() else {
        bail!("no data source given (use --data)");
    };
    let data = Dataset::load(data_path, &cfg.sheets)
        .with_context(|| format!("failed to load {}", data_path.display()))?;
    info!("loaded {}", data_path.display());
    let board = Dashboard::new(&data, &cfg);

    match cli.cmd {
        Command::Nasional(args) => cmd_national(&board, args),
        Command::Provinsi(args) => cmd_province(&board, args),
        Command::Tabel(args) => cmd_table(&board, args),
        Command::Plot(args) => cmd_plot(&board, args),
        Command::Stats => cmd_stats(&board),
        Command::Katalog => cmd_catalog(&board),
    }
}

fn latest_or(requested: Option<Period>, periods: &[Period]) -> Result<Period> {
    match requested.or_else(|| periods.last().copied()) {
        Some(p) => Ok(p),
        None => bail!("the data source holds no years"),
    }
}

fn cmd_national(board: &Dashboard, args: NationalArgs) -> Result<()> {
    let locale = board.config.locale.as_str();
    let trend = board.national_trend();
    println!("IAP nasional");
    for d in &trend.rows {
        println!(
            "  {}  {:>8}  {:>10}  vs {}: {}",
            d.row.period,
            format_opt(d.row.value, locale),
            format_change(d.delta, locale),
            board
                .config
                .baseline_period
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".into()),
            format_change(d.baseline_delta, locale),
        );
    }
    if let Some(text) = &trend.insight {
        println!("\n{text}");
    }

    let year = latest_or(args.year, &board.national_periods())?;
    let snapshot = board.sila_for_period(year);
    println!("\nSila {year}");
    for r in &snapshot.rows {
        println!(
            "  {:<8} {:>8}  {}",
            r.entity,
            format_opt(r.value, locale),
            r.label.as_deref().unwrap_or("")
        );
    }
    if let Some(ex) = &snapshot.extremes {
        println!("{}", extremes_sentence(ex, "Sila", locale));
    }

    if let Some(sila) = args.sila {
        println!("\n{}", normalize_sila(&sila));
        for d in board.sila_trend(&sila) {
            println!(
                "  {}  {:>8}  {}",
                d.row.period,
                format_opt(d.row.value, locale),
                d.delta.map(format_percent).unwrap_or_else(|| "-".into())
            );
        }
    }
    Ok(())
}

fn cmd_province(board: &Dashboard, args: ProvinceArgs) -> Result<()> {
    let locale = board.config.locale.as_str();
    let trend = board.province_trend(&args.name);
    if trend.rows.is_empty() {
        bail!("unknown province: {}", args.name);
    }
    println!("{}", trend.rows[0].row.entity);
    for d in &trend.rows {
        println!(
            "  {}  {:>8}  {:>10}",
            d.row.period,
            format_opt(d.row.value, locale),
            format_change(d.delta, locale)
        );
    }
    if let Some(text) = &trend.insight {
        println!("\n{text}");
    }

    if let Some(radar) = board.province_radar(&args.name, args.year) {
        println!("\nSila {}", radar.period);
        for (sila, v) in &radar.axes {
            println!("  {:<8} {:>8}", sila, format_opt(Some(*v), locale));
        }
        println!("  {:<8} {:>8}", "IAP", format_opt(radar.iap, locale));
    }

    if let Some(sila) = args.sila {
        println!();
        print_pivot(&board.province_indicator_table(&args.name, &sila), locale);
    }
    Ok(())
}

fn table_for(board: &Dashboard, args: &TableArgs) -> Result<PivotTable> {
    Ok(match args.view {
        TableView::Sila => board.sila_table(&[]),
        TableView::Provinsi => board.province_table(&args.sila),
        TableView::Indikator => {
            let Some(province) = args.province.as_deref() else {
                bail!("the indikator view needs --province");
            };
            board.province_indicator_table(province, &args.sila)
        }
    })
}

fn cmd_table(board: &Dashboard, args: TableArgs) -> Result<()> {
    let table = table_for(board, &args)?;
    let Some(path) = args.out.as_ref() else {
        print_pivot(&table, &board.config.locale);
        return Ok(());
    };
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_pivot_csv(&table, path)?,
        "json" => storage::save_pivot_json(&table, path)?,
        other => bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", table.records.len(), path.display());
    Ok(())
}

fn print_pivot(table: &PivotTable, locale: &str) {
    let mut header = format!("{:<12}", "");
    for p in &table.periods {
        header.push_str(&format!(" {:>9}", p));
    }
    for pair in &table.pairs {
        header.push_str(&format!(" {:>11}", format!("{}-{}", pair.later, pair.earlier)));
    }
    println!("{header}");
    for rec in &table.records {
        let mut line = format!("{:<12}", rec.entity);
        for c in &rec.cells {
            line.push_str(&format!(" {:>9}", format_opt(*c, locale)));
        }
        for d in &rec.deltas {
            line.push_str(&format!(" {:>11}", format_change(*d, locale)));
        }
        if let Some(label) = rec.label.as_deref().filter(|l| !l.is_empty()) {
            line.push_str(&format!("  {label}"));
        }
        println!("{line}");
    }
}

fn cmd_plot(board: &Dashboard, args: PlotArgs) -> Result<()> {
    let palette = Some(&board.config.group_colors);
    let (w, h) = (args.width, args.height);
    let out: &Path = &args.out;
    let sila = normalize_sila(&args.sila);
    let national_year = || latest_or(args.year, &board.national_periods());
    let province = || {
        args.province
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("this chart needs --province"))
    };
    let title = |default: String| args.title.clone().unwrap_or(default);

    match args.kind {
        PlotKind::Sila => {
            let year = national_year()?;
            let rows = board.sila_for_period(year).rows;
            let seq = iap_dashboard::grouping::group_with_gaps(&rows, |_| "");
            viz::plot_grouped_bars(&seq, out, w, h, &title(format!("IAP per Sila {year}")), palette)?;
        }
        PlotKind::Indikator => {
            let year = national_year()?;
            let seq = board.indicator_chart_for_period(year);
            viz::plot_grouped_bars(&seq, out, w, h, &title(format!("IAP per Indikator {year}")), palette)?;
        }
        PlotKind::SilaTrend => {
            let rows = board.sila_trend(&sila);
            let seq = iap_dashboard::grouping::group_with_gaps(&rows, |d| d.row.entity.as_str());
            viz::plot_grouped_bars(&seq, out, w, h, &title(format!("Tren {sila}")), palette)?;
        }
        PlotKind::IndikatorTrend => {
            let seq = board.indicator_trend_for_sila(&sila);
            viz::plot_grouped_bars(&seq, out, w, h, &title(format!("Tren Indikator {sila}")), palette)?;
        }
        PlotKind::ProvinsiIndikator => {
            let name = province()?;
            let seq = board.province_indicator_chart(name, &sila);
            viz::plot_grouped_bars(&seq, out, w, h, &title(format!("{name}: Indikator {sila}")), palette)?;
        }
        PlotKind::Ranking => {
            let periods = available_periods(&board.data.province_sila_rows());
            let year = latest_or(args.year, &periods)?;
            let ranking = board.province_ranking(&sila, year);
            let seq = iap_dashboard::grouping::group_with_gaps(&ranking.rows, |_| "");
            viz::plot_grouped_bars(&seq, out, w, h, &title(format!("{sila} per Provinsi {year}")), palette)?;
        }
        PlotKind::Stacked => {
            let periods = available_periods(&board.data.province_sila_rows());
            let year = latest_or(args.year, &periods)?;
            let bars = board.province_stacked(year);
            viz::plot_stacked_bars(&bars, out, w, h.max(900), &title(format!("Sila per Provinsi {year}")), palette)?;
        }
        PlotKind::Radar => {
            let name = province()?;
            let Some(radar) = board.province_radar(name, args.year) else {
                bail!("no Sila values for {name}");
            };
            let default = format!("{} {}", radar.province, radar.period);
            viz::plot_radar(&radar.axes, out, w.min(h).max(400), w.min(h).max(400), &title(default))?;
        }
    }
    eprintln!("Wrote plot to {}", out.display());
    Ok(())
}

fn cmd_stats(board: &Dashboard) -> Result<()> {
    for s in stats::series_summary(&board.data.sila_rows()) {
        println!(
            "{}  count={} missing={}  min={} max={} mean={} median={}",
            s.key.entity,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}

fn cmd_catalog(board: &Dashboard) -> Result<()> {
    for entry in board.indicator_catalog() {
        println!("{}", entry.sila);
        for i in &entry.indicators {
            println!("  {i}");
        }
    }
    Ok(())
}
