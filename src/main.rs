use clap::Parser;
use lib::{
    EngineConfig, FilterCriteria, PipelineError, SimpleLogger, compute, read_observations,
    summarize, write_baselines_csv, write_csv, write_json, write_parquet, write_summary_json,
};
use log::debug;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

static LOGGER: SimpleLogger = SimpleLogger;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// input CSV or Parquet file with DATE, MIN_TEMP_CELSIUS and MAX_TEMP_CELSIUS columns
    #[arg(short, long)]
    input_file: PathBuf,

    /// Output base name (will create dir containing .csv, .json, and .parquet files)
    #[arg(short, long, default_value = "output")]
    output: String,

    /// Years to display (e.g., 2019,2020). If not specified, shows all years.
    #[arg(short, long, value_delimiter = ',')]
    years: Vec<i32>,

    /// Month to display (1-12, optional)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Day of month to display (1-31, optional)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    day: Option<u32>,

    /// Z-score above which a day is a heat wave
    #[arg(long, default_value_t = 2.0)]
    heat_threshold: f64,

    /// Z-score below which a day is a cold snap
    #[arg(long, default_value_t = -2.0, allow_negative_numbers = true)]
    cold_threshold: f64,

    /// Mean temperature (Celsius) above which a day is hot
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    hot_day: f64,

    /// Mean temperature (Celsius) below which a day is cold
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    cold_day: f64,

    /// Streak length from which days are reported as unusual
    #[arg(long, default_value_t = 3)]
    streak_alert: u32,

    /// Log level for output
    #[arg(long, default_value = "false")]
    debug: bool,
}

fn main() -> Result<(), PipelineError> {
    // Initialize timer and logger
    let total_start = Instant::now();
    log::set_logger(&LOGGER).map_err(|e| PipelineError::Data(e.to_string()))?;

    // Acquire CLI args
    let args = Args::parse();
    if args.debug {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Info);
    }

    println!("Weather anomaly detection");
    let config = EngineConfig {
        heat_wave_z: args.heat_threshold,
        cold_snap_z: args.cold_threshold,
        hot_day_temp: args.hot_day,
        cold_day_temp: args.cold_day,
        streak_alert_len: args.streak_alert,
    };
    let criteria = FilterCriteria {
        years: args.years.clone(),
        month: args.month,
        day: args.day,
    };
    debug!("Input file: {}", args.input_file.display());
    debug!("Engine configuration: {:?}", config);
    debug!("Display filter: {:?}", criteria);

    // Baselines always come from the whole file; the filter only shapes the output
    let processing_start = Instant::now();
    let observations = read_observations(&args.input_file)?;
    let output = compute(&observations, &config)?;
    let summary = summarize(&output.records, &config);
    let view = output.filter(&criteria);
    let processing_time = processing_start.elapsed();
    println!(
        "Classified {} records in {:.2?} | Showing {} record(s) for selected date(s)",
        output.records.len(),
        processing_time,
        view.len()
    );

    println!("Total heat waves detected: {}", summary.heat_waves);
    println!("Total cold snaps detected: {}", summary.cold_snaps);
    if let Some(day) = &summary.hottest_day {
        println!("Record hottest day: {}", day.date);
    }
    if let Some(day) = &summary.coldest_day {
        println!("Record coldest day: {}", day.date);
    }
    println!(
        "Unusual heat streak days: {} | Unusual cold streak days: {}",
        summary.unusual_heat_streaks.len(),
        summary.unusual_cold_streaks.len()
    );
    for day in summary
        .unusual_heat_streaks
        .iter()
        .chain(summary.unusual_cold_streaks.iter())
    {
        debug!("  {} mean={:?}", day.date, day.mean_temp);
    }

    // Create output directory
    let output_dir = PathBuf::from(format!("./output/{}", args.output));
    fs::create_dir_all(&output_dir)?;
    println!(
        "Created output directory: {} | Writing output files...",
        output_dir.display()
    );
    let io_start = Instant::now();

    // Extract just the directory name for the file names (remove path separators)
    let output_name = args
        .output
        .split(['/', '\\'])
        .next_back()
        .unwrap_or(&args.output);
    let csv_path = output_dir.join(format!("{}.csv", output_name));
    let json_path = output_dir.join(format!("{}.json", output_name));
    let parquet_path = output_dir.join(format!("{}.parquet", output_name));
    let baselines_path = output_dir.join(format!("{}_baselines.csv", output_name));
    let summary_path = output_dir.join(format!("{}_summary.json", output_name));

    write_csv(&view, &csv_path)?;
    write_json(&view, &json_path)?;
    write_parquet(&view, &parquet_path)?;
    write_baselines_csv(&output.baselines, &baselines_path)?;
    write_summary_json(&summary, &summary_path)?;

    println!("All files took {:.2?}", io_start.elapsed());
    println!("\nWrote files to directory: {}", output_dir.display());
    for path in [&csv_path, &json_path, &parquet_path, &baselines_path, &summary_path] {
        debug!("  - {}", path.display());
    }

    println!("\nTotal runtime: {:.2?}", total_start.elapsed());
    Ok(())
}
