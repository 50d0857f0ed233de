use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use wardboard_core::{
    csv_codec::{write_csv, write_csv_with_columns},
    sample::sample_patients,
    stats::StatsReport,
    CoreConfig, PatientStore, RemoteLoader,
};

#[derive(Parser)]
#[command(name = "wardboard")]
#[command(about = "Hospital dashboard data CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the built-in sample dataset as CSV
    Sample,
    /// Fetch the published sheet and report how the load went
    Fetch {
        /// Spreadsheet CSV URL (defaults to WARDBOARD_SHEETS_URL or the demo sheet)
        #[arg(long)]
        url: Option<String>,
        /// Request timeout in seconds, 1-60
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Write the loaded records to this CSV file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print disease, doctor, monthly and KPI statistics for a CSV file as JSON
    Stats {
        /// CSV file with name, doctor, admitDate, disease and roomNo columns
        file: PathBuf,
        /// Reference date for the new-patient window (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<String>,
    },
    /// List the records in a CSV file
    List {
        /// CSV file with name, doctor, admitDate, disease and roomNo columns
        file: PathBuf,
    },
}

fn load_store(file: &Path) -> Result<PatientStore, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(file)?;
    let store = PatientStore::new();
    store.import_csv(&text)?;
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Sample) => {
            print!("{}", write_csv(&sample_patients())?);
        }
        Some(Commands::Fetch {
            url,
            timeout_secs,
            out,
        }) => {
            let cfg = CoreConfig::from_env_values(
                url.or_else(|| std::env::var("WARDBOARD_SHEETS_URL").ok()),
                timeout_secs.map(|secs| secs.to_string()),
            )?;
            let report = RemoteLoader::new().load(&cfg.dataset_source()).await;
            println!(
                "Loaded {} patients from {} ({})",
                report.records.len(),
                cfg.sheets_url(),
                report.outcome
            );
            if report.outcome.is_fallback() {
                eprintln!("Remote sheet unusable, sample data was used instead");
            }
            if let Some(path) = out {
                let csv = write_csv_with_columns(&report.columns, &report.records)?;
                std::fs::write(&path, csv)?;
                println!("Wrote {}", path.display());
            }
        }
        Some(Commands::Stats { file, today }) => {
            let today = match today {
                Some(raw) => chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?,
                None => chrono::Local::now().date_naive(),
            };
            let store = load_store(&file)?;
            let report = StatsReport::compute(&store.snapshot(), today);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Commands::List { file }) => {
            let store = load_store(&file)?;
            let patients = store.list();
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for (index, patient) in patients.iter().enumerate() {
                    let record = &patient.record;
                    println!(
                        "{}: {} | {} | {} | {} | room {} [{}]",
                        index,
                        record.name.as_deref().unwrap_or("-"),
                        record.doctor.as_deref().unwrap_or("-"),
                        record.admit_date.as_deref().unwrap_or("-"),
                        record.disease.as_deref().unwrap_or("-"),
                        record.room_no.as_deref().unwrap_or("-"),
                        patient.id
                    );
                }
            }
        }
        None => {
            println!("Use 'wardboard --help' for commands");
        }
    }

    Ok(())
}
