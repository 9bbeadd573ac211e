use anyhow::Context;
use api_shared::PatientRes;
use clap::{Parser, Subcommand};
use records_core::validation::check_positive;
use records_core::{
    compute_bmi, compute_verdict, CoreConfig, NewPatient, PatientCollection, PatientPatch,
    PatientService, ValidationErrors, WireCollection, DEFAULT_PATIENT_DATA_FILE,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

const SEED_PATIENTS: &str = include_str!("../../../data/patients.json");

#[derive(Parser)]
#[command(name = "records")]
#[command(about = "Patient records administration CLI")]
struct Cli {
    /// JSON file holding the patient collection
    #[arg(
        long,
        global = true,
        env = "PATIENT_DATA_FILE",
        default_value = DEFAULT_PATIENT_DATA_FILE
    )]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data file
    Init {
        /// Replace an existing data file
        #[arg(long)]
        force: bool,
        /// Fill the new file with the bundled sample patients
        #[arg(long)]
        seed: bool,
    },
    /// List all patients
    List,
    /// Show one patient
    Show {
        /// Patient id
        id: String,
    },
    /// List patients sorted by age, name, height or weight
    Sorted {
        /// Field to sort by
        sort_by: String,
        /// asc or desc
        order: String,
    },
    /// Create a patient from a JSON object holding every field including id
    Create {
        /// e.g. '{"id":"P007","name":"Asha Rao","city":"Goa","age":33,"gender":"female",
        /// "height":162,"weight":58}'
        json: String,
    },
    /// Apply a partial update given as a JSON object
    Update {
        /// Patient id
        id: String,
        /// e.g. '{"weight":80}'
        json: String,
    },
    /// Delete a patient
    Delete {
        /// Patient id
        id: String,
    },
    /// Compute BMI and verdict without touching the data file
    Bmi {
        /// Height in centimetres
        height: f64,
        /// Weight in kilograms
        weight: f64,
    },
}

fn seed_collection() -> anyhow::Result<PatientCollection> {
    let wire: WireCollection =
        serde_json::from_str(SEED_PATIENTS).context("bundled seed data is not valid JSON")?;
    Ok(PatientCollection::from_wire(wire)?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = CoreConfig::new(cli.data_file);
    let service = PatientService::new(cfg.file_store());

    match cli.command {
        Some(Commands::Init { force, seed }) => {
            let collection = if seed {
                seed_collection()?
            } else {
                PatientCollection::new()
            };
            service.store().initialise(&collection, force)?;
            println!(
                "Initialised {} with {} patients",
                cfg.patient_data_file().display(),
                collection.len()
            );
        }
        Some(Commands::List) => {
            let collection = service.list_patients()?;
            if collection.is_empty() {
                println!("No patients found.");
            } else {
                let patients: BTreeMap<String, PatientRes> = collection
                    .records()
                    .map(|r| (r.id().to_string(), PatientRes::from(r)))
                    .collect();
                print_json(&patients)?;
            }
        }
        Some(Commands::Show { id }) => {
            let record = service.get_patient(&id)?;
            print_json(&PatientRes::from(&record))?;
        }
        Some(Commands::Sorted { sort_by, order }) => {
            let records = service.sorted_patients(&sort_by, &order)?;
            let patients: Vec<PatientRes> = records.iter().map(PatientRes::from).collect();
            print_json(&patients)?;
        }
        Some(Commands::Create { json }) => {
            let new: NewPatient =
                serde_json::from_str(&json).context("could not parse patient JSON")?;
            let record = service.create_patient(new)?;
            println!("Created patient {}", record.id());
            print_json(&PatientRes::from(&record))?;
        }
        Some(Commands::Update { id, json }) => {
            let patch: PatientPatch =
                serde_json::from_str(&json).context("could not parse update JSON")?;
            let record = service.update_patient(&id, patch)?;
            println!("Updated patient {}", record.id());
            print_json(&PatientRes::from(&record))?;
        }
        Some(Commands::Delete { id }) => {
            service.delete_patient(&id)?;
            println!("Deleted patient {}", id);
        }
        Some(Commands::Bmi { height, weight }) => {
            let mut errors = ValidationErrors::new();
            check_positive("height", height, &mut errors);
            check_positive("weight", weight, &mut errors);
            errors.into_result(())?;

            let bmi = compute_bmi(height, weight);
            println!("BMI: {:.2}, Verdict: {}", bmi, compute_verdict(bmi));
        }
        None => {
            println!("Use 'records --help' for commands");
        }
    }

    Ok(())
}
