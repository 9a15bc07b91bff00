use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

use cohort_risk_pipeline::report;
use cohort_risk_pipeline::roster::RosterFilter;
use cohort_risk_pipeline::validate::Field;
use cohort_risk_pipeline::{ingest, pipeline, AssessedStudent, BatchReport, RiskTier, Roster};

#[derive(Parser)]
#[command(name = "cohort-risk")]
#[command(about = "Student dropout risk scoring and intervention planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the CSV upload template
    Template {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate and assess a CSV file
    Import {
        #[arg(long, env = "COHORT_RISK_CSV")]
        csv: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List students by risk score
    #[command(group(
        ArgGroup::new("scope")
            .args(["cohort", "search"])
            .multiple(false)
    ))]
    Score {
        #[arg(long, env = "COHORT_RISK_CSV")]
        csv: PathBuf,
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tier: Option<RiskTier>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Assess a single manually entered student
    Assess {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        cohort: String,
        #[arg(long)]
        attendance: String,
        #[arg(long)]
        absences: String,
        #[arg(long)]
        average: String,
        #[arg(long)]
        last: String,
        /// 1 when fees are paid
        #[arg(long, default_value = "1")]
        fee_paid: String,
        /// 1 when the student comes from an at-risk background
        #[arg(long, default_value = "0")]
        socioeconomic: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, env = "COHORT_RISK_CSV")]
        csv: PathBuf,
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Template { out } => match out {
            Some(path) => {
                std::fs::write(&path, ingest::TEMPLATE)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Template written to {}.", path.display());
            }
            None => print!("{}", ingest::TEMPLATE),
        },
        Commands::Import { csv, format } => {
            let batch = load_batch(&csv)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
                OutputFormat::Text => {
                    println!(
                        "Accepted {} students, rejected {} rows from {}.",
                        batch.accepted.len(),
                        batch.rejected.len(),
                        csv.display()
                    );
                    for student in &batch.accepted {
                        println!("- {}", report::student_line(student));
                    }
                    for error in &batch.rejected {
                        println!("! row {}: {}", error.row, error.reason);
                    }
                }
            }
        }
        Commands::Score {
            csv,
            cohort,
            search,
            tier,
            limit,
        } => {
            let roster = Roster::new().with_batch(&load_batch(&csv)?);
            let filter = RosterFilter {
                tier,
                cohort,
                search,
            };
            let ranked: Vec<&AssessedStudent> = roster
                .ranked()
                .into_iter()
                .filter(|student| filter.matches(student))
                .collect();

            if ranked.is_empty() {
                println!("No students match.");
                return Ok(());
            }

            println!("Top students by risk score:");
            for student in ranked.iter().take(limit) {
                println!(
                    "- {} across {} factors",
                    report::student_line(student),
                    student.assessment.factors.len()
                );
            }
        }
        Commands::Assess {
            id,
            name,
            cohort,
            attendance,
            absences,
            average,
            last,
            fee_paid,
            socioeconomic,
            format,
        } => {
            let fields: HashMap<String, String> = [
                (Field::Id, id),
                (Field::DisplayName, name),
                (Field::Cohort, cohort),
                (Field::AttendanceRate30, attendance),
                (Field::ConsecutiveAbsences, absences),
                (Field::AverageScore, average),
                (Field::LastScore, last),
                (Field::FeePaid, fee_paid),
                (Field::IsSocioeconomicRisk, socioeconomic),
            ]
            .into_iter()
            .map(|(field, value)| (field.column().to_string(), value))
            .collect();

            let student = pipeline::validate_single(&fields)
                .map_err(|error| anyhow::anyhow!("invalid entry: {}", error.reason))?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&student)?),
                OutputFormat::Text => print_assessment(&student),
            }
        }
        Commands::Report { csv, cohort, out } => {
            let batch = load_batch(&csv)?;
            let roster = Roster::new().with_batch(&batch);
            let filter = RosterFilter {
                cohort: cohort.clone(),
                ..RosterFilter::default()
            };
            let report = report::build_report(
                cohort.as_deref(),
                chrono::Utc::now(),
                &roster.query(&filter),
                &batch.rejected,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn load_batch(csv: &std::path::Path) -> anyhow::Result<BatchReport> {
    let batch = ingest::process_csv_path(csv)?;
    if let Some(error) = batch.structural_error() {
        anyhow::bail!("{} is not a usable student file: {}", csv.display(), error.reason);
    }
    Ok(batch)
}

fn print_assessment(student: &AssessedStudent) {
    println!("{}", report::student_line(student));
    for factor in &student.assessment.factors {
        println!("  factor: {factor}");
    }
    for plan in &student.plans {
        println!(
            "  plan: {} ({} priority, {})",
            plan.title,
            plan.priority.as_str(),
            plan.assigned_role
        );
        for step in plan.action_steps {
            println!("    - {step}");
        }
    }
}
