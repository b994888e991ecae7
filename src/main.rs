mod config;

use std::fs::File;

use clap::{Parser, Subcommand};
use config::*;
use portal::models::TeamRegistration;
use portal::operations;
use portal::services::{IdentityService, Supabase};
use portal::validation::validate_roster;

#[derive(Debug, Parser)]
#[clap(author, version)]
struct Arguments {
    #[clap(short = 'f', long = "filename")]
    config: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a roster file without registering anything.
    Validate { roster: String },
    /// Validate a roster file and register the team.
    Register { roster: String },
    /// Approve a team's payment reference (admin).
    Verify { team_id: String },
    /// Refuse a team's payment reference (admin).
    Reject { team_id: String },
    /// Record a verified team's project deliverable.
    Submit {
        team_id: String,
        repository_url: String,
        #[clap(long)]
        live_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args: Arguments = Arguments::parse();
    let config = match Configuration::load(args.config) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("couldn't read config file: {:?}", err);
            std::process::exit(1);
        },
    };

    if let Err(reason) = run(args.command, config).await {
        tracing::error!("finished unsuccessfully: {:?}", reason);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: Configuration) -> anyhow::Result<()> {
    let supabase = Supabase::new(config.supabase.into())?;

    match command {
        Commands::Validate { roster } => {
            let registration = load_roster(&roster)?;
            let report = validate_roster(&registration.leader, &registration.members);
            if report.is_valid() {
                println!("roster is valid");
            } else {
                print_report(&report);
                anyhow::bail!("roster has {} problem(s)", report.len());
            }
        },
        Commands::Register { roster } => {
            let registration = load_roster(&roster)?;
            match operations::register_team(&supabase, &registration).await {
                Ok(record) => println!(
                    "registered team {} (id {})",
                    record.team_name,
                    record.id.unwrap_or_default()
                ),
                Err(operations::RegistrationError::InvalidRoster(report)) => {
                    print_report(&report);
                    anyhow::bail!("roster has {} problem(s)", report.len());
                },
                Err(err) => return Err(err.into()),
            }
        },
        Commands::Verify { team_id } => {
            sign_in_admin(&supabase, &config.admin).await?;
            let record = operations::verify_payment(&supabase, &supabase, &team_id).await?;
            println!("team {} is now verified", record.team_name);
        },
        Commands::Reject { team_id } => {
            sign_in_admin(&supabase, &config.admin).await?;
            let record = operations::reject_payment(&supabase, &supabase, &team_id).await?;
            println!("team {} was rejected", record.team_name);
        },
        Commands::Submit {
            team_id,
            repository_url,
            live_url,
        } => {
            let submission =
                operations::submit_project(&supabase, &team_id, &repository_url, live_url).await?;
            println!(
                "submission recorded for team {} (id {})",
                submission.team_id,
                submission.id.unwrap_or_default()
            );
        },
    }

    Ok(())
}

fn load_roster(path: &str) -> anyhow::Result<TeamRegistration> {
    let file = File::open(path)?;
    Ok(serde_yaml::from_reader(file)?)
}

fn print_report(report: &portal::validation::ValidationReport) {
    for (slot, field, error) in report.iter() {
        println!("{}: {}: {}", slot, field, error);
    }
}

async fn sign_in_admin(
    supabase: &Supabase,
    admin: &Option<AdminConfiguration>,
) -> anyhow::Result<()> {
    let admin = admin
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("admin credentials are missing from the config file"))?;
    supabase.sign_in(&admin.email, &admin.password).await?;
    Ok(())
}
