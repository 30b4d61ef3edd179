#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use permanence::{
    handover::{prepare_handover, HandoverRenderer, TextHandover},
    io,
    model::{NewStaff, ShiftGroup, StaffId},
    scheduler::{
        slot_group, time_range_label, week_monday, week_offset, weeks_since_anchor, Scheduler,
    },
    storage::SqliteStore,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planning de permanence (SQLite)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier SQLite
    #[arg(long, global = true, env = "PERMANENCE_DB", default_value = "permanence.db")]
    db: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer le schéma et insérer l'équipe de référence si la base est vide
    Init,

    /// Gérer le personnel
    Staff {
        #[command(subcommand)]
        cmd: StaffCommands,
    },

    /// Importer du personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Générer (et remplacer) la semaine contenant la date
    Generate {
        /// YYYY-MM-DD, défaut : aujourd'hui
        #[arg(long)]
        week: Option<NaiveDate>,
    },

    /// Afficher une semaine
    Show {
        #[arg(long)]
        week: Option<NaiveDate>,
    },

    /// Vider une semaine
    Clear {
        #[arg(long)]
        week: Option<NaiveDate>,
    },

    /// Qui est de permanence, et qui prend la relève
    Who {
        #[arg(long)]
        date: NaiveDate,
        /// GroupA | GroupB (ou Ca13 | Ca24)
        #[arg(long, conflicts_with = "shift")]
        group: Option<ShiftGroup>,
        /// Numéro de poste (1..4 en semaine, 1..3 le week-end)
        #[arg(long)]
        shift: Option<u8>,
    },

    /// Exporter une semaine en CSV et/ou JSON
    Export {
        #[arg(long)]
        week: Option<NaiveDate>,
        #[arg(long)]
        csv: Option<String>,
        #[arg(long)]
        json: Option<String>,
    },

    /// Afficher le décalage de rotation d'une semaine
    Offset {
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Subcommand, Debug)]
enum StaffCommands {
    /// Lister le personnel
    List,
    /// Ajouter une personne
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Renommer une personne
    Rename {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    /// Retirer une personne de la rotation
    Deactivate {
        #[arg(long)]
        id: i64,
    },
    /// Supprimer une personne jamais planifiée
    Delete {
        #[arg(long)]
        id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let today = Local::now().date_naive();
    let mut scheduler = Scheduler::new(SqliteStore::open(&cli.db)?);

    let code = match cli.cmd {
        Commands::Init => {
            let n = scheduler.store().seed_reference_roster()?;
            println!("Database ready: {} ({} staff member(s) added)", cli.db, n);
            0
        }
        Commands::Staff { cmd } => match cmd {
            StaffCommands::List => {
                let ring = scheduler.ring()?;
                for (pos, m) in ring.iter().enumerate() {
                    println!("{:>2}. [{}] {}", pos + 1, m.id, m.full_name);
                }
                for m in scheduler.store().list_staff()?.iter().filter(|m| !m.active) {
                    println!(" -. [{}] {} (inactive)", m.id, m.full_name);
                }
                0
            }
            StaffCommands::Add {
                name,
                position,
                unit,
                phone,
                email,
            } => {
                let id = scheduler.store().add_staff(&NewStaff {
                    full_name: name,
                    position,
                    unit,
                    phone,
                    email,
                })?;
                println!("Added staff {id}");
                0
            }
            StaffCommands::Rename { id, name } => {
                if !scheduler.store().rename_staff(StaffId::new(id), &name)? {
                    bail!("unknown staff id: {id}");
                }
                println!("Renamed staff {id}");
                0
            }
            StaffCommands::Deactivate { id } => {
                if !scheduler.store().set_active(StaffId::new(id), false)? {
                    bail!("unknown staff id: {id}");
                }
                0
            }
            StaffCommands::Delete { id } => {
                if !scheduler.store().delete_staff(StaffId::new(id))? {
                    bail!("unknown staff id: {id}");
                }
                println!("Deleted staff {id}");
                0
            }
        },
        Commands::ImportStaff { csv } => {
            let people = io::import_staff_csv(csv)?;
            for p in &people {
                scheduler.store().add_staff(p)?;
            }
            println!("Imported {} staff member(s)", people.len());
            0
        }
        Commands::Generate { week } => {
            let monday = week_monday(week.unwrap_or(today))?;
            let persisted = scheduler.regenerate_week(monday)?;
            println!(
                "Generated week of {monday}: {} assignment(s)",
                persisted.len()
            );
            0
        }
        Commands::Show { week } => {
            let rows = scheduler.week_rows(week.unwrap_or(today))?;
            for row in &rows {
                let a = row.group_a.as_deref().unwrap_or("-");
                let b = row.group_b.as_deref().unwrap_or("-");
                println!(
                    "{} {} | A: {} [{}] | B: {} [{}]",
                    row.date,
                    row.date.format("%a"),
                    a,
                    time_range_label(row.date, ShiftGroup::GroupA),
                    b,
                    time_range_label(row.date, ShiftGroup::GroupB),
                );
            }
            if rows.iter().all(|r| r.is_empty()) {
                eprintln!("Week not generated yet");
                // Code 2 = WARNING/INCOMPLETE
                2
            } else {
                0
            }
        }
        Commands::Clear { week } => {
            let n = scheduler.clear_week(week.unwrap_or(today))?;
            println!("Removed {n} assignment(s)");
            0
        }
        Commands::Who { date, group, shift } => {
            let group = match (group, shift) {
                (Some(g), _) => g,
                (None, Some(n)) => slot_group(date, n)
                    .ok_or_else(|| anyhow::anyhow!("no shift {n} on {date}"))?,
                (None, None) => bail!("either --group or --shift is required"),
            };
            let handover = prepare_handover(scheduler.store(), date, group)?;
            print!("{}", TextHandover.render(&handover));
            0
        }
        Commands::Export { week, csv, json } => {
            let monday = week_monday(week.unwrap_or(today))?;
            let rows = scheduler.week_rows(monday)?;
            let csv = if csv.is_none() && json.is_none() {
                Some(io::default_export_name(monday, "csv"))
            } else {
                csv
            };
            if let Some(path) = csv {
                io::export_week_csv(&path, &rows)?;
                println!("Exported {path}");
            }
            if let Some(path) = json {
                io::export_week_json(&path, monday, &rows)?;
                println!("Exported {path}");
            }
            0
        }
        Commands::Offset { date } => {
            let n = scheduler.ring()?.len();
            println!(
                "week of {}: {} week(s) from anchor, offset {} (ring of {})",
                week_monday(date)?,
                weeks_since_anchor(date),
                week_offset(date, n),
                n
            );
            0
        }
    };

    std::process::exit(code);
}
