#![forbid(unsafe_code)]
use anyhow::Result;
use benevoles::{
    favourites::{toggle_favourite, LruFavouriteCache},
    interval::ShiftInterval,
    io,
    model::{ActivityId, EventId, ScheduleId, ShiftId, TeamId, UserId, VendorId},
    mutation_log::{format_mutation, MutationView},
    schedule::{ScheduleAggregator, SeededAdvicePicker},
    scheduler::{NewScheduledShift, SchedError, ScheduleUpdate, Scheduler},
    settings::Settings,
    storage::{JsonStore, Store},
    Grants, Permission, ViewerContext,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des bénévoles
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des données
    #[arg(long, global = true, default_value = "dataset.json")]
    data: String,

    /// Fichier JSON des réglages
    #[arg(long, global = true, default_value = "settings.json")]
    settings: String,

    /// Droits de l'utilisateur : "schedule-write,vendor-calendars,..."
    #[arg(long, global = true, value_delimiter = ',')]
    grant: Vec<Permission>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Vérifier qu'un créneau est compatible avec les disponibilités
    CheckShift {
        #[arg(long)]
        event: u64,
        #[arg(long)]
        user: u64,
        /// RFC3339 UTC
        #[arg(long)]
        start: String,
        /// RFC3339 UTC
        #[arg(long)]
        end: String,
        /// Shift planifié à ignorer (modification)
        #[arg(long)]
        ignore: Option<u64>,
    },

    /// Affecter un bénévole à un shift
    Assign {
        #[arg(long)]
        event: u64,
        #[arg(long)]
        shift: u64,
        #[arg(long)]
        user: u64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        actor: u64,
    },

    /// Modifier un shift planifié (bénévole, type, horaires)
    Update {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        shift: Option<u64>,
        #[arg(long)]
        user: Option<u64>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        actor: u64,
    },

    /// Retirer un shift planifié
    Remove {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        actor: u64,
    },

    /// Réconcilier le planning des prestataires depuis un CSV
    ReconcileVendors {
        #[arg(long)]
        team: u64,
        /// liste "1,2,..." des prestataires concernés
        #[arg(long, value_delimiter = ',')]
        resources: Vec<u64>,
        #[arg(long)]
        csv: String,
        #[arg(long)]
        actor: u64,
    },

    /// Construire le planning public
    Schedule {
        #[arg(long)]
        event: u64,
        #[arg(long)]
        viewer: Option<u64>,
        #[arg(long)]
        out: Option<String>,
    },

    /// Afficher le journal des modifications
    Log {
        #[arg(long)]
        event: Option<u64>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Ajouter ou retirer une activité favorite
    Favourite {
        #[arg(long)]
        event: u64,
        #[arg(long)]
        user: u64,
        #[arg(long)]
        activity: u64,
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

    let settings = Settings::load(&cli.settings)?;
    let store = JsonStore::open(&cli.data)?;

    let grants: Grants = cli.grant.into_iter().collect();
    let code = match run(cli.cmd, store, settings, grants) {
        Ok(code) => code,
        Err(Failure::Declined(err)) => {
            eprintln!("{err}");
            // Code 2 = refus métier
            2
        }
        Err(Failure::Fatal(err)) => return Err(err),
    };

    std::process::exit(code);
}

enum Failure {
    Declined(SchedError),
    Fatal(anyhow::Error),
}

impl From<SchedError> for Failure {
    fn from(err: SchedError) -> Self {
        match err {
            SchedError::Other(err) => Failure::Fatal(err),
            err => Failure::Declined(err),
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Failure::Fatal(err)
    }
}

fn run(
    cmd: Commands,
    store: JsonStore,
    settings: Settings,
    grants: Grants,
) -> Result<i32, Failure> {
    let now = Utc::now();
    let as_user = |user: u64| ViewerContext::new(Some(UserId(user)), grants.clone());

    match cmd {
        Commands::CheckShift {
            event,
            user,
            start,
            end,
            ignore,
        } => {
            let shift = ShiftInterval::new(parse_time(&start)?, parse_time(&end)?)
                .map_err(anyhow::Error::msg)?;
            let scheduler = Scheduler::new(store, settings);
            let valid = scheduler.is_valid_shift(
                EventId(event),
                UserId(user),
                &shift,
                ignore.map(ScheduleId),
            )?;
            if valid {
                println!("OK: shift fits the volunteer's availability");
                Ok(0)
            } else {
                Err(SchedError::ShiftUnavailable.into())
            }
        }
        Commands::Assign {
            event,
            shift,
            user,
            start,
            end,
            actor,
        } => {
            let scheduler = Scheduler::new(store, settings);
            let request = NewScheduledShift {
                event_id: EventId(event),
                shift_id: ShiftId(shift),
                user_id: UserId(user),
                start: parse_time(&start)?,
                end: parse_time(&end)?,
            };
            let id = scheduler.create_scheduled_shift(request, &as_user(actor), now)?;
            println!("scheduled shift {id} created");
            Ok(0)
        }
        Commands::Update {
            id,
            shift,
            user,
            start,
            end,
            actor,
        } => {
            let scheduler = Scheduler::new(store, settings);
            let update = ScheduleUpdate {
                shift_id: shift.map(ShiftId),
                user_id: user.map(UserId),
                start: start.as_deref().map(parse_time).transpose()?,
                end: end.as_deref().map(parse_time).transpose()?,
            };
            if scheduler.update_scheduled_shift(ScheduleId(id), update, &as_user(actor), now)? {
                println!("scheduled shift {id} updated");
            } else {
                println!("scheduled shift {id} unchanged");
            }
            Ok(0)
        }
        Commands::Remove { id, actor } => {
            let scheduler = Scheduler::new(store, settings);
            scheduler.delete_scheduled_shift(ScheduleId(id), &as_user(actor), now)?;
            println!("scheduled shift {id} removed");
            Ok(0)
        }
        Commands::ReconcileVendors {
            team,
            resources,
            csv,
            actor,
        } => {
            let target = io::import_vendor_schedule_csv(csv)?;
            let resources: Vec<VendorId> = resources.into_iter().map(VendorId).collect();
            let scheduler = Scheduler::new(store, settings);
            let report = scheduler.reconcile_vendor_schedule(
                TeamId(team),
                &resources,
                &target,
                &as_user(actor),
                now,
            )?;
            println!(
                "inserted {} | updated {} | removed {}",
                report.inserted.len(),
                report.updated.len(),
                report.deleted.len()
            );
            Ok(0)
        }
        Commands::Schedule { event, viewer, out } => {
            let dataset = store.load()?;
            let cache = LruFavouriteCache::new(settings.favourites_cache_capacity);
            let viewer = ViewerContext::new(viewer.map(UserId), grants.clone());
            let schedule = ScheduleAggregator::new(&dataset, &settings, &SeededAdvicePicker, &cache)
                .build(EventId(event), &viewer, now)?;
            match out {
                Some(path) => io::export_schedule_json(path, &schedule)?,
                None => println!(
                    "{}",
                    serde_json::to_string_pretty(&schedule).map_err(anyhow::Error::from)?
                ),
            }
            Ok(0)
        }
        Commands::Log { event, out_csv } => {
            let dataset = store.load()?;
            let event = event.map(EventId);
            if let Some(path) = out_csv {
                io::export_mutation_log_csv(path, &dataset, event)?;
            }
            for entry in dataset
                .mutation_log
                .iter()
                .filter(|e| event.map_or(true, |id| e.event_id == id))
            {
                println!(
                    "{} | {}",
                    entry.timestamp.to_rfc3339(),
                    format_mutation(&MutationView::describe(entry, &dataset))
                );
            }
            Ok(0)
        }
        Commands::Favourite {
            event,
            user,
            activity,
        } => {
            let cache = LruFavouriteCache::new(settings.favourites_cache_capacity);
            let added = toggle_favourite(
                &store,
                &cache,
                UserId(user),
                EventId(event),
                ActivityId(activity),
            )?;
            println!("{}", if added { "added" } else { "removed" });
            Ok(0)
        }
    }
}

fn parse_time(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    raw.parse()
        .map_err(|err| anyhow::anyhow!("invalid RFC3339 time {raw}: {err}"))
}
