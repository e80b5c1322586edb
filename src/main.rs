//! Rental Billing CLI
//!
//! Operator front end for buildings, rooms, tenants, meter readings,
//! bills and revenue.
//!
//! ```sh
//! # Default config (~/.config/rental-billing/config.toml)
//! rental-billing building add --name "Riverside"
//! rental-billing room add --building 1 --number 101 --rent 8000 --water 200 --electric 1000
//! rental-billing room assign --room 1 --name "Anong"
//! rental-billing room readings --room 1 --water 215 --electric 1003
//! rental-billing bills
//! rental-billing revenue
//!
//! # Custom config path
//! rental-billing --config /etc/rental-billing/config.toml check
//! ```

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};

use rental_billing::application::{MeterReadings, RevenueReport};
use rental_billing::domain::billing::PeriodKey;
use rental_billing::domain::revenue::RevenueRecord;
use rental_billing::domain::{
    format_money, NewBuilding, NewRoom, NewTenant, TariffConfiguration, UtilityKind,
    UtilityTariff,
};
use rental_billing::infrastructure::run_migrations;
use rental_billing::{default_config_path, init_tracing, AppConfig, AppHandle, AppOptions};

/// Rental property billing: rent plus tiered water and electric charges.
#[derive(Parser, Debug)]
#[command(name = "rental-billing", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "RENTAL_BILLING_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Skip database migrations on startup.
    #[arg(long, global = true)]
    no_migrate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and print it.
    Check,
    /// Apply database migrations and exit.
    Migrate,
    /// Manage buildings.
    #[command(subcommand)]
    Building(BuildingCommand),
    /// Manage rooms, tenants and meter readings.
    #[command(subcommand)]
    Room(RoomCommand),
    /// Start a new billing cycle: current readings become the baseline.
    Cycle {
        #[arg(long)]
        building: Option<i32>,
    },
    /// Print bills for occupied rooms.
    Bills {
        #[arg(long)]
        building: Option<i32>,
        #[arg(long, conflicts_with = "building")]
        room: Option<i32>,
    },
    /// Recompute and save this month's revenue.
    Revenue,
    /// Show saved revenue snapshots.
    History {
        /// Number of months to show.
        #[arg(long, default_value_t = 12)]
        limit: u64,
        /// Show a single period (YYYY-MM).
        #[arg(long)]
        period: Option<PeriodKey>,
    },
    /// Show or change utility tariffs.
    #[command(subcommand)]
    Tariffs(TariffCommand),
}

#[derive(Subcommand, Debug)]
enum BuildingCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum RoomCommand {
    Add {
        #[arg(long)]
        building: i32,
        #[arg(long)]
        number: String,
        /// Base monthly rent
        #[arg(long)]
        rent: Decimal,
        /// Initial water meter reading
        #[arg(long, default_value_t = 0)]
        water: i64,
        /// Initial electric meter reading
        #[arg(long, default_value_t = 0)]
        electric: i64,
    },
    List {
        #[arg(long)]
        building: Option<i32>,
    },
    /// Move a tenant into a vacant room.
    Assign(AssignArgs),
    /// End the room's tenancy.
    Vacate {
        #[arg(long)]
        room: i32,
    },
    /// Record current meter readings.
    Readings {
        #[arg(long)]
        room: i32,
        #[arg(long)]
        water: Option<i64>,
        #[arg(long)]
        electric: Option<i64>,
    },
}

#[derive(Args, Debug)]
struct AssignArgs {
    #[arg(long)]
    room: i32,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: Option<String>,
    /// Lease rent; the room's base rent applies when omitted
    #[arg(long)]
    rent: Option<Decimal>,
    /// Lease start (YYYY-MM-DD), today when omitted
    #[arg(long)]
    start: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum TariffCommand {
    Show,
    Set {
        utility: UtilityKind,
        #[arg(long)]
        rate: Decimal,
        #[arg(long)]
        minimum_charge: Decimal,
        #[arg(long)]
        minimum_units: i64,
    },
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = match AppConfig::load(&config_path) {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .with_writer(std::io::stderr)
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    if let Command::Check = cli.command {
        println!("Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   Database     : {}", config.database.url);
        println!("   Tariff store : {}", config.tariff_store_path().display());
        println!("   Currency     : {}", config.billing.currency);
        println!("   Log level    : {}", config.logging.level);
        return Ok(());
    }

    let app = AppHandle::start(AppOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    let result = run(&app, cli.command).await;
    app.close().await?;
    result
}

async fn run(app: &AppHandle, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let currency = app.config.billing.currency.as_str();

    match command {
        Command::Check => {}
        Command::Migrate => {
            run_migrations(app.db()).await?;
            println!("Migrations applied");
        }

        Command::Building(BuildingCommand::Add { name, address }) => {
            let b = app.rooms.add_building(NewBuilding { name, address }).await?;
            println!("Building {} created: {}", b.id, b.name);
        }
        Command::Building(BuildingCommand::List) => {
            for b in app.rooms.list_buildings().await? {
                println!(
                    "{:>4}  {:<24} {}",
                    b.id,
                    b.name,
                    b.address.as_deref().unwrap_or("-")
                );
            }
        }

        Command::Room(RoomCommand::Add {
            building,
            number,
            rent,
            water,
            electric,
        }) => {
            let room = app
                .rooms
                .add_room(
                    NewRoom {
                        building_id: building,
                        room_number: number,
                        rent_price: rent,
                        water_reading: water,
                        electric_reading: electric,
                    },
                    now,
                )
                .await?;
            println!("Room {} created: {}", room.id, room.room_number);
        }
        Command::Room(RoomCommand::List { building }) => {
            for room in app.rooms.list_rooms(building).await? {
                println!(
                    "{:>4}  b{:<3} {:<8} {:>14}  water {:>6}->{:<6} electric {:>6}->{:<6} {}",
                    room.id,
                    room.building_id,
                    room.room_number,
                    format_money(room.rent_price, currency),
                    room.water.previous,
                    room.water.current,
                    room.electric.previous,
                    room.electric.current,
                    room.tenant_name().unwrap_or("(vacant)")
                );
            }
        }
        Command::Room(RoomCommand::Assign(args)) => {
            let lease = app
                .rooms
                .assign_tenant(
                    args.room,
                    NewTenant {
                        full_name: args.name,
                        phone: args.phone,
                        monthly_rent: args.rent,
                        start_date: args.start.unwrap_or_else(|| now.date_naive()),
                    },
                    now,
                )
                .await?;
            println!("Room {} leased to {}", args.room, lease.tenant_name);
        }
        Command::Room(RoomCommand::Vacate { room }) => {
            if app.rooms.vacate_room(room, now).await? {
                println!("Room {} vacated", room);
            } else {
                println!("Room {} was already vacant", room);
            }
        }
        Command::Room(RoomCommand::Readings {
            room,
            water,
            electric,
        }) => {
            let updated = app
                .rooms
                .record_readings(room, MeterReadings { water, electric }, now)
                .await?;
            println!(
                "Room {}: water {} units, electric {} units this cycle",
                updated.room_number,
                updated.water.units_consumed(),
                updated.electric.units_consumed()
            );
        }

        Command::Cycle { building } => {
            let rolled = app.rooms.start_new_cycle(building, now).await?;
            println!("New billing cycle started for {} rooms", rolled);
        }

        Command::Bills { building, room } => {
            let bills: Vec<_> = match room {
                Some(id) => app.billing.bill_for_room(id, now).await?.into_iter().collect(),
                None => app.billing.bills(building, now).await?,
            };
            if bills.is_empty() {
                println!("No occupied rooms to bill");
            }
            for rb in bills {
                let b = &rb.bill;
                println!("Room {} ({}) - {}", rb.room_number, rb.tenant_name, b.period_key);
                println!("   Rent     : {}", format_money(b.rent_amount, currency));
                println!(
                    "   Water    : {} ({} units)",
                    format_money(b.water_cost, currency),
                    b.water_units
                );
                println!(
                    "   Electric : {} ({} units)",
                    format_money(b.electric_cost, currency),
                    b.electric_units
                );
                println!("   Total    : {}", format_money(b.total_amount, currency));
                println!("   Due      : {}", b.due_date);
            }
        }

        Command::Revenue => {
            let report = app.revenue.refresh(now).await?;
            print_report(&report, currency);
        }
        Command::History { limit, period } => {
            let records: Vec<_> = match period {
                Some(p) => app.revenue.record(p).await?.into_iter().collect(),
                None => app.revenue.history(limit).await?,
            };
            if records.is_empty() {
                println!("No revenue history");
            }
            for r in &records {
                print_record(r, currency);
            }
        }

        Command::Tariffs(TariffCommand::Show) => {
            print_tariffs(&app.tariffs.current()?, currency);
        }
        Command::Tariffs(TariffCommand::Set {
            utility,
            rate,
            minimum_charge,
            minimum_units,
        }) => {
            let tariff = UtilityTariff::new(rate, minimum_charge, minimum_units);
            let next = app.tariffs.update(utility, tariff, now).await?;
            print_tariffs(&next, currency);
        }
        Command::Tariffs(TariffCommand::Reset) => {
            let defaults = app.tariffs.reset(now).await?;
            print_tariffs(&defaults, currency);
        }
    }
    Ok(())
}

fn print_report(report: &RevenueReport, currency: &str) {
    let b = &report.breakdown;
    println!("Revenue {}", b.period_key);
    println!("   Occupied rooms : {}", b.occupied_room_count);
    println!("   Rent           : {}", format_money(b.rent_subtotal, currency));
    println!("   Water          : {}", format_money(b.water_subtotal, currency));
    println!("   Electric       : {}", format_money(b.electric_subtotal, currency));
    println!("   Total          : {}", format_money(b.total_revenue, currency));
    println!(
        "   vs {}        : {} ({})",
        b.period_key.previous(),
        format_money(report.change.absolute_change, currency),
        report.change.percentage_display()
    );
    for (building_id, part) in &report.buildings {
        println!(
            "   Building {:<5} : {} ({} rooms)",
            building_id,
            format_money(part.total_revenue, currency),
            part.occupied_room_count
        );
    }
    if !report.persisted {
        println!("   (snapshot could not be saved; see log)");
    }
}

fn print_record(r: &RevenueRecord, currency: &str) {
    println!(
        "{}  {:>16}  rooms {:>3}  rent {}  water {}  electric {}",
        r.period_key,
        format_money(r.total_revenue, currency),
        r.occupied_room_count,
        format_money(r.rent_subtotal, currency),
        format_money(r.water_subtotal, currency),
        format_money(r.electric_subtotal, currency)
    );
}

fn print_tariffs(tariffs: &TariffConfiguration, currency: &str) {
    for utility in UtilityKind::ALL {
        let t = tariffs.get(utility);
        println!(
            "{:<9} {} per unit, minimum {} covers {} units",
            utility.as_str(),
            format_money(t.rate_per_unit, currency),
            format_money(t.minimum_charge, currency),
            t.minimum_units
        );
    }
}
