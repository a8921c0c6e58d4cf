//! Subcommands and their output.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use fleet_core::{
  Committed, Workspace,
  alert::license_alerts,
  clock::Env,
  driver::NewDriver,
  log::{LogEntry, LogKind},
  query::LogFilter,
  store::CollectionStore,
  vehicle::NewVehicle,
};
use uuid::Uuid;

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Print the current licence expiry alerts, most urgent first.
  Alerts,

  /// List stored notifications.
  Notifications {
    /// Only show notifications that have not been read.
    #[arg(long)]
    unread: bool,
  },

  /// Mark a notification as read.
  Read { id: Uuid },

  /// Show recent activity.
  History {
    /// Show the full retained history instead of the most recent entries.
    #[arg(long)]
    all: bool,
  },

  /// Search drivers and vehicles.
  Search { query: String },

  /// Dashboard counters.
  Stats,

  /// List log entries matching the given filters, with their total amount.
  Report {
    #[arg(long = "vehicle", value_name = "ID")]
    vehicles: Vec<Uuid>,
    #[arg(long = "driver", value_name = "ID")]
    drivers:  Vec<Uuid>,
    /// remittance, maintenance, expense or incident.
    #[arg(long = "kind")]
    kinds:    Vec<LogKind>,
    #[arg(long)]
    from:     Option<NaiveDate>,
    #[arg(long)]
    to:       Option<NaiveDate>,
  },

  /// Register a driver.
  AddDriver {
    name:           String,
    license_number: String,
    #[arg(long, default_value = "")]
    phone:          String,
    #[arg(long, default_value = "")]
    email:          String,
    /// Defaults to today.
    #[arg(long)]
    joined:         Option<NaiveDate>,
  },

  /// Register a vehicle.
  AddVehicle {
    plate_number:   String,
    make:           String,
    model:          String,
    year:           u16,
    #[arg(long, default_value = "")]
    license_number: String,
    #[arg(long)]
    license_expiry: Option<NaiveDate>,
  },

  /// Assign an available vehicle to an active driver.
  Assign { vehicle: Uuid, driver: Uuid },

  /// End a vehicle's active assignment.
  Unassign { vehicle: Uuid },

  /// Delete a driver with their assignments and log entries.
  RemoveDriver { id: Uuid },

  /// Delete a vehicle with its assignments and log entries.
  RemoveVehicle { id: Uuid },

  /// Delete the activity log.
  ClearHistory,

  /// Delete all notifications.
  ClearNotifications,
}

/// Print a warning for every save that failed. The change itself is kept for
/// the rest of the session.
pub fn warn_unsaved<T>(out: Committed<T>) -> T {
  for failure in &out.failures {
    eprintln!("warning: change was not saved: {failure}");
  }
  out.value
}

pub async fn run<S: CollectionStore>(
  ws: &mut Workspace<S>,
  env: &Env,
  command: Command,
) -> Result<()> {
  match command {
    Command::Alerts => {
      let alerts = license_alerts(ws.repository().vehicles(), env.now(), ws.notifications().policy());
      if alerts.is_empty() {
        println!("No licence alerts.");
      }
      for alert in alerts {
        println!(
          "{:<8} {:<7} {:<12} {}  {}",
          alert.bucket.to_string(),
          alert.priority().to_string(),
          alert.plate_number,
          alert.expiry_date,
          alert.message()
        );
      }
    }

    Command::Notifications { unread } => {
      let items: Vec<_> = ws
        .notifications()
        .items()
        .iter()
        .filter(|n| !unread || !n.read)
        .collect();
      if items.is_empty() {
        println!("No notifications.");
      }
      for n in items {
        let marker = if n.read { " " } else { "*" };
        println!(
          "{marker} {}  [{}] {}: {}  ({})",
          n.created_at.format("%Y-%m-%d %H:%M"),
          n.priority.to_string().to_uppercase(),
          n.title,
          n.message,
          n.id
        );
      }
      println!("{} unread", ws.notifications().unread_count());
    }

    Command::Read { id } => {
      let Some(out) = ws.notifications_mut().mark_read(id).await else {
        bail!("no notification with id {id}");
      };
      let n = warn_unsaved(out);
      println!("Marked \"{}\" as read.", n.message);
    }

    Command::History { all } => {
      let records = if all { ws.activity().all() } else { ws.activity().recent() };
      if records.is_empty() {
        println!("No recent activity.");
      }
      for r in records {
        println!("{}  {:<10} {}", r.date.format("%Y-%m-%d %H:%M"), r.kind.to_string(), r.message);
      }
    }

    Command::Search { query } => {
      let result = warn_unsaved(ws.note_search(&query).await);
      if result.is_empty() {
        println!("Nothing matches \"{query}\".");
      }
      for d in &result.drivers {
        println!("driver   {}  {} ({}, {})", d.id, d.name, d.license_number, d.status);
      }
      for v in &result.vehicles {
        println!(
          "vehicle  {}  {} {} {} ({})",
          v.id, v.plate_number, v.make, v.model, v.status
        );
      }
    }

    Command::Stats => {
      let stats = ws.repository().stats();
      println!("Drivers:             {} ({} active)", stats.total_drivers, stats.active_drivers);
      println!("Vehicles:            {}", stats.total_vehicles);
      println!("  available:         {}", stats.available_vehicles);
      println!("  assigned:          {}", stats.assigned_vehicles);
      println!("  maintenance:       {}", stats.vehicles_under_maintenance);
      println!("Remittances paid:    {:.2}", stats.total_remittances);
      println!("Remittances pending: {:.2}", stats.pending_remittances);
      println!("Expenses:            {:.2}", stats.total_expenses);
      println!("Unread notifications: {}", ws.notifications().unread_count());
    }

    Command::Report {
      vehicles,
      drivers,
      kinds,
      from,
      to,
    } => {
      let filter = LogFilter {
        vehicle_ids: vehicles,
        driver_ids: drivers,
        kinds,
        date_from: from,
        date_to: to,
      };
      let entries = warn_unsaved(ws.note_report(&filter).await);
      for entry in &entries {
        print_log(entry);
      }
      println!(
        "{} entries, total {:.2}",
        entries.len(),
        LogFilter::total_amount(&entries)
      );
    }

    Command::AddDriver {
      name,
      license_number,
      phone,
      email,
      joined,
    } => {
      let mut input = NewDriver::new(name, license_number, joined.unwrap_or_else(|| env.today()));
      input.phone = phone;
      input.email = email;
      let driver = warn_unsaved(ws.register_driver(input).await);
      println!("Added driver {} ({})", driver.name, driver.id);
    }

    Command::AddVehicle {
      plate_number,
      make,
      model,
      year,
      license_number,
      license_expiry,
    } => {
      let mut input = NewVehicle::new(plate_number, make, model, year);
      input.license_number = license_number;
      input.license_expiry_date = license_expiry;
      let vehicle = warn_unsaved(ws.register_vehicle(input).await);
      println!("Registered vehicle {} ({})", vehicle.plate_number, vehicle.id);
    }

    Command::Assign { vehicle, driver } => {
      let assignment = warn_unsaved(ws.assign(vehicle, driver).await?);
      println!("Assigned on {} ({})", assignment.assigned_date, assignment.id);
    }

    Command::Unassign { vehicle } => {
      let Some(out) = ws.unassign(vehicle).await else {
        bail!("vehicle {vehicle} has no active assignment");
      };
      let assignment = warn_unsaved(out);
      println!("Assignment {} completed.", assignment.id);
    }

    Command::RemoveDriver { id } => {
      let Some(out) = ws.remove_driver(id).await else {
        bail!("no driver with id {id}");
      };
      let report = warn_unsaved(out);
      println!(
        "Deleted driver with {} assignments and {} log entries; {} vehicles released.",
        report.assignments,
        report.logs,
        report.released_vehicles.len()
      );
    }

    Command::RemoveVehicle { id } => {
      let Some(out) = ws.remove_vehicle(id).await else {
        bail!("no vehicle with id {id}");
      };
      let report = warn_unsaved(out);
      println!(
        "Deleted vehicle with {} assignments and {} log entries.",
        report.assignments, report.logs
      );
    }

    Command::ClearHistory => {
      let removed = warn_unsaved(ws.activity_mut().clear().await);
      println!("Cleared {removed} activity records.");
    }

    Command::ClearNotifications => {
      let removed = warn_unsaved(ws.notifications_mut().clear().await);
      println!("Cleared {removed} notifications.");
    }
  }

  Ok(())
}

fn print_log(entry: &LogEntry) {
  let amount = entry
    .amount()
    .map_or_else(|| "-".to_owned(), |a| format!("{a:.2}"));
  println!(
    "{}  {:<11} {:>10}  vehicle {}  driver {}  {}",
    entry.date,
    entry.kind().to_string(),
    amount,
    entry.vehicle_id,
    entry.driver_id,
    entry.description
  );
}
