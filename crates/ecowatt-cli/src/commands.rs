//! Command parsing and execution.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use tracing::{debug, warn};

use ecowatt_core::auth::{decode_payload, expires_at};
use ecowatt_core::models::{
    BillFilter, BillType, ComparisonQuery, DeviceFilter, DeviceType, EnergyType, SuggestionFilter,
};
use ecowatt_core::router::LOGIN_ROUTE;
use ecowatt_core::Navigation;

use crate::App;

const DASHBOARD_ROUTE: &str = "/index/dashboard";
const BILLS_ROUTE: &str = "/index/bills";
const DEVICES_ROUTE: &str = "/index/devices";
const SETTINGS_ROUTE: &str = "/index/settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Login,
    Logout,
    Status,
    Dashboard,
    Bills(Option<BillType>),
    Devices(Option<DeviceType>),
    Family,
    Suggestions(Option<BillType>),
    Trend(BillType),
}

impl Command {
    /// Parse command-line arguments (program name already stripped).
    /// `Ok(None)` means help was asked for.
    pub fn parse(args: &[String]) -> Result<Option<Self>> {
        let Some(name) = args.first() else {
            return Ok(None);
        };
        let energy_arg = args.get(1).map(String::as_str);

        let command = match name.as_str() {
            "-h" | "--help" | "help" => return Ok(None),
            "login" => Command::Login,
            "logout" => Command::Logout,
            "status" => Command::Status,
            "dashboard" => Command::Dashboard,
            "bills" => Command::Bills(parse_energy_type(energy_arg)?),
            "devices" => Command::Devices(parse_energy_type(energy_arg)?),
            "family" => Command::Family,
            "suggestions" => Command::Suggestions(parse_energy_type(energy_arg)?),
            "trend" => {
                let energy_type = parse_energy_type(energy_arg)?
                    .ok_or_else(|| anyhow!("trend needs an energy type"))?;
                Command::Trend(energy_type)
            }
            other => bail!("Unknown command: {}", other),
        };
        Ok(Some(command))
    }

    /// View this command belongs to. `None` for commands that need no session.
    pub fn route(&self) -> Option<&'static str> {
        match self {
            Command::Login | Command::Logout | Command::Status => None,
            Command::Dashboard | Command::Suggestions(_) => Some(DASHBOARD_ROUTE),
            Command::Bills(_) => Some(BILLS_ROUTE),
            Command::Devices(_) => Some(DEVICES_ROUTE),
            Command::Family => Some(SETTINGS_ROUTE),
            Command::Trend(energy_type) => Some(energy_type.route()),
        }
    }
}

fn parse_energy_type(arg: Option<&str>) -> Result<Option<EnergyType>> {
    arg.map(|raw| raw.parse::<EnergyType>().map_err(|e| anyhow!(e)))
        .transpose()
}

pub async fn run(app: &mut App, command: Command) -> Result<()> {
    if let Some(route) = command.route() {
        enter(app, route).await?;
    }

    match command {
        Command::Login => {
            app.router.navigate(LOGIN_ROUTE)?;
            login(app).await
        }
        Command::Logout => {
            app.client.sign_out();
            println!("Signed out.");
            Ok(())
        }
        Command::Status => status(app),
        Command::Dashboard => dashboard(app).await,
        Command::Bills(bill_type) => bills(app, bill_type).await,
        Command::Devices(device_type) => devices(app, device_type).await,
        Command::Family => family(app).await,
        Command::Suggestions(bill_type) => suggestions(app, bill_type).await,
        Command::Trend(energy_type) => trend(app, energy_type).await,
    }
}

/// Navigate to `route`; if the guard sends us to login, sign in and retry once.
async fn enter(app: &mut App, route: &str) -> Result<()> {
    match app.router.navigate(route)? {
        Navigation::Proceed(_) => {
            debug!(route, title = %app.router.title(), "Entered view");
            Ok(())
        }
        Navigation::Redirect(_) => {
            eprintln!("You are not signed in, or your session has expired.");
            if !io::stdin().is_terminal() {
                bail!("Not signed in. Run `ecowatt login` first.");
            }
            login(app).await?;

            match app.router.navigate(route)? {
                Navigation::Proceed(_) => Ok(()),
                Navigation::Redirect(_) => bail!("Session was rejected right after sign-in"),
            }
        }
    }
}

fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(value) => eprint!("{} [{}]: ", label, value),
        None => eprint!("{}: ", label),
    }
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();

    match (line.is_empty(), default) {
        (true, Some(value)) => Ok(value.to_string()),
        (true, None) => bail!("{} is required", label),
        (false, _) => Ok(line.to_string()),
    }
}

async fn login(app: &mut App) -> Result<()> {
    let username = prompt("Username", app.config.last_username.as_deref())?;
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let user = app.client.sign_in(&username, &password).await?;
    println!("Signed in as {}.", user.username);

    if app.config.last_username.as_deref() != Some(username.as_str()) {
        app.config.last_username = Some(username);
        if let Err(e) = app.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }
    Ok(())
}

fn status(app: &App) -> Result<()> {
    let token = app.session.token();
    if token.is_empty() {
        println!("Not signed in.");
        return Ok(());
    }

    let claims = decode_payload(&token);
    let subject = claims.as_ref().and_then(|c| c.subject()).unwrap_or("unknown");
    println!("User:      {} (id {})", subject, app.session.current_user_id());

    match expires_at(&token) {
        Some(at) => {
            let remaining = at - Utc::now();
            if remaining.num_seconds() >= 0 {
                println!(
                    "Expires:   {} (in {} min)",
                    at.format("%Y-%m-%d %H:%M:%S UTC"),
                    remaining.num_minutes()
                );
            } else {
                println!("Expires:   {} (expired)", at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        None => println!("Expires:   unknown"),
    }
    println!(
        "Stored:    {}",
        if app.session.is_persisted() { "yes" } else { "this run only" }
    );
    println!("Server:    {}", app.client.base_url());

    // Clears an expired credential, same as the next navigation would.
    if !app.session.is_login() {
        println!("Session expired and was cleared.");
    }
    Ok(())
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:+.1}%", r),
        None => "-".to_string(),
    }
}

async fn dashboard(app: &App) -> Result<()> {
    let (user, family) = tokio::try_join!(
        app.client.get_current_user(),
        app.client.find_family_info()
    )?;

    println!("{}", app.router.title());
    println!("Signed in as {} <{}>", user.username, user.email);
    if family.is_none() {
        println!("No household profile yet. Fill it in to get tailored suggestions.");
    }
    println!();

    for energy_type in EnergyType::ALL {
        let query = ComparisonQuery {
            bill_type: Some(energy_type),
        };
        let comparison = app.client.get_energy_comparison(&query).await?;
        println!(
            "{:<12} {:>10.1} {:<4} MoM {:>8} YoY {:>8}{}",
            energy_type,
            comparison.current_usage,
            energy_type.usage_unit(),
            format_rate(comparison.mom_rate),
            format_rate(comparison.yoy_rate),
            if comparison.is_abnormal { "  (abnormal)" } else { "" }
        );
    }
    Ok(())
}

async fn bills(app: &App, bill_type: Option<BillType>) -> Result<()> {
    let bills = app.client.get_bills(&BillFilter { bill_type }).await?;
    if bills.is_empty() {
        println!("No bills.");
        return Ok(());
    }

    for bill in &bills {
        println!(
            "#{:<5} {} {:<12} {:>10.1} {:<4} {:>10.2}",
            bill.id,
            bill.month_label(),
            bill.bill_type,
            bill.usage,
            bill.bill_type.usage_unit(),
            bill.amount
        );
    }
    let total: f64 = bills.iter().map(|b| b.amount).sum();
    println!("{} bills, {:.2} total", bills.len(), total);
    Ok(())
}

async fn devices(app: &App, device_type: Option<DeviceType>) -> Result<()> {
    let devices = app.client.get_devices(&DeviceFilter { device_type }).await?;
    if devices.is_empty() {
        println!("No devices.");
        return Ok(());
    }

    for device in &devices {
        let daily = device
            .estimated_daily_kwh()
            .map(|kwh| format!("{:.2} kWh/day", kwh))
            .unwrap_or_default();
        println!(
            "#{:<5} {:<24} {:<12} {}",
            device.id, device.name, device.device_type, daily
        );
    }
    Ok(())
}

async fn family(app: &App) -> Result<()> {
    match app.client.find_family_info().await? {
        None => println!("No household profile yet."),
        Some(info) => {
            let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
            println!("Family size:    {}", show(info.family_size.map(|n| n.to_string())));
            println!("House area:     {}", show(info.house_area.map(|a| format!("{:.1} m²", a))));
            println!("Location:       {}", show(info.location.clone()));
            println!("Building age:   {}", show(info.building_age.map(|y| format!("{} years", y))));
            if let Some(per_person) = info.area_per_person() {
                println!("Area/person:    {:.1} m²", per_person);
            }
        }
    }
    Ok(())
}

async fn suggestions(app: &App, bill_type: Option<BillType>) -> Result<()> {
    let suggestions = app
        .client
        .get_suggestions(&SuggestionFilter { bill_type })
        .await?;
    if suggestions.is_empty() {
        println!("No suggestions.");
        return Ok(());
    }

    for s in &suggestions {
        let mark = if s.implemented() { "x" } else { " " };
        println!("[{}] {} ({}, {})", mark, s.suggestion_title, s.bill_type, s.suggestion_date);
        println!("    {}", s.suggestion_text);
    }
    Ok(())
}

async fn trend(app: &App, energy_type: EnergyType) -> Result<()> {
    let analysis = app.client.get_energy_analysis(energy_type).await?;
    let unit = energy_type.usage_unit();

    println!("{}", app.router.title());
    for point in &analysis.trend_data {
        println!(
            "{}  {:>10.1} {:<4} {:>10.2}",
            point.bill_date.format("%Y-%m"),
            point.usage,
            unit,
            point.amount
        );
    }

    let comparison = &analysis.comparison;
    println!();
    println!(
        "Latest {:.1} {}, MoM {}, YoY {}",
        comparison.current_usage,
        unit,
        format_rate(comparison.mom_rate),
        format_rate(comparison.yoy_rate)
    );
    if comparison.is_abnormal {
        println!("Usage grew unusually fast.");
    }

    if !analysis.device_consumption.is_empty() {
        println!();
        for device in &analysis.device_consumption {
            println!("{:<24} {:>5.1}%", device.device_name, device.consumption);
        }
    }
    for s in &analysis.suggestions {
        println!("- {}", s.suggestion_title);
    }
    Ok(())
}
