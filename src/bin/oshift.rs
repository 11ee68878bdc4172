//! OpenShift broker CLI binary.
//!
//! A command-line interface for managing domains and applications.

use clap::Parser;
use openshift_api::cli::{AppCommand, AppTarget, Cli, Command, DomainCommand};
use openshift_api::output::{cartridge_line, PrettyPrint};
use openshift_api::{
    ApplicationResource, ApplicationScale, CartridgeDto, CartridgeSpec, DomainResource,
    Messages, NewApplication, OpenShiftClient, OpenShiftError, Resource, UserResource,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let client = match OpenShiftClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set OPENSHIFT_TOKEN, or OPENSHIFT_USER and OPENSHIFT_PASSWORD");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &OpenShiftClient, cli: Cli) -> openshift_api::Result<()> {
    match cli.command {
        Command::User => {
            let user = client.user().await?;
            output_single(&user, UserRow::from(&user), cli.json)
        }
        Command::Domain(command) => handle_domain(client, command, cli.json).await,
        Command::App(command) => handle_app(client, command, cli.json).await,
        Command::Cartridges => {
            let cartridges = client.cartridges().await?;
            output_list(&cartridges, cli.json, |c| CartridgeRow::from(c))
        }
    }
}

async fn handle_domain(
    client: &OpenShiftClient,
    command: DomainCommand,
    json: bool,
) -> openshift_api::Result<()> {
    let mut user = client.user().await?;
    match command {
        DomainCommand::List => {
            let domains = user.domains().await?;
            output_list(domains, json, |d| DomainRow::from(d))?;
        }
        DomainCommand::Show { id } => {
            let domain = find_domain(&mut user, &id).await?;
            output_single(domain, DomainRow::from(&*domain), json)?;
        }
        DomainCommand::Create { id } => {
            let domain = user.create_domain(&id).await?;
            output_single(domain, DomainRow::from(&*domain), json)?;
        }
        DomainCommand::Rename { id, new_id } => {
            let domain = find_domain(&mut user, &id).await?;
            domain.rename(&new_id).await?;
            output_single(domain, DomainRow::from(&*domain), json)?;
        }
        DomainCommand::Destroy { id, force } => {
            let messages = user.destroy_domain(&id, force).await?;
            print_messages(&messages);
        }
    }
    Ok(())
}

async fn handle_app(
    client: &OpenShiftClient,
    command: AppCommand,
    json: bool,
) -> openshift_api::Result<()> {
    let mut user = client.user().await?;
    match command {
        AppCommand::List { domain } => {
            let domain = find_domain(&mut user, &domain).await?;
            let applications = domain.applications().await?;
            output_list(applications, json, |a| ApplicationRow::from(a))?;
        }
        AppCommand::Show(target) => {
            let app = find_application(&mut user, &target).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ApplicationRow::from(&*app))?);
            } else {
                println!("{}", app.pretty_print());
                let standalone = cartridge_line(&*app.cartridge().await?);
                println!("Cartridge:      {}", standalone);
                for embedded in app.embedded_cartridges().await? {
                    println!("Embedded:       {}", cartridge_line(embedded));
                }
            }
        }
        AppCommand::Create {
            target,
            cartridge,
            scale,
            gear_profile,
            embed,
        } => {
            let domain = find_domain(&mut user, &target.domain).await?;
            let mut new_app = NewApplication::new(&target.name)
                .cartridge(cartridge_spec(&cartridge)?)
                .scale(ApplicationScale::from(scale));
            if let Some(profile) = gear_profile {
                new_app = new_app.gear_profile(profile);
            }
            for name in &embed {
                new_app = new_app.embed(cartridge_spec(name)?);
            }
            let app = domain.create_application(new_app).await?;
            print_messages(app.messages());
            output_single(app, ApplicationRow::from(&*app), json)?;
        }
        AppCommand::Destroy(target) => {
            let domain = find_domain(&mut user, &target.domain).await?;
            let messages = domain.destroy_application(&target.name).await?;
            print_messages(&messages);
        }
        AppCommand::Start(target) => {
            let app = find_application(&mut user, &target).await?;
            app.start().await?;
            output_single(app, ApplicationRow::from(&*app), json)?;
        }
        AppCommand::Stop { target, force } => {
            let app = find_application(&mut user, &target).await?;
            app.stop(force).await?;
            output_single(app, ApplicationRow::from(&*app), json)?;
        }
        AppCommand::Restart(target) => {
            let app = find_application(&mut user, &target).await?;
            app.restart().await?;
            output_single(app, ApplicationRow::from(&*app), json)?;
        }
    }
    Ok(())
}

async fn find_domain<'a>(
    user: &'a mut UserResource,
    id: &str,
) -> openshift_api::Result<&'a mut DomainResource> {
    user.domain_mut(id)
        .await?
        .ok_or_else(|| OpenShiftError::NotFound {
            entity_type: "domain",
            id: id.to_string(),
        })
}

async fn find_application<'a>(
    user: &'a mut UserResource,
    target: &AppTarget,
) -> openshift_api::Result<&'a mut ApplicationResource> {
    find_domain(user, &target.domain)
        .await?
        .application_mut(&target.name)
        .await?
        .ok_or_else(|| OpenShiftError::NotFound {
            entity_type: "application",
            id: target.name.clone(),
        })
}

/// A manifest URL selects a downloadable cartridge, anything else a named one.
fn cartridge_spec(value: &str) -> openshift_api::Result<CartridgeSpec> {
    if value.starts_with("http://") || value.starts_with("https://") {
        CartridgeSpec::downloadable(value)
    } else {
        Ok(CartridgeSpec::named(value))
    }
}

fn print_messages(messages: &Messages) {
    for message in messages {
        eprintln!("{message}");
    }
}

fn output_single<T, R>(item: &T, row: R, json: bool) -> openshift_api::Result<()>
where
    T: PrettyPrint + ?Sized,
    R: Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> openshift_api::Result<()>
where
    R: Tabled + Serialize,
    F: Fn(&T) -> R,
{
    let rows: Vec<R> = items.iter().map(to_row).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("(none)");
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

// Table row types, also used for JSON output

#[derive(Tabled, Serialize)]
struct UserRow {
    login: String,
    consumed_gears: u32,
    max_gears: u32,
    plan: String,
}

impl From<&UserResource> for UserRow {
    fn from(u: &UserResource) -> Self {
        Self {
            login: u.login().to_string(),
            consumed_gears: u.consumed_gears(),
            max_gears: u.max_gears(),
            plan: u.plan_id().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct DomainRow {
    id: String,
    suffix: String,
}

impl From<&DomainResource> for DomainRow {
    fn from(d: &DomainResource) -> Self {
        Self {
            id: d.id().to_string(),
            suffix: d.suffix().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct ApplicationRow {
    name: String,
    framework: String,
    scalable: bool,
    url: String,
}

impl From<&ApplicationResource> for ApplicationRow {
    fn from(a: &ApplicationResource) -> Self {
        Self {
            name: a.name().to_string(),
            framework: a.framework().unwrap_or_default().to_string(),
            scalable: a.scale().is_scalable(),
            url: a.application_url().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct CartridgeRow {
    name: String,
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    cartridge_type: String,
    display_name: String,
}

impl From<&CartridgeDto> for CartridgeRow {
    fn from(c: &CartridgeDto) -> Self {
        Self {
            name: c.name.clone(),
            cartridge_type: c.cartridge_type.to_string(),
            display_name: c.display_name.clone().unwrap_or_default(),
        }
    }
}
