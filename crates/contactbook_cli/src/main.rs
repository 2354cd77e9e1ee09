//! Command-line front end for the contact book.
//!
//! # Responsibility
//! - Drive the same screen flow a mobile UI uses (form gate, view model).
//! - Print list views and inline validation errors to the terminal.

use clap::{Args, Parser, Subcommand};
use contactbook_core::db::DEFAULT_DB_FILE_NAME;
use contactbook_core::{
    default_log_level, flush_logging, init_logging, render_contact_list, ContactField, ContactId,
    ContactListView, ContactScreen, ContactStore, ContactViewModel, FormErrors, SubmitOutcome,
    WriteFailure,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Handle;

const DB_PATH_ENV: &str = "CONTACTBOOK_DB_PATH";
const LOG_DIR_NAME: &str = "contactbook-logs";

#[derive(Debug, Parser)]
#[command(name = "contactbook", version, about = "Manage a local contact book")]
struct Cli {
    /// SQLite database file (defaults to $CONTACTBOOK_DB_PATH, then the temp dir).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show all contacts.
    List {
        /// Print JSON instead of the list view.
        #[arg(long)]
        json: bool,
    },
    /// Create a contact.
    Add(AddArgs),
    /// Change fields of an existing contact.
    Update(UpdateArgs),
    /// Delete a contact by id.
    Delete { id: ContactId },
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    mobile: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: ContactId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    mobile: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(LOG_DIR_NAME));
    if let Err(err) = init_logging(&level, &log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    };
    flush_logging();
    code
}

async fn run(cli: Cli) -> Result<ExitCode, String> {
    let db_path = resolve_db_path(cli.db);
    let store = ContactStore::open(&db_path)
        .map_err(|err| format!("failed to open `{}`: {err}", db_path.display()))?;
    info!("event=cli_start module=cli status=ok");

    match cli.command {
        Command::List { json } => list(&store, json),
        Command::Add(args) => add(store, args).await,
        Command::Update(args) => update(&store, args),
        Command::Delete { id } => delete(store, id).await,
    }
}

fn list(store: &ContactStore, json: bool) -> Result<ExitCode, String> {
    let contacts = store.list().map_err(|err| err.to_string())?;
    if json {
        let rendered = serde_json::to_string_pretty(&contacts).map_err(|err| err.to_string())?;
        println!("{rendered}");
        return Ok(ExitCode::SUCCESS);
    }

    match render_contact_list(&contacts) {
        ContactListView::Empty { message, action } => {
            println!("{message}");
            println!("  ({action}: contactbook add --name .. --mobile .. --email ..)");
        }
        ContactListView::Entries(entries) => {
            for entry in entries {
                println!("#{} {}", entry.key, entry.name);
                println!("    phone: {} <{}>", entry.mobile_number, entry.dial_uri);
                println!("    email: {} <{}>", entry.email_address, entry.mail_uri);
                if let Some(description) = entry.description {
                    println!("    {description}");
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn add(store: ContactStore, args: AddArgs) -> Result<ExitCode, String> {
    let mut screen = ContactScreen::new(ContactViewModel::new(store, &Handle::current()));
    let errors = screen.view_model().last_error();

    screen.open_form();
    let form = screen.form_mut();
    form.set_name(args.name);
    form.set_mobile_number(args.mobile);
    form.set_email_address(args.email);
    form.set_description(args.description);

    match screen.submit_form() {
        SubmitOutcome::Saved { confirmation } => {
            screen.close().await;
            let failure = errors.borrow().clone();
            Ok(report_write(failure, confirmation))
        }
        SubmitOutcome::Rejected(form_errors) => {
            screen.close().await;
            print_form_errors(&form_errors);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn update(store: &ContactStore, args: UpdateArgs) -> Result<ExitCode, String> {
    let Some(mut contact) = store.get(args.id).map_err(|err| err.to_string())? else {
        eprintln!("contact {} not found", args.id);
        return Ok(ExitCode::FAILURE);
    };

    if let Some(name) = args.name {
        contact.name = name;
    }
    if let Some(mobile) = args.mobile {
        contact.mobile_number = mobile;
    }
    if let Some(email) = args.email {
        contact.email_address = email;
    }
    if let Some(description) = args.description {
        contact.description = description;
    }

    if let Err(form_errors) = contact.validate() {
        print_form_errors(&form_errors);
        return Ok(ExitCode::FAILURE);
    }
    store.update(&contact).map_err(|err| err.to_string())?;
    println!("Contact updated");
    Ok(ExitCode::SUCCESS)
}

async fn delete(store: ContactStore, id: ContactId) -> Result<ExitCode, String> {
    let screen = ContactScreen::new(ContactViewModel::new(store, &Handle::current()));
    let errors = screen.view_model().last_error();

    screen.delete(id);
    screen.close().await;

    let failure = errors.borrow().clone();
    Ok(report_write(failure, "Contact deleted"))
}

fn report_write(failure: Option<WriteFailure>, confirmation: &str) -> ExitCode {
    match failure {
        Some(failure) => {
            eprintln!("error: {failure}");
            ExitCode::FAILURE
        }
        None => {
            println!("{confirmation}");
            ExitCode::SUCCESS
        }
    }
}

fn print_form_errors(errors: &FormErrors) {
    for error in errors.iter() {
        let field = match error.field() {
            ContactField::Name => "name",
            ContactField::MobileNumber => "mobile",
            ContactField::EmailAddress => "email",
            ContactField::Description => "description",
        };
        eprintln!("--{field}: {}", error.message());
    }
}

fn resolve_db_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
