//! # Stockroom CLI Library
//!
//! The `stockroom` binary: configuration, session handling, command
//! dispatch and output.
//!
//! ## Module Organization
//! ```text
//! stockroom_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap definitions, raw text → forms/filters
//! ├── config.rs       ◄─── AppConfig from env + flags
//! ├── state.rs        ◄─── AppState (Database + AppConfig)
//! ├── commands/       ◄─── One module per screen
//! ├── render.rs       ◄─── Tables or JSON on stdout
//! ├── export.rs       ◄─── Report and list text files
//! └── error.rs        ◄─── ApiError returned by every command
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging (stderr, RUST_LOG or info,stockroom=debug)       │
//! │  2. Build AppConfig (defaults ← STOCKROOM_* ← --db)                     │
//! │  3. Open Database (create file, WAL, run pending migrations)            │
//! │  4. Open Session (--user/--password) unless register                    │
//! │  5. Run one command, render the result                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod state;

use stockroom_core::Session;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{
    CategoryAction, Cli, Command, DamageAction, DebtAction, DepartmentAction, ExpenseAction,
    ProductAction, ReportAction, SaleAction, SupplierAction, UserAction, WarehouseAction,
};
use commands::{
    auth, category, damage, dashboard, debt, department, expense, inventory, product, report, sale,
    supplier, user, warehouse,
};
use error::ApiError;
use render::Output;
use state::AppState;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom_db=trace` - Trace the database layer only
/// - Default: `info,stockroom=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command line invocation.
///
/// Errors are returned to the caller; the binary prints them with
/// [`render::print_error`] and exits non-zero.
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    let config = cli.config()?;
    info!(db = %config.database_path.display(), "Starting Stockroom");

    let state = AppState::open(config).await?;
    let result = dispatch(&state, &cli).await;
    state.db().close().await;
    result
}

async fn dispatch(state: &AppState, cli: &Cli) -> Result<(), ApiError> {
    let out = Output::new(cli.json, state.config());

    if let Command::Register(args) = &cli.command {
        let form = args.form(cli.user.as_deref(), cli.password.as_deref());
        let user = auth::register(state, &form).await?;
        return out.row(&user);
    }

    let session = open_session(state, cli).await?;

    match &cli.command {
        Command::Register(_) => Ok(()),
        Command::Login => out.session(&session),

        Command::Category { action } => match action {
            CategoryAction::List(args) => out.rows(&category::list(state, &session, &args.search).await?),
            CategoryAction::Add(fields) => out.row(&category::add(state, &session, &fields.form()).await?),
            CategoryAction::Update { id, fields } => {
                out.row(&category::update(state, &session, *id, &fields.form()).await?)
            }
        },

        Command::Department { action } => match action {
            DepartmentAction::List(args) => out.rows(&department::list(state, &session, &args.search).await?),
            DepartmentAction::Add(fields) => out.row(&department::add(state, &session, &fields.form()).await?),
            DepartmentAction::Update { id, fields } => {
                out.row(&department::update(state, &session, *id, &fields.form()).await?)
            }
            DepartmentAction::Delete { id } => {
                department::delete(state, &session, *id).await?;
                out.done(&format!("Department {} deleted", id))
            }
        },

        Command::Warehouse { action } => match action {
            WarehouseAction::List(args) => out.rows(&warehouse::list(state, &session, &args.search).await?),
            WarehouseAction::Add(fields) => out.row(&warehouse::add(state, &session, &fields.form()).await?),
            WarehouseAction::Update { id, fields } => {
                out.row(&warehouse::update(state, &session, *id, &fields.form()).await?)
            }
        },

        Command::Supplier { action } => match action {
            SupplierAction::List(args) => out.rows(&supplier::list(state, &session, &args.search).await?),
            SupplierAction::Add(fields) => out.row(&supplier::add(state, &session, &fields.form()).await?),
            SupplierAction::Update { id, fields } => {
                out.row(&supplier::update(state, &session, *id, &fields.form()).await?)
            }
            SupplierAction::Delete { id } => {
                supplier::delete(state, &session, *id).await?;
                out.done(&format!("Supplier {} deleted", id))
            }
        },

        Command::Product { action } => match action {
            ProductAction::List(args) => out.rows(&product::list(state, &session, &args.search).await?),
            ProductAction::Get { id } => out.row(&product::get(state, &session, *id).await?),
            ProductAction::Add(fields) => out.row(&product::add(state, &session, &fields.form()).await?),
            ProductAction::Update { id, fields } => {
                out.row(&product::update(state, &session, *id, &fields.form()).await?)
            }
            ProductAction::Delete { id } => {
                product::delete(state, &session, *id).await?;
                out.done(&format!("Product {} deleted", id))
            }
            ProductAction::Export(args) => {
                let path = product::export(state, &session, &args.search).await?;
                out.done(&format!("Products written to {}", path.display()))
            }
        },

        Command::Expense { action } => match action {
            ExpenseAction::List(args) => out.rows(&expense::list(state, &session, &args.search).await?),
            ExpenseAction::Add(fields) => out.row(&expense::add(state, &session, &fields.form()).await?),
            ExpenseAction::Update { id, fields } => {
                out.row(&expense::update(state, &session, *id, &fields.form()).await?)
            }
            ExpenseAction::Delete { id } => {
                expense::delete(state, &session, *id).await?;
                out.done(&format!("Expense {} deleted", id))
            }
        },

        Command::Debt { action } => match action {
            DebtAction::List(args) => out.rows(&debt::list(state, &session, &args.filter()?).await?),
            DebtAction::Add(fields) => out.row(&debt::add(state, &session, &fields.form()).await?),
            DebtAction::Update { id, fields } => {
                out.row(&debt::update(state, &session, *id, &fields.form()).await?)
            }
        },

        Command::Damage { action } => match action {
            DamageAction::List(args) => out.rows(&damage::list(state, &session, &args.filter()?).await?),
            DamageAction::Add(fields) => out.row(&damage::add(state, &session, &fields.form()).await?),
            DamageAction::Update { id, fields } => {
                out.row(&damage::update(state, &session, *id, &fields.form()).await?)
            }
            DamageAction::Delete { id } => {
                damage::delete(state, &session, *id).await?;
                out.done(&format!("Damage record {} deleted, stock restored", id))
            }
        },

        Command::User { action } => match action {
            UserAction::List(args) => out.rows(&user::list(state, &session, &args.search).await?),
            UserAction::Add(fields) => out.row(&user::add(state, &session, &fields.form()).await?),
            UserAction::Update { id, fields } => {
                out.row(&user::update(state, &session, *id, &fields.form()).await?)
            }
            UserAction::Delete { id } => {
                user::delete(state, &session, *id).await?;
                out.done(&format!("User {} deleted", id))
            }
        },

        Command::Sale { action } => match action {
            SaleAction::List(args) => out.rows(&sale::list(state, &session, &args.filter()?).await?),
            SaleAction::Add(fields) => out.row(&sale::add(state, &session, &fields.form()).await?),
            SaleAction::Update { id, fields } => {
                out.row(&sale::update(state, &session, *id, &fields.form()).await?)
            }
            SaleAction::Delete { id, restock } => {
                sale::delete(state, &session, *id, *restock).await?;
                let note = if *restock { ", stock restored" } else { "" };
                out.done(&format!("Sale {} deleted{}", id, note))
            }
            SaleAction::Export(args) => {
                let path = sale::export(state, &session, &args.filter()?).await?;
                out.done(&format!("Sales written to {}", path.display()))
            }
        },

        Command::Report { action } => match action {
            ReportAction::Years => out.years(&report::years(state, &session).await?),
            ReportAction::Show(args) => out.report(&report::show(state, &session, &args.form()).await?),
            ReportAction::Export(args) => {
                let path = report::export(state, &session, &args.form()).await?;
                out.done(&format!("Report written to {}", path.display()))
            }
        },

        Command::Dashboard => out.dashboard(&dashboard::show(state, &session).await?),

        Command::Inventory(args) => out.rows(&inventory::list(state, &session, &args.search).await?),
    }
}

/// Logs in with `--user` / `--password`.
async fn open_session(state: &AppState, cli: &Cli) -> Result<Session, ApiError> {
    match (cli.user.as_deref(), cli.password.as_deref()) {
        (Some(user), Some(password)) => auth::login(state, user, password).await,
        _ => Err(ApiError::unauthorized(
            "Log in with --user and --password (or STOCKROOM_USER / STOCKROOM_PASSWORD)",
        )),
    }
}
