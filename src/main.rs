use clap::{Args, Parser, Subcommand};
use ledgerpay::application::ledger::{AccountLedger, DEFAULT_MAX_ATTEMPTS};
use ledgerpay::application::orchestrator::PaymentOrchestrator;
use ledgerpay::domain::payment::{PaymentRequest, PaymentStatus};
use ledgerpay::domain::ports::AccountStoreBox;
use ledgerpay::infrastructure::clock::SystemClock;
use ledgerpay::infrastructure::http_client::HttpAccountClient;
use ledgerpay::infrastructure::in_memory::InMemoryAccountStore;
#[cfg(feature = "storage-rocksdb")]
use ledgerpay::infrastructure::rocksdb::RocksDBStore;
use ledgerpay::interfaces::csv::account_reader::{AccountSeedReader, seed_ledger};
use ledgerpay::interfaces::http::{accounts, payments};
use ledgerpay::telemetry;
use miette::{IntoDiagnostic, Result, WrapErr};
use rust_decimal::Decimal;
use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the account ledger over HTTP
    AccountService(AccountServiceArgs),
    /// Serve the payment endpoint, backed by a remote account service
    PaymentService(PaymentServiceArgs),
    /// Process a single payment and print the result as JSON
    Pay(PayArgs),
}

#[derive(Args)]
struct AccountServiceArgs {
    /// Address to listen on
    #[arg(long, env = "LEDGERPAY_ACCOUNT_LISTEN", default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// CSV file of initial accounts (account_number,owner_name,balance)
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Compare-and-swap rounds before a contended write gives up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_cas_attempts: u32,
}

#[derive(Args)]
struct RemoteArgs {
    /// Base URL of the account service
    #[arg(long, env = "ACCOUNT_SERVICE_URL", default_value = "http://localhost:8080")]
    account_service_url: String,

    /// Timeout for each call to the account service, in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
}

impl RemoteArgs {
    fn orchestrator(&self) -> Result<PaymentOrchestrator> {
        let client = HttpAccountClient::new(
            &self.account_service_url,
            Duration::from_millis(self.timeout_ms),
        )
        .into_diagnostic()?;
        Ok(PaymentOrchestrator::new(Box::new(client)))
    }
}

#[derive(Args)]
struct PaymentServiceArgs {
    /// Address to listen on
    #[arg(long, env = "LEDGERPAY_PAYMENT_LISTEN", default_value = "127.0.0.1:8081")]
    listen: SocketAddr,

    #[command(flatten)]
    remote: RemoteArgs,
}

#[derive(Args)]
struct PayArgs {
    /// Account to debit
    account_number: String,

    /// Amount to pay
    amount: Decimal,

    /// Free-text description, logged only
    #[arg(long)]
    description: Option<String>,

    #[command(flatten)]
    remote: RemoteArgs,
}

/// Exit status for a command line that never reached the payment flow.
/// Kept apart from the payment outcomes (0, 1, 2).
const EXIT_USAGE: u8 = 64;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    telemetry::init_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout
            let _ = e.print();
            return Ok(if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    match cli.command {
        Command::AccountService(args) => run_account_service(args).await?,
        Command::PaymentService(args) => run_payment_service(args).await?,
        Command::Pay(args) => return pay(args).await,
    }
    Ok(ExitCode::SUCCESS)
}

fn open_store(db_path: Option<PathBuf>) -> Result<AccountStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            info!(path = %path.display(), "using RocksDB storage");
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature \
                 is not enabled. Falling back to in-memory storage."
            );
            Ok(Box::new(InMemoryAccountStore::new()))
        }
        None => Ok(Box::new(InMemoryAccountStore::new())),
    }
}

async fn run_account_service(args: AccountServiceArgs) -> Result<()> {
    let store = open_store(args.db_path)?;
    let ledger = AccountLedger::new(store, Box::new(SystemClock))
        .with_max_attempts(args.max_cas_attempts);

    if let Some(seed) = args.seed {
        let file = File::open(&seed)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot open seed file {}", seed.display()))?;
        seed_ledger(&ledger, AccountSeedReader::new(file)).await;
    }

    let app = accounts::router(Arc::new(ledger));
    serve(args.listen, app, "account service").await
}

async fn run_payment_service(args: PaymentServiceArgs) -> Result<()> {
    let orchestrator = args.remote.orchestrator()?;
    info!(account_service = %args.remote.account_service_url, "payment service configured");

    let app = payments::router(Arc::new(orchestrator));
    serve(args.listen, app, "payment service").await
}

async fn serve(listen: SocketAddr, app: axum::Router, name: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot listen on {listen}"))?;
    info!(address = %listen, "{name} listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .into_diagnostic()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn pay(args: PayArgs) -> Result<ExitCode> {
    let request = PaymentRequest {
        account_number: args.account_number,
        amount: Some(args.amount),
        description: args.description,
    };
    let amount = match request.validate().into_diagnostic() {
        Ok(amount) => amount,
        Err(report) => return Ok(usage_error(report)),
    };
    info!(
        account = %request.account_number,
        amount = %amount.value(),
        description = ?request.description,
        "processing payment"
    );
    let orchestrator = match args.remote.orchestrator() {
        Ok(orchestrator) => orchestrator,
        Err(report) => return Ok(usage_error(report)),
    };

    let result = orchestrator
        .process_payment(&request.account_number, amount)
        .await;
    println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);

    Ok(match result.status {
        PaymentStatus::Success => ExitCode::SUCCESS,
        PaymentStatus::Failed => ExitCode::from(1),
        PaymentStatus::Error => ExitCode::from(2),
    })
}

fn usage_error(report: miette::Report) -> ExitCode {
    eprintln!("{report:?}");
    ExitCode::from(EXIT_USAGE)
}
