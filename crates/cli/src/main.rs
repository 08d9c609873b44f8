mod cmd;
mod logging;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mhd", version, about = "Keep best-before (MHD) markers of products in sync")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    /// Evaluate days remaining against this date instead of the local date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// Decode a DDMMYY token and show its derived forms
    Decode {
        token: String,
    },

    /// Synchronize the MHD fields of every product from its token
    Sync(SyncArgs),

    /// Store a product's token and synchronize it (omit TOKEN to clear)
    SetToken {
        product: String,
        token: Option<String>,
    },

    /// Set the single EAN of a product (omit EAN to clear)
    SetEan {
        product: String,
        ean: Option<String>,
    },

    /// Apply a stock movement comment; a valid token becomes the product's MHD
    StockComment {
        product: String,
        comment: String,
    },

    /// Copy legacy EAN values into the single-EAN field
    MigrateEan {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// List products whose MHD date satisfies a rule
    Filter(FilterArgs),
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Products per page (overrides sync.batch_size)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Print every processed product
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// One of = != < <= > >= empty
    pub operator: String,

    /// Comparison date (YYYY-MM-DD); not needed for `empty`
    pub date: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::Decode { token } => cmd::decode::run(&token, cli.today),
        Commands::Sync(args) => cmd::sync::run(config, profile, cli.today, &args),
        Commands::SetToken { product, token } => {
            cmd::product::set_token(config, profile, cli.today, &product, token.as_deref())
        }
        Commands::SetEan { product, ean } => {
            cmd::product::set_ean(config, profile, &product, ean.as_deref())
        }
        Commands::StockComment { product, comment } => {
            cmd::product::stock_comment(config, profile, cli.today, &product, &comment)
        }
        Commands::MigrateEan { dry_run } => cmd::migrate::run(config, profile, dry_run),
        Commands::Filter(args) => cmd::filter::run(config, profile, &args),
    }
    logging::shutdown();
}
