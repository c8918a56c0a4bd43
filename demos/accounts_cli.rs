use clap::{Parser, Subcommand};
use form3api::{Account, AccountResponse, Attributes, Client, Form3};
use std::error::Error;

#[derive(Debug, Parser)]
#[command(name = "accounts-cli", about = "CLI wrapper for the Form3 accounts API")]
struct Cli {
    /// API base URL; falls back to ACCOUNTS_API_BASE_URL env var
    #[arg(long, env = "ACCOUNTS_API_BASE_URL", default_value = "https://api.form3.tech")]
    base_url: String,

    /// Extra request header as NAME=VALUE, may be repeated
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an account
    Create {
        #[arg(long)]
        organisation_id: String,
        /// Account id; generated when omitted
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = "EUR")]
        currency: String,
        #[arg(long, default_value = "FR")]
        country: String,
        #[arg(long)]
        bank_id: Option<String>,
        #[arg(long)]
        bic: Option<String>,
        #[arg(long)]
        iban: Option<String>,
        /// Account holder name, may be repeated
        #[arg(long)]
        name: Vec<String>,
    },
    /// Fetch an account by id
    Fetch {
        #[arg(long)]
        id: String,
    },
    /// Delete an account at the given version
    Delete {
        #[arg(long)]
        id: String,
        #[arg(long)]
        version: i64,
    },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = Client::builder()
        .base_url(cli.base_url)
        .headers(cli.headers)
        .build()?;
    let form3 = Form3::from_client(client);

    match cli.command {
        Commands::Create {
            organisation_id,
            id,
            currency,
            country,
            bank_id,
            bic,
            iban,
            name,
        } => {
            let attributes = Attributes {
                bank_id,
                bic,
                iban,
                name,
                ..Attributes::new(currency, country)
            };
            let account = match id {
                Some(id) => Account::new(organisation_id, attributes).with_id(id),
                None => Account::with_generated_id(organisation_id, attributes),
            };
            let response = form3.accounts().create(&account).await?;
            print_account(&response)?;
        }
        Commands::Fetch { id } => {
            let response = form3.accounts().fetch(&id).await?;
            print_account(&response)?;
        }
        Commands::Delete { id, version } => {
            form3.accounts().delete(&id, version).await?;
            println!("Deleted account {id} at version {version}");
        }
    }

    Ok(())
}

fn print_account(response: &AccountResponse) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
