use anyhow::{anyhow, Context};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use hasad::farm::{FarmId, FarmRecord};
use hasad::prelude::*;

#[derive(Parser, Debug)]
#[clap(name = "hasad-farms", version)]
#[clap(about = "Manage your Hasad rooftop farms", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Access token of the signed-in farmer. Falls back to HASAD_ACCESS_TOKEN.
    #[clap(long)]
    token: Option<String>,

    /// Interface language (en, ar)
    #[clap(long, default_value = "en")]
    lang: Language,

    /// Output debug logs to stderr
    #[clap(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List your farms, newest first
    List,
    /// Register a new farm
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        mobile: String,
        /// Roof area in square meters
        #[clap(long)]
        area: f64,
        #[clap(long)]
        location: String,
        /// rental_singles, rental_families or owned
        #[clap(long, default_value = "rental_singles")]
        housing: HousingType,
        /// Crop to grow; repeat for several
        #[clap(long = "crop", required = true)]
        crops: Vec<CropType>,
        /// Available budget in SAR
        #[clap(long, default_value = "0")]
        budget: f64,
        /// Roof photo, at most 5 MiB
        #[clap(long)]
        photo: Option<PathBuf>,
    },
    /// Change fields of an existing farm
    Edit {
        farm_id: String,
        /// `column=value`, e.g. `available_budget=750`; repeatable
        #[clap(long = "set")]
        fields: Vec<String>,
        /// Crop to toggle on or off; repeatable
        #[clap(long = "toggle-crop")]
        toggle_crops: Vec<CropType>,
        #[clap(long)]
        photo: Option<PathBuf>,
    },
    /// Delete a farm
    Delete {
        farm_id: String,
        /// Do not ask for confirmation
        #[clap(long)]
        yes: bool,
    },
    /// Raise a support ticket
    Ticket {
        #[clap(long)]
        contact_id: i64,
        #[clap(long)]
        issue: String,
        /// email or phone
        #[clap(long, default_value = "email")]
        method: ContactMethod,
    },
}

struct TerminalPrompt {
    assume_yes: bool,
}

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stdout = tokio::io::stdout();
        let question = format!("{} [y/N] ", message);
        if stdout.write_all(question.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return false;
        }

        let mut answer = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut answer).await {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "نعم"),
            Err(_) => false,
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

fn print_farms(manager: &FarmCollectionManager) {
    let cards = manager.cards();
    if cards.is_empty() {
        println!("-");
        return;
    }
    for card in cards {
        println!("{}  {}  [{}]", card.farm_id, card.title, card.status_label);
        println!("    {}", card.location);
        println!("    {}", card.area_line);
        println!("    {}", card.budget_line);
        println!("    {}", card.crop_labels.join(", "));
        println!("    {}", card.created_line);
        if let Some(url) = &card.photo_url {
            println!("    {}", url);
        }
    }
}

async fn submit(manager: &FarmCollectionManager, form: &FarmDraftForm) -> anyhow::Result<()> {
    match manager.submit_draft().await {
        Ok(SubmitOutcome::Saved(record)) => {
            println!("{} {}", record.farm_id, record.status.as_str());
            print_farms(manager);
            Ok(())
        }
        Ok(SubmitOutcome::Ignored) => Err(anyhow!("nothing to submit")),
        Err(err) => Err(anyhow!(form
            .error_message()
            .unwrap_or_else(|| err.to_string()))),
    }
}

fn find_farm(manager: &FarmCollectionManager, farm_id: &FarmId) -> anyhow::Result<FarmRecord> {
    manager
        .farms()
        .into_iter()
        .find(|farm| &farm.farm_id == farm_id)
        .ok_or_else(|| anyhow!("farm {} not found", farm_id))
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = HasadConfig::from_env()?;
    let hasad = Hasad::from_config(config, ClientOptions::default())?;

    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("HASAD_ACCESS_TOKEN").ok())
        .ok_or_else(|| anyhow!("no access token: pass --token or set HASAD_ACCESS_TOKEN"))?;
    let session = Session::from_access_token(&token).context("invalid access token")?;

    let translator: Arc<dyn Translator> = Arc::new(Catalog::new(cli.lang));
    let assume_yes = matches!(cli.command, Commands::Delete { yes: true, .. });
    let manager = hasad.farms(&session, translator.clone(), Arc::new(TerminalPrompt { assume_yes }))?;

    match cli.command {
        Commands::List => {
            manager.load().await;
            print_farms(&manager);
        }
        Commands::Create {
            name,
            email,
            mobile,
            area,
            location,
            housing,
            crops,
            budget,
            photo,
        } => {
            let form = manager.begin_create();
            form.set_field(FarmField::FarmName(name));
            form.set_field(FarmField::FarmEmail(email));
            form.set_field(FarmField::FarmMobile(mobile));
            form.set_field(FarmField::RoofArea(Some(area)));
            form.set_field(FarmField::Location(location));
            form.set_field(FarmField::HousingType(housing));
            form.set_field(FarmField::AvailableBudget(Some(budget)));
            for crop in crops {
                if !form.draft().desired_crop_types.contains(crop) {
                    form.toggle_crop(crop);
                }
            }
            if let Some(path) = photo {
                let file = PhotoFile::from_path(&path).await?;
                form.select_file(file)
                    .map_err(|err| anyhow!(err.localized(translator.as_ref())))?;
            }
            submit(&manager, &form).await?;
        }
        Commands::Edit {
            farm_id,
            fields,
            toggle_crops,
            photo,
        } => {
            manager.load().await;
            let farm = find_farm(&manager, &FarmId::new(farm_id))?;
            let form = manager.begin_edit(&farm);
            for field in fields {
                let (name, value) = field
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected column=value, got {}", field))?;
                form.set_field(FarmField::from_input(name, value)?);
            }
            for crop in toggle_crops {
                form.toggle_crop(crop);
            }
            if let Some(path) = photo {
                let file = PhotoFile::from_path(&path).await?;
                form.select_file(file)
                    .map_err(|err| anyhow!(err.localized(translator.as_ref())))?;
            }
            submit(&manager, &form).await?;
        }
        Commands::Delete { farm_id, .. } => {
            manager.load().await;
            let farm_id = FarmId::new(farm_id);
            match manager.request_delete(&farm_id).await {
                DeleteOutcome::Deleted => print_farms(&manager),
                DeleteOutcome::Declined | DeleteOutcome::AlreadyPending => {}
                DeleteOutcome::Failed => return Err(anyhow!("farm {} was not deleted", farm_id)),
            }
        }
        Commands::Ticket {
            contact_id,
            issue,
            method,
        } => {
            let desk = hasad.support(&session, translator.clone())?;
            match desk.raise_ticket(Some(contact_id), &issue, method).await {
                Ok(receipt) => println!(
                    "{} {}",
                    desk.success_message(),
                    receipt.ticket_id.unwrap_or_default()
                ),
                Err(err) => return Err(anyhow!(err.localized(translator.as_ref()))),
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
