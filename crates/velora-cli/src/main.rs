use clap::{Parser, Subcommand};

use velora_content::{normalize_service, normalize_services, ContentClient};
use velora_core::group_by_first_letter;

#[derive(Debug, Parser)]
#[command(name = "velora-cli")]
#[command(about = "Preview normalized content from the velora CMS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all normalized services, one line per service
    Services,
    /// Print one normalized service as pretty JSON
    Show { slug: String },
    /// Print the alphabetical catalog index
    Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = velora_core::load_app_config_from_env()?;
    let client = ContentClient::from_config(&config)?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Services => {
            let services = normalize_services(&client.fetch_services().await?);
            for service in &services {
                println!(
                    "{:>5}  {:<40}  {}  (images: {}, price rows: {})",
                    service.id,
                    service.slug,
                    service.title,
                    service.images.len(),
                    service.price_list.len()
                );
            }
        }
        Commands::Show { slug } => match client.fetch_service_by_slug(&slug).await? {
            Some(record) => {
                let service = normalize_service(&record);
                println!("{}", serde_json::to_string_pretty(&service)?);
            }
            None => anyhow::bail!("no service with slug '{slug}'"),
        },
        Commands::Catalog => {
            let services = normalize_services(&client.fetch_services().await?);
            for group in group_by_first_letter(services) {
                println!("{}", group.key);
                for member in &group.members {
                    println!("  {}  ({})", member.title, member.slug);
                }
            }
        }
    }

    Ok(())
}
