use clap::{Parser, Subcommand};
use serde_json::Value;
use tracelevel::Level;
use url::Url;

#[derive(Parser)]
#[command(name = "levelctl")]
#[command(about = "Inspect and change the log level of a running process", long_about = None)]
struct Cli {
    /// Level control endpoint, including its path prefix
    #[arg(short, long, default_value = "http://127.0.0.1:8080/log")]
    url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current level
    Get,
    /// Set a new level
    Set { level: Level },
    /// Restore the level the process started with
    Reset,
    /// Print the server status document
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Get => {
            let res = client.get(cli.url).send().await?;
            println!("{}", expect_success(res).await?);
        }
        Commands::Set { level } => {
            let target = level_url(&cli.url, level)?;
            let res = client.put(target).send().await?;
            expect_success(res).await?;
            println!("log level set to {level}");
        }
        Commands::Reset => {
            let res = client.delete(cli.url).send().await?;
            expect_success(res).await?;
            println!("log level reset");
        }
        Commands::Status => {
            let res = client.get(cli.url.join("/status")?).send().await?;
            let json: Value = serde_json::from_str(&expect_success(res).await?)?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

/// `<base>/<level>`, tolerating a trailing slash on the base.
fn level_url(base: &Url, level: Level) -> Result<Url, Box<dyn std::error::Error>> {
    let mut target = base.clone();
    target
        .path_segments_mut()
        .map_err(|_| format!("{base} cannot carry a path"))?
        .pop_if_empty()
        .push(level.name());
    Ok(target)
}

async fn expect_success(res: reqwest::Response) -> Result<String, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(format!("server returned {status}: {text}").into());
    }
    Ok(text)
}
