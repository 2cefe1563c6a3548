use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "balancer-cli")]
#[command(about = "Command-line client for the Passive Balancer", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:2308")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enqueue a payload
    Post { payload: String },
    /// Enqueue a payload and wait for the consumer's reply
    PostCallback { payload: String },
    /// Dequeue the oldest payload
    Get {
        /// Reply sent back to a callback producer
        #[arg(short, long)]
        reply: Option<String>,
    },
    /// Dump Prometheus metrics
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Post { payload } => {
            client.post(format!("{}/post", cli.url)).body(payload).send().await?
        }
        Commands::PostCallback { payload } => {
            client
                .post(format!("{}/post_with_callback", cli.url))
                .body(payload)
                .send()
                .await?
        }
        Commands::Get { reply } => {
            let mut req = client.get(format!("{}/get", cli.url));
            if let Some(reply) = reply {
                req = req.query(&[("body", reply)]);
            }
            req.send().await?
        }
        Commands::Metrics => client.get(format!("{}/metrics", cli.url)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: balancer returned status {}", status);
        eprint!("{}", text);
        std::process::exit(1);
    }

    print!("{}", text);
    Ok(())
}
