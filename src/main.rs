use clap::{Parser, Subcommand};
use drawdown::api::{Cli, run_cli_projection, run_http_server};

#[derive(Parser, Debug)]
#[command(
    name = "drawdown",
    about = "Pension pot projection and sustainable retirement income calculator"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run one projection and print it as JSON
    Project(Cli),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    match Args::parse().command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                log::error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project(cli) => match run_cli_projection(cli) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
    }
}
