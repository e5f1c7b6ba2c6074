use std::io::{self, Write};

use clap::Parser;

use lingo_client::api::ApiClient;
use lingo_client::app::App;
use lingo_client::config::Config;
use lingo_client::logging;
use lingo_client::shell::{self, Flow};

#[derive(Parser, Debug)]
#[command(name = "lingo-client", version, about = "Terminal client for the language learning backend")]
struct CliArgs {
    /// Backend base URL (overrides LINGO_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Tracing filter, e.g. `debug` or `lingo_client=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();

    let mut config = Config::from_env();
    if let Some(api_url) = args.api_url.as_deref() {
        config = config.with_api_url(api_url);
    }
    if let Some(log_level) = args.log_level.as_deref() {
        config = config.with_log_level(log_level);
    }

    let _log_guard = logging::init_tracing(&config.log_level);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start runtime: {err}");
            std::process::exit(1);
        }
    };

    let api = match ApiClient::new(&config) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("Failed to create HTTP client: {err}");
            std::process::exit(1);
        }
    };
    tracing::info!(api_url = %api.base_url(), "lingo-client starting");

    let mut app = App::new(api);
    runtime.block_on(app.refresh());
    print!("{}", app.view());

    let confirm = |prompt: &str| -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        read_line().is_some_and(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    };

    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            break;
        };

        let command = match shell::parse(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                let _ = err.print();
                continue;
            }
        };

        match runtime.block_on(shell::execute(&mut app, command, &confirm)) {
            Flow::Quit => break,
            Flow::Continue => print!("{}", app.view()),
        }
    }

    tracing::info!("lingo-client stopped");
}

/// `None` on end of input or a read error.
fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read stdin");
            None
        }
    }
}
