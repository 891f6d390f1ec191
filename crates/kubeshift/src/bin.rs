use kubeshift::cli::commands;
use kubeshift::cli::parse_cli;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = parse_cli();

    let outcome = commands::migrate(cli).await;
    if let Err(e) = &outcome {
        eprintln!("kubeshift: {}", e);
    }
    ExitCode::from(commands::exit_status(&outcome))
}
