use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    flowbot_cli::run().await
}
