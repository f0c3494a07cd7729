use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match spade_client::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "Spade client failed");
            eprintln!("spade-client: {error}");
            ExitCode::FAILURE
        }
    }
}
