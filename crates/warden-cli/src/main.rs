use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match warden_cli::run().await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
