#[tokio::main]
async fn main() {
    let code = match openhands_cli::cli::run().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    };
    openhands_cli::utils::shutdown_logging();
    // A pending stdin read holds a blocking thread; exit without waiting on it.
    std::process::exit(code);
}
