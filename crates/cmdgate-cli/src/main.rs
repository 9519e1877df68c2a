//! Binary entrypoint for the cmdgate console.

#[tokio::main]
async fn main() {
    std::process::exit(cmdgate_cli::run().await);
}
