#[tokio::main]
async fn main() -> std::process::ExitCode {
    order_verifier::start(std::env::args()).await
}
