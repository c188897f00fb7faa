#[tokio::main]
async fn main() -> std::io::Result<()> {
    zombie_server::run_with_config().await
}
