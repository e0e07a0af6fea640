#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = coursely_rust::run().await {
        eprintln!("coursely-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
