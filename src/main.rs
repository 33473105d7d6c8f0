#[tokio::main]
async fn main() {
    if let Err(err) = scf_mcp::mcp::server::run_stdio().await {
        eprintln!("mcp-server-scf: {}", err);
        std::process::exit(1);
    }
}
