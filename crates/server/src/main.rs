#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pdfjson_server::start().await
}
