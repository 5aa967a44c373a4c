#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocablog_backend::run().await
}
