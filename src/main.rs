#![allow(missing_docs)]

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    letterboxd_tag_stats_lib::run().await
}
