#[tokio::main]
async fn main() {
    contract_tags::start(std::env::args()).await;
}
