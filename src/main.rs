#[tokio::main]
async fn main() {
    slang::start_server().await;
}
