#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fitclub_booking::run().await
}
