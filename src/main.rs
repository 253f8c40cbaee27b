#[tokio::main]
async fn main() {
    if let Err(e) = medreview_lib::run().await {
        eprintln!("medreview: {e}");
        std::process::exit(1);
    }
}
