use book_translator::mock::{run_mock_server, MockOptions, MOCK_PORT};

// Serves the sample book on /book.txt and a fake SEA-LION API on /v1 until Ctrl-C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let server = run_mock_server(MockOptions {
        port: MOCK_PORT,
        ..MockOptions::default()
    })
    .await?;

    println!("Book:    {}", server.book_url());
    println!("API:     {}", server.api_url());
    println!(
        "Try: book-translator -l thai -k mock --book-url {} --api-url {}",
        server.book_url(),
        server.api_url()
    );

    tokio::signal::ctrl_c().await?;
    println!("Handled {} chat requests", server.chat_requests());
    server.shutdown();

    Ok(())
}
