use book_translator::error::TranslatorError;
use book_translator::gutenberg::BOOK_URL;
use book_translator::job::{
    resolve_output_path, Language, TranslationJob, DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_DIR,
};
use book_translator::mock::{run_mock_server, MockOptions};
use book_translator::sealion::models::{SeaLionConfiguration, DEFAULT_MODEL, SEALION_API_URL};
use book_translator::{build_client, translate_book};

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Translate The Art of Public Speaking to Southeast Asian languages using the SEA-LION API",
    long_about = None
)]
struct Args {
    /// Target language for translation
    #[arg(short, long, value_enum)]
    language: Language,

    /// SEA-LION API key (optional, defaults to SEALION_API_KEY environment variable)
    #[arg(short = 'k', long, env = "SEALION_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output file name, placed in the output directory unless absolute
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory the translation is written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Plain-text book to translate
    #[arg(long, default_value = BOOK_URL)]
    book_url: String,

    /// SEA-LION API base URL
    #[arg(long, default_value = SEALION_API_URL)]
    api_url: String,

    /// Model used for translation
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum characters sent per request, 0 sends the whole book at once
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    // Verbose
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,

    /// Use test configuration, call to mock server
    #[arg(long)]
    test: bool,
}

impl Args {
    fn into_job(self) -> Result<TranslationJob, TranslatorError> {
        let api_key = self.api_key.unwrap_or_default();
        let sealion = SeaLionConfiguration::new(api_key)
            .with_api_url(self.api_url)
            .with_model(self.model);
        let output_path =
            resolve_output_path(&self.output_dir, self.output.as_deref(), self.language);

        TranslationJob::new(
            self.language,
            sealion,
            self.book_url,
            output_path,
            self.chunk_size,
        )
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(error: &TranslatorError) -> ! {
    eprintln!("Error: {}", error);
    if error.is_usage() {
        eprintln!();
        eprintln!("{}", Args::command().render_usage());
    }
    std::process::exit(error.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let test_mode = args.test;
    let mut job = match args.into_job() {
        Ok(job) => job,
        Err(e) => exit_with(&e),
    };

    // If test then start mock server
    let mock_server = if test_mode {
        println!("Starting mock server for test mode...");
        match run_mock_server(MockOptions::default()).await {
            Ok(server) => {
                job.book_url = server.book_url();
                job.sealion = job.sealion.clone().with_api_url(server.api_url());
                Some(server)
            }
            Err(e) => exit_with(&TranslatorError::from(e)),
        }
    } else {
        None
    };

    println!("Starting translation to {}...", job.language);
    println!("Using model: {}", job.sealion.model);
    debug!("Job: {:?}", job);

    let client = match build_client() {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };

    let start = Instant::now();
    let outcome = translate_book(&client, &job).await;

    // Shutdown mock server if test mode
    if let Some(server) = mock_server {
        server.shutdown();
    }

    match outcome {
        Ok(outcome) => {
            info!("Total duration: {:?}", start.elapsed());
            println!();
            println!("Translation completed successfully!");
            println!("Translated book saved to: {}", outcome.output_path.display());
            println!("Language: {}", job.language);
            println!(
                "Translated {} characters in {} chunks into {} characters",
                outcome.source_chars, outcome.chunks, outcome.translated_chars
            );
        }
        Err(e) => exit_with(&e),
    }
}
