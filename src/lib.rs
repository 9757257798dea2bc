pub mod error;
pub mod gutenberg;
pub mod job;
pub mod mock;
pub mod output;
pub mod sealion;
pub mod text;

use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{debug, error, info};

use crate::error::TranslatorError;
use crate::gutenberg::{book_title, clean_text, download_book};
use crate::job::TranslationJob;
use crate::output::save_translation;
use crate::text::{join_chunks, split_text};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub output_path: PathBuf,
    pub source_chars: usize,
    pub chunks: usize,
    pub translated_chars: usize,
}

pub fn build_client() -> Result<Client, TranslatorError> {
    Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| TranslatorError::network("building the HTTP client", e))
}

fn chunk_progress(len: usize) -> ProgressBar {
    let progress = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} chunks")
    {
        progress.set_style(style);
    }
    progress
}

// Download, clean, split, translate chunk by chunk, write.
// Nothing is written unless every chunk was translated.
pub async fn translate_book(
    client: &Client,
    job: &TranslationJob,
) -> Result<TranslationOutcome, TranslatorError> {
    let book = download_book(client, &job.book_url).await?;
    let title = book_title(&book);
    let cleaned = clean_text(&book)?;
    let chunks = split_text(&cleaned, job.chunk_size);

    info!(
        "Translating \"{}\" to {} in {} chunks",
        title,
        job.language,
        chunks.len()
    );

    let progress = chunk_progress(chunks.len());
    let mut translated = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        debug!("Translating chunk {}/{}", index + 1, chunks.len());
        let text = sealion::translate(client, &job.sealion, chunk, job.language)
            .await
            .inspect_err(|e| {
                progress.abandon();
                error!("Failed to translate chunk {}: {}", index + 1, e);
            })?;
        translated.push(text);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let translated = join_chunks(&translated);
    let output_path = save_translation(&job.output_path, &translated)?;

    info!("Translation completed successfully");

    Ok(TranslationOutcome {
        output_path,
        source_chars: cleaned.chars().count(),
        chunks: chunks.len(),
        translated_chars: translated.chars().count(),
    })
}

// Integration tests for the whole process against the mock server.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{resolve_output_path, Language, DEFAULT_CHUNK_SIZE};
    use crate::mock::{mock_translation, run_mock_server, MockOptions, MockServer};
    use crate::sealion::models::SeaLionConfiguration;
    use std::fs;
    use std::path::Path;

    fn job_for(
        server: &MockServer,
        language: Language,
        output_path: PathBuf,
        chunk_size: usize,
    ) -> TranslationJob {
        let sealion =
            SeaLionConfiguration::new("mock_api_key".to_string()).with_api_url(server.api_url());
        TranslationJob::new(language, sealion, server.book_url(), output_path, chunk_size).unwrap()
    }

    #[tokio::test]
    async fn test_translate_book_to_default_path() -> Result<(), Box<dyn std::error::Error>> {
        let server = run_mock_server(MockOptions::default()).await?;
        let temp_dir = tempfile::tempdir()?;
        let output_dir = temp_dir.path().join("output");
        let output_path = resolve_output_path(&output_dir, None, Language::Indonesian);
        let job = job_for(&server, Language::Indonesian, output_path, DEFAULT_CHUNK_SIZE);

        let outcome = translate_book(&build_client()?, &job).await?;

        let expected_path =
            output_dir.join("the_art_of_public_speaking_translated_indonesian.txt");
        assert_eq!(outcome.output_path, expected_path);
        assert_eq!(outcome.chunks, 1);
        assert_eq!(server.chat_requests(), 1);

        let expected = mock_translation(
            "CHAPTER I\nTHE ACQUIREMENT OF CONFIDENCE BEFORE AN AUDIENCE\n\
             There is a strange sensation often experienced in the presence of an audience.",
            Some(Language::Indonesian),
        );
        assert_eq!(fs::read(&expected_path)?, expected.as_bytes());

        server.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_translate_book_to_explicit_path() -> Result<(), Box<dyn std::error::Error>> {
        let server = run_mock_server(MockOptions::default()).await?;
        let temp_dir = tempfile::tempdir()?;
        let output_dir = temp_dir.path().join("output");
        let output_path =
            resolve_output_path(&output_dir, Some(Path::new("mine.txt")), Language::Thai);
        let job = job_for(&server, Language::Thai, output_path, DEFAULT_CHUNK_SIZE);

        let outcome = translate_book(&build_client()?, &job).await?;

        assert_eq!(outcome.output_path, output_dir.join("mine.txt"));
        assert!(outcome.output_path.exists());
        assert!(!output_dir
            .join("the_art_of_public_speaking_translated_thai.txt")
            .exists());

        server.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_chunks_are_translated_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let server = run_mock_server(MockOptions {
            book: "alpha\nbravo\ncharlie".to_string(),
            ..MockOptions::default()
        })
        .await?;
        let temp_dir = tempfile::tempdir()?;
        let output_path = temp_dir.path().join("out.txt");
        let job = job_for(&server, Language::Tamil, output_path.clone(), 5);

        let outcome = translate_book(&build_client()?, &job).await?;

        assert_eq!(outcome.chunks, 3);
        assert_eq!(server.chat_requests(), 3);
        let expected = ["alpha", "bravo", "charlie"]
            .map(|chunk| mock_translation(chunk, Some(Language::Tamil)))
            .join("\n\n");
        assert_eq!(fs::read_to_string(&output_path)?, expected);

        server.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_api_failure_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let server = run_mock_server(MockOptions {
            chat_status: Some(401),
            ..MockOptions::default()
        })
        .await?;
        let temp_dir = tempfile::tempdir()?;
        let output_path = temp_dir.path().join("output").join("out.txt");
        let job = job_for(
            &server,
            Language::Vietnamese,
            output_path.clone(),
            DEFAULT_CHUNK_SIZE,
        );

        let result = translate_book(&build_client()?, &job).await;

        let error = result.unwrap_err();
        assert!(matches!(error, TranslatorError::Authentication { .. }));
        assert_ne!(error.exit_code(), 0);
        assert!(!output_path.exists());
        assert!(!temp_dir.path().join("output").exists());

        server.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_answer_without_content_writes_nothing() -> Result<(), Box<dyn std::error::Error>>
    {
        let server = run_mock_server(MockOptions {
            chat_status: Some(200),
            ..MockOptions::default()
        })
        .await?;
        let temp_dir = tempfile::tempdir()?;
        let output_path = temp_dir.path().join("output").join("out.txt");
        let job = job_for(&server, Language::Thai, output_path.clone(), DEFAULT_CHUNK_SIZE);

        let error = translate_book(&build_client()?, &job).await.unwrap_err();

        assert!(matches!(error, TranslatorError::MalformedResponse(_)));
        assert_eq!(error.exit_code(), 4);
        assert!(!output_path.exists());

        server.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_book_fails_before_translation() -> Result<(), Box<dyn std::error::Error>> {
        let server = run_mock_server(MockOptions {
            book: String::new(),
            ..MockOptions::default()
        })
        .await?;
        let temp_dir = tempfile::tempdir()?;
        let output_path = temp_dir.path().join("out.txt");
        let job = job_for(&server, Language::Filipino, output_path.clone(), DEFAULT_CHUNK_SIZE);

        let result = translate_book(&build_client()?, &job).await;

        assert!(matches!(result, Err(TranslatorError::EmptyBook)));
        assert_eq!(server.chat_requests(), 0);
        assert!(!output_path.exists());

        server.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_book_is_unavailable() -> Result<(), Box<dyn std::error::Error>> {
        let server = run_mock_server(MockOptions::default()).await?;
        let temp_dir = tempfile::tempdir()?;
        let mut job = job_for(
            &server,
            Language::Filipino,
            temp_dir.path().join("out.txt"),
            DEFAULT_CHUNK_SIZE,
        );
        job.book_url = format!("http://{}/missing.txt", server.addr);

        let result = translate_book(&build_client()?, &job).await;

        assert!(matches!(
            result,
            Err(TranslatorError::BookUnavailable(status)) if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert_eq!(server.chat_requests(), 0);

        server.shutdown();
        Ok(())
    }
}
