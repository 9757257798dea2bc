// Local stand-in for both collaborators: the Gutenberg text file and the
// SEA-LION chat completions API. Used by --test runs and by the tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, info};
use warp::http::StatusCode;
use warp::Filter;

use crate::job::Language;
use crate::sealion::models::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, Model, ModelList, ResponseMessage,
};
use crate::sealion::TEXT_TO_TRANSLATE_MARKER;

pub const MOCK_PORT: u16 = 3030;

pub const MOCK_BOOK: &str = "\u{feff}The Project Gutenberg eBook of The Art of Public Speaking

Title: The Art of Public Speaking

*** START OF THE PROJECT GUTENBERG EBOOK THE ART OF PUBLIC SPEAKING ***

CHAPTER I

THE ACQUIREMENT OF CONFIDENCE BEFORE AN AUDIENCE

There is a strange sensation often experienced in the presence of an audience.

*** END OF THE PROJECT GUTENBERG EBOOK THE ART OF PUBLIC SPEAKING ***
";

#[derive(Debug, Clone)]
pub struct MockOptions {
    /// 0 lets the OS pick a free port
    pub port: u16,
    pub book: String,
    /// Status every chat completion request is answered with, instead of a translation
    pub chat_status: Option<u16>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            port: 0,
            book: MOCK_BOOK.to_string(),
            chat_status: None,
        }
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    chat_requests: Arc<AtomicUsize>,
}

impl MockServer {
    pub fn book_url(&self) -> String {
        format!("http://{}/book.txt", self.addr)
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of chat completion requests received so far.
    pub fn chat_requests(&self) -> usize {
        self.chat_requests.load(Ordering::SeqCst)
    }

    pub fn shutdown(self) {
        // The server task is gone already if this fails.
        let _ = self.shutdown.send(());
    }
}

/// The text the mock answers with for one translation request.
pub fn mock_translation(segment: &str, language: Option<Language>) -> String {
    match language {
        Some(language) => format!("--|{}|-- Translated to {}", segment, language),
        None => format!("--|{}|-- Translated", segment),
    }
}

fn answer_chat(request: &ChatCompletionRequest) -> ChatCompletionResponse {
    let system = request
        .messages
        .iter()
        .find(|message| message.role == "system")
        .map(|message| message.content.as_str())
        .unwrap_or_default();
    let language = Language::ALL
        .into_iter()
        .find(|language| system.contains(language.display_name()));

    let user = request
        .messages
        .iter()
        .rev()
        .find(|message| message.role == "user")
        .map(|message| message.content.as_str())
        .unwrap_or_default();
    let segment = user
        .split_once(TEXT_TO_TRANSLATE_MARKER)
        .map(|(_, segment)| segment.trim_start_matches('\n'))
        .unwrap_or(user);

    ChatCompletionResponse {
        choices: vec![Choice {
            message: ResponseMessage {
                role: Some("assistant".to_string()),
                content: Some(mock_translation(segment, language)),
            },
        }],
    }
}

// Binds 127.0.0.1 and serves until the returned server is shut down.
pub async fn run_mock_server(options: MockOptions) -> Result<MockServer, warp::Error> {
    let chat_requests = Arc::new(AtomicUsize::new(0));

    let book_text = options.book;
    // Paths before methods, so unknown paths answer 404 rather than 405.
    let book = warp::path("book.txt")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || {
            debug!("Mock Server: Book request");
            book_text.clone()
        });

    let counter = Arc::clone(&chat_requests);
    let chat_status = options.chat_status;
    let chat = warp::path!("v1" / "chat" / "completions")
        .and(warp::post())
        .and(warp::body::json::<ChatCompletionRequest>())
        .map(move |request: ChatCompletionRequest| {
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
            debug!("Mock Server: Chat completion request {}", count);

            match chat_status {
                Some(code) => {
                    let status =
                        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    let body = json!({
                        "error": {
                            "message": format!("mock failure {}", code),
                            "code": code,
                        }
                    });
                    warp::reply::with_status(warp::reply::json(&body), status)
                }
                None => warp::reply::with_status(
                    warp::reply::json(&answer_chat(&request)),
                    StatusCode::OK,
                ),
            }
        });

    let models = warp::path!("v1" / "models")
        .and(warp::get())
        .map(|| {
            debug!("Mock Server: Models request");
            let models = ModelList {
                data: vec![Model {
                    id: crate::sealion::models::DEFAULT_MODEL.to_string(),
                    owned_by: Some("openai".to_string()),
                }],
            };
            warp::reply::json(&models)
        });

    let routes = book.or(chat).or(models);

    let (tx, rx) = oneshot::channel();
    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(
        ([127, 0, 0, 1], options.port),
        async move {
            rx.await.ok();
        },
    )?;

    tokio::spawn(server);
    info!("Mock Server running on http://{}", addr);

    Ok(MockServer {
        addr,
        shutdown: tx,
        chat_requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sealion::models::ChatMessage;

    #[test]
    fn test_answer_echoes_segment_and_language() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![
                ChatMessage::system("You translate into Thai."),
                ChatMessage::user(format!(
                    "Please translate.\n\n{}\n\nHello",
                    TEXT_TO_TRANSLATE_MARKER
                )),
            ],
            max_tokens: 10,
            temperature: 0.0,
        };

        let response = answer_chat(&request);
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("--|Hello|-- Translated to Thai")
        );
    }

    #[tokio::test]
    async fn test_book_request_is_not_counted_as_chat() -> Result<(), Box<dyn std::error::Error>> {
        let server = run_mock_server(MockOptions {
            book: "plain book".to_string(),
            ..MockOptions::default()
        })
        .await?;

        let body = reqwest::get(server.book_url()).await?.text().await?;
        assert_eq!(body, "plain book");
        assert_eq!(server.chat_requests(), 0);

        server.shutdown();
        Ok(())
    }
}
