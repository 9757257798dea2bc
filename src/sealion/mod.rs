pub mod models;

use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::error::TranslatorError;
use crate::job::Language;

use models::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Model, ModelList,
    SeaLionConfiguration, CHAT_COMPLETIONS_PATH, MODELS_PATH,
};

pub const TEXT_TO_TRANSLATE_MARKER: &str = "Text to translate:";

pub fn build_messages(text: &str, language: Language) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are a professional translator specialising in literary translation to {}. \
             Maintain the original style and meaning while producing natural, fluent translations.",
            language
        )),
        ChatMessage::user(format!(
            "Please translate the following English text to {}.\n\
             Maintain the original formatting, paragraph structure, and literary style.\n\
             Preserve proper nouns and character names appropriately.\n\n\
             {}\n\n{}",
            language, TEXT_TO_TRANSLATE_MARKER, text
        )),
    ]
}

// Sends one chunk and returns the model's answer verbatim.
pub async fn translate(
    client: &Client,
    config: &SeaLionConfiguration,
    text: &str,
    language: Language,
) -> Result<String, TranslatorError> {
    debug!(
        "Translating {} characters to {} with {}",
        text.chars().count(),
        language,
        config.model
    );

    let body = ChatCompletionRequest {
        model: config.model.clone(),
        messages: build_messages(text, language),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    let response = client
        .post(config.endpoint(CHAT_COMPLETIONS_PATH))
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| TranslatorError::network("calling SEA-LION", e))?;

    let response: ChatCompletionResponse = check_status(response)
        .await?
        .json()
        .await
        .map_err(|e| TranslatorError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TranslatorError::MalformedResponse("no message content".to_string()))
}

pub async fn list_models(
    client: &Client,
    config: &SeaLionConfiguration,
) -> Result<Vec<Model>, TranslatorError> {
    debug!("Listing SEA-LION models");

    let response = client
        .get(config.endpoint(MODELS_PATH))
        .bearer_auth(&config.api_key)
        .send()
        .await
        .map_err(|e| TranslatorError::network("listing SEA-LION models", e))?;

    let models: ModelList = check_status(response)
        .await?
        .json()
        .await
        .map_err(|e| TranslatorError::MalformedResponse(e.to_string()))?;

    Ok(models.data)
}

async fn check_status(response: Response) -> Result<Response, TranslatorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = match response.text().await {
        Ok(detail) => detail,
        Err(e) => {
            debug!("Could not read the {} error body: {}", status, e);
            String::new()
        }
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(TranslatorError::Authentication { status, detail })
        }
        _ => Err(TranslatorError::Service { status, detail }),
    }
}
