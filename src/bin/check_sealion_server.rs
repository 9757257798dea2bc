use book_translator::build_client;
use book_translator::job::Language;
use book_translator::sealion;
use book_translator::sealion::models::SeaLionConfiguration;
use std::env;

use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Get API key from env variable
    let api_key =
        env::var("SEALION_API_KEY").map_err(|_| "SEALION_API_KEY environment variable not set")?;

    let mut config = SeaLionConfiguration::new(api_key);
    if let Ok(api_url) = env::var("SEALION_API_URL") {
        config = config.with_api_url(api_url);
    }

    let client = build_client()?;

    let models = sealion::list_models(&client, &config).await?;
    println!("Models available at {}:", config.api_url);
    for model in &models {
        println!("  {}", model.id);
    }

    // Optional, defaults to indonesian
    let language = match env::var("SEALION_LANGUAGE") {
        Ok(language) => language.parse::<Language>()?,
        Err(_) => Language::Indonesian,
    };

    let text_to_translate = "Hello, world!";

    let translated_text =
        sealion::translate(&client, &config, text_to_translate, language).await?;

    println!(
        "Text: {} got translated to {} in {}",
        text_to_translate, translated_text, language
    );

    Ok(())
}
