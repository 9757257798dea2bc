// The job module holds one invocation's validated configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::TranslatorError;
use crate::sealion::models::SeaLionConfiguration;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CHUNK_SIZE: usize = 3000;

/// Target languages SEA-LION translates the book into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    Indonesian,
    Filipino,
    Tamil,
    Thai,
    Vietnamese,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Indonesian,
        Language::Filipino,
        Language::Tamil,
        Language::Thai,
        Language::Vietnamese,
    ];

    /// Spelling used on the command line and in file names.
    pub fn code(self) -> &'static str {
        match self {
            Language::Indonesian => "indonesian",
            Language::Filipino => "filipino",
            Language::Tamil => "tamil",
            Language::Thai => "thai",
            Language::Vietnamese => "vietnamese",
        }
    }

    /// Name used in prompts and messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Indonesian => "Indonesian",
            Language::Filipino => "Filipino",
            Language::Tamil => "Tamil",
            Language::Thai => "Thai",
            Language::Vietnamese => "Vietnamese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = TranslatorError;

    // Case-sensitive, same as the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.code() == s)
            .ok_or_else(|| {
                TranslatorError::Usage(format!(
                    "unsupported language: {}. Supported languages: {}",
                    s,
                    Language::ALL.map(Language::code).join(", ")
                ))
            })
    }
}

pub fn default_output_file_name(language: Language) -> String {
    format!(
        "the_art_of_public_speaking_translated_{}.txt",
        language.code()
    )
}

/// Where the translation is written. A relative `output` lands in `output_dir`,
/// an absolute one replaces it (`Path::join` semantics).
pub fn resolve_output_path(
    output_dir: &Path,
    output: Option<&Path>,
    language: Language,
) -> PathBuf {
    match output {
        Some(output) => output_dir.join(output),
        None => output_dir.join(default_output_file_name(language)),
    }
}

#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub language: Language,
    pub sealion: SeaLionConfiguration,
    pub book_url: String,
    pub output_path: PathBuf,
    /// Maximum characters per request, 0 sends the book in one request
    pub chunk_size: usize,
}

impl TranslationJob {
    pub fn new(
        language: Language,
        sealion: SeaLionConfiguration,
        book_url: String,
        output_path: PathBuf,
        chunk_size: usize,
    ) -> Result<Self, TranslatorError> {
        if sealion.api_key.trim().is_empty() {
            return Err(TranslatorError::Usage(
                "API key is required. Provide it via --api-key or SEALION_API_KEY".to_string(),
            ));
        }

        Ok(Self {
            language,
            sealion,
            book_url,
            output_path,
            chunk_size,
        })
    }
}
