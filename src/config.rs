use std::path::{Path, PathBuf};

use argh::FromArgs;
use llmapi::LLMClient;

use crate::constants::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_CAPTION_MODEL, DEFAULT_OPENAI_ENDPOINT, EXIT_USAGE,
};
use crate::error::CaptionerError;

/// Auto-caption images for LoRA training with a vision-language model.
///
/// Reads the API key from OPENAI_API_KEY (a `.env` file in the working
/// directory is honored) and the endpoint from OPENAI_BASE_URL if set.
#[derive(Debug, FromArgs)]
#[argh(
    example = "{command_name} --folder ./my_photos --trigger MYTRIGGER",
    example = "{command_name} --folder ./my_photos --trigger MYTRIGGER --preview",
    example = "{command_name} --folder ./my_photos --trigger MYTRIGGER --overwrite"
)]
pub struct Args {
    /// path to the folder containing images
    #[argh(option, short = 'f')]
    pub folder: String,

    /// trigger word for your LoRA (e.g. MYTRIGGER)
    #[argh(option, short = 't')]
    pub trigger: String,

    /// model used for captioning (default: gpt-5-mini)
    #[argh(option, short = 'm', default = "DEFAULT_CAPTION_MODEL.to_string()")]
    pub model: String,

    /// preview captions without saving
    #[argh(switch, short = 'p')]
    pub preview: bool,

    /// overwrite existing caption files
    #[argh(switch, short = 'o')]
    pub overwrite: bool,
}

/// Parses a full argv (program name first). `Err` carries the exit status:
/// 0 after printing `--help`, 2 after printing a usage error.
pub fn parse_args(argv: &[String]) -> Result<Args, u8> {
    let (command, rest) = match argv.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => ("lora-captioner", &[][..]),
    };
    let command = Path::new(command)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(command);
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    Args::from_args(&[command], &rest).map_err(|early_exit| match early_exit.status {
        Ok(()) => {
            println!("{}", early_exit.output);
            0
        }
        Err(()) => {
            eprintln!("{}", early_exit.output);
            eprintln!("Run {command} --help for more information.");
            EXIT_USAGE
        }
    })
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    pub folder: PathBuf,
    pub trigger: String,
    pub model: String,
    pub preview: bool,
    pub overwrite: bool,
    pub api_key: String,
    pub base_url: String,
}

impl CaptionConfig {
    pub fn from_lookup<F>(args: Args, lookup: F) -> Result<Self, CaptionerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(CaptionerError::MissingCredential)?;

        let base_url = lookup(BASE_URL_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.to_string());

        Ok(Self {
            folder: PathBuf::from(args.folder),
            trigger: args.trigger,
            model: args.model,
            preview: args.preview,
            overwrite: args.overwrite,
            api_key,
            base_url,
        })
    }

    pub fn llm_client(&self) -> LLMClient {
        LLMClient::new(&self.api_key, &self.base_url, &self.model)
    }

    pub fn mode_label(&self) -> &'static str {
        if self.preview { "Preview" } else { "Save" }
    }
}
