mod commands;
mod config;
mod constants;
mod error;
mod fs_utils;
mod models;

pub use commands::caption::{
    build_caption_request, caption_image, process_image, run_captioning, should_skip,
};
pub use commands::prompts::{render_caption_prompt, CAPTION_PROMPT};

pub use config::{parse_args, Args, CaptionConfig};

pub use constants::{
    API_KEY_ENV, BASE_URL_ENV, CAPTION_EXTENSION, DEFAULT_CAPTION_MODEL, DEFAULT_OPENAI_ENDPOINT,
    EXIT_FATAL, EXIT_USAGE, IMAGE_EXTENSIONS,
};

pub use error::CaptionerError;

pub use fs_utils::{encode_image, has_image_extension, scan_image_folder, write_caption_file};

pub use models::{Caption, CaptionOutcome, CaptionRequest, ImageFile, RunSummary};

use std::process::ExitCode;

/// Resolves configuration from the process environment and runs the captioner.
pub async fn run(args: Args) -> ExitCode {
    ExitCode::from(run_with_env(args, |key| std::env::var(key).ok()).await)
}

/// Exit status is 1 for fatal startup errors and 0 once the run completes,
/// however many images failed.
pub async fn run_with_env<F>(args: Args, lookup: F) -> u8
where
    F: Fn(&str) -> Option<String>,
{
    let config = match CaptionConfig::from_lookup(args, lookup) {
        Ok(config) => config,
        Err(err) => return report_fatal(&err),
    };

    let chat = llmapi::get_llm_chat(config.llm_client());

    match run_captioning(&config, chat).await {
        Ok(summary) => {
            log::debug!("run finished: {summary}");
            0
        }
        Err(err) => report_fatal(&err),
    }
}

fn report_fatal(err: &CaptionerError) -> u8 {
    eprintln!("Error: {err}");
    if let Some(hint) = err.hint() {
        eprintln!("{hint}");
    }
    EXIT_FATAL
}
