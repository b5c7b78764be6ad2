use std::io::Write as _;
use std::time::Instant;

use anyhow::Result;
use llmapi::ChatFn;

use crate::commands::prompts::render_caption_prompt;
use crate::config::CaptionConfig;
use crate::constants::{BANNER_RULE_WIDTH, CAPTION_PREVIEW_CHARS};
use crate::error::CaptionerError;
use crate::fs_utils::{caption_exists, encode_image, scan_image_folder, write_caption_file};
use crate::models::{Caption, CaptionOutcome, CaptionRequest, ImageFile, RunSummary};

pub fn build_caption_request(image: &ImageFile, trigger: &str) -> Result<CaptionRequest> {
    let (image_base64, mime_type) = encode_image(image.path())?;
    Ok(CaptionRequest {
        image_base64,
        mime_type,
        prompt: render_caption_prompt(trigger),
    })
}

/// One remote call for one image; the reply is normalized to carry the trigger prefix.
pub async fn caption_image(chat: &ChatFn, image: &ImageFile, trigger: &str) -> Result<Caption> {
    let request = build_caption_request(image, trigger)?;
    let reply = chat(request.into_messages()).await?;
    Ok(Caption::from_response(&reply.text(), trigger))
}

/// Captions one image and, outside preview mode, stores the caption next to it.
pub async fn process_image(
    config: &CaptionConfig,
    chat: &ChatFn,
    image: &ImageFile,
) -> CaptionOutcome {
    let started = Instant::now();
    let outcome = match caption_and_store(config, chat, image).await {
        Ok(caption) => CaptionOutcome::Captioned(caption),
        Err(err) => CaptionOutcome::Failed(format!("{err:#}")),
    };
    log::debug!("{} finished in {:?}", image.file_name(), started.elapsed());
    outcome
}

async fn caption_and_store(
    config: &CaptionConfig,
    chat: &ChatFn,
    image: &ImageFile,
) -> Result<Caption> {
    let caption = caption_image(chat, image, &config.trigger).await?;
    if !config.preview {
        write_caption_file(image, caption.as_str()).await?;
    }
    Ok(caption)
}

/// Existing captions are kept unless overwriting or previewing.
pub async fn should_skip(config: &CaptionConfig, image: &ImageFile) -> bool {
    if config.overwrite || config.preview {
        return false;
    }
    match caption_exists(image).await {
        Ok(exists) => exists,
        Err(err) => {
            log::warn!("{err:#}");
            false
        }
    }
}

/// Walks the folder once, sequentially, and reports what happened to each image.
pub async fn run_captioning(
    config: &CaptionConfig,
    chat: ChatFn,
) -> Result<RunSummary, CaptionerError> {
    let images = scan_image_folder(&config.folder).await?;
    let total = images.len();
    print_banner(config, total);

    let mut summary = RunSummary::default();

    for (index, image) in images.iter().enumerate() {
        let position = format!("[{}/{}]", index + 1, total);
        let name = image.file_name();

        let outcome = if should_skip(config, image).await {
            println!("{position} {name} - SKIPPED (exists)");
            CaptionOutcome::Skipped
        } else {
            print!("{position} {name}... ");
            let _ = std::io::stdout().flush();

            let outcome = process_image(config, &chat, image).await;
            match &outcome {
                CaptionOutcome::Captioned(caption) => {
                    println!("OK");
                    println!("    {}", caption.preview(CAPTION_PREVIEW_CHARS));
                }
                CaptionOutcome::Failed(reason) => println!("FAILED: {reason}"),
                CaptionOutcome::Skipped => {}
            }
            outcome
        };

        summary.record(&outcome);
    }

    print_summary(config, &summary);
    Ok(summary)
}

fn print_banner(config: &CaptionConfig, total: usize) {
    let rule = "=".repeat(BANNER_RULE_WIDTH);
    println!("{rule}");
    println!("LoRA Image Captioner");
    println!("{rule}");
    println!("Folder: {}", config.folder.display());
    println!("Images: {total}");
    println!("Trigger: {}", config.trigger);
    println!("Model: {}", config.model);
    println!("Mode: {}", config.mode_label());
    println!("{rule}\n");
}

fn print_summary(config: &CaptionConfig, summary: &RunSummary) {
    println!("\n{}", "=".repeat(BANNER_RULE_WIDTH));
    println!("Done! {summary}");
    if !config.preview {
        println!("Caption files saved to: {}/", config.folder.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmapi::{chat_fn, LLMMessage, LLMMessageType};
    use std::path::Path;

    fn config(folder: &Path, preview: bool, overwrite: bool) -> CaptionConfig {
        CaptionConfig {
            folder: folder.to_path_buf(),
            trigger: "FOO".into(),
            model: "test-model".into(),
            preview,
            overwrite,
            api_key: "sk-test".into(),
            base_url: "http://localhost".into(),
        }
    }

    fn replying(text: &'static str) -> ChatFn {
        chat_fn(move |_messages: Vec<LLMMessage>| async move {
            Ok::<_, anyhow::Error>(LLMMessage::new(
                None,
                "assistant",
                vec![LLMMessageType::text(text)],
            ))
        })
    }

    #[test]
    fn request_carries_prompt_and_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"hi").unwrap();

        let request = build_caption_request(&ImageFile::new(path), "FOO").unwrap();
        assert_eq!(request.image_base64, "aGk=");
        assert_eq!(request.mime_type, "image/png");
        assert!(request.prompt.contains("Start with: \"a photo of FOO,\""));
    }

    #[tokio::test]
    async fn caption_gets_prefix_when_model_omits_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let chat = replying("  standing by a window\n");
        let caption = caption_image(&chat, &ImageFile::new(path), "FOO")
            .await
            .unwrap();
        assert_eq!(caption.as_str(), "a photo of FOO, standing by a window");
    }

    #[tokio::test]
    async fn unreadable_image_is_a_failed_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let image = ImageFile::new(dir.path().join("gone.jpg"));

        let chat = replying("x");
        let outcome = process_image(&config(dir.path(), false, false), &chat, &image).await;
        match outcome {
            CaptionOutcome::Failed(reason) => assert!(reason.contains("gone.jpg"), "{reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!image.caption_path().exists());
    }

    #[tokio::test]
    async fn preview_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        std::fs::write(&path, b"jpeg").unwrap();
        let image = ImageFile::new(path);

        let chat = replying("a photo of FOO, x");
        let outcome = process_image(&config(dir.path(), true, false), &chat, &image).await;
        assert!(matches!(outcome, CaptionOutcome::Captioned(_)));
        assert!(!image.caption_path().exists());
    }

    #[tokio::test]
    async fn skip_rules_respect_modes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        std::fs::write(&path, b"jpeg").unwrap();
        let image = ImageFile::new(path);

        assert!(!should_skip(&config(dir.path(), false, false), &image).await);

        std::fs::write(image.caption_path(), "old").unwrap();
        assert!(should_skip(&config(dir.path(), false, false), &image).await);
        assert!(!should_skip(&config(dir.path(), false, true), &image).await);
        assert!(!should_skip(&config(dir.path(), true, false), &image).await);
    }
}
