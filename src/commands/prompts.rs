use crate::constants::TRIGGER_PLACEHOLDER;

/// Instruction sent with every image. Caption quality for LoRA training depends on this wording.
pub const CAPTION_PROMPT: &str = r#"Describe this photo for AI image model training. Focus on:

1. APPEARANCE: clothing, hair style, facial expression, pose, body position
2. SETTING: location, background, environment
3. LIGHTING: natural/artificial, direction, mood
4. PHOTO STYLE: candid, portrait, action shot, etc.

DO NOT describe:
- Specific facial features (the model learns these from the image)
- Race, ethnicity, or age estimates
- Subjective attractiveness judgments

Write as a single flowing description. Start with: "a photo of {trigger},"

Example:
"a photo of {trigger}, wearing a fitted navy henley shirt, standing outdoors with arms crossed, confident relaxed expression, golden hour sunlight from the left, urban park background with blurred trees, candid lifestyle photography style"
"#;

pub fn render_caption_prompt(trigger: &str) -> String {
    CAPTION_PROMPT.replace(TRIGGER_PLACEHOLDER, trigger)
}
