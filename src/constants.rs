pub const DEFAULT_CAPTION_MODEL: &str = "gpt-5-mini";
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
pub const CAPTION_EXTENSION: &str = "txt";
pub const CAPTION_PREVIEW_CHARS: usize = 80;
pub const TRIGGER_PLACEHOLDER: &str = "{trigger}";
pub const BANNER_RULE_WIDTH: usize = 50;
pub const EXIT_FATAL: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
