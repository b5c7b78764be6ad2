use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match lora_captioner_lib::parse_args(&argv) {
        Ok(args) => args,
        Err(code) => return ExitCode::from(code),
    };
    lora_captioner_lib::run(args).await
}
