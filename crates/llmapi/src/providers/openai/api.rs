use anyhow::{Context, Result, anyhow, bail};
use reqwest::Client;
use serde_json::{Value, json};

use crate::types::{ChatFn, LLMClient, LLMMessage, LLMMessageType, LLMUserType, chat_fn};

use super::models::{ApiErrorEnvelope, ResponsesResponse};

pub fn chat(client: LLMClient) -> ChatFn {
    chat_fn(move |messages: Vec<LLMMessage>| {
        let client = client.clone();
        async move { send_response_request(&client, messages).await }
    })
}

pub async fn send_response_request(
    client: &LLMClient,
    messages: Vec<LLMMessage>,
) -> Result<LLMMessage> {
    let url = format!("{}/responses", client.endpoint().trim_end_matches('/'));
    let payload = build_payload(client.default_model(), messages);

    log::debug!("POST {url} (model {})", client.default_model());

    let http_client = Client::new();
    let response = http_client
        .post(url)
        .bearer_auth(client.api_key())
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
        .context("OpenAI request failed")?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .context("Failed to read OpenAI response body")?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ApiErrorEnvelope>(&response_text)
            .map(|envelope| envelope.error.message)
            .unwrap_or(response_text);
        bail!("OpenAI returned status {status}: {detail}");
    }

    let response: ResponsesResponse = serde_json::from_str(&response_text)
        .with_context(|| format!("Failed to decode OpenAI response JSON: {response_text}"))?;

    convert_openai_response(response)
}

pub fn build_payload(model: &str, messages: Vec<LLMMessage>) -> Value {
    json!({
        "model": model,
        "input": messages.into_iter().map(convert_message).collect::<Vec<_>>(),
    })
}

fn convert_message(message: LLMMessage) -> Value {
    let (role, text_kind) = match message.role {
        LLMUserType::Human => ("user", "input_text"),
        LLMUserType::AI => ("assistant", "output_text"),
        LLMUserType::System => ("system", "input_text"),
    };

    let content: Vec<Value> = message
        .content
        .into_iter()
        .map(|part| match part {
            LLMMessageType::TEXT(text) => json!({
                "type": text_kind,
                "text": text
            }),
            image @ LLMMessageType::IMAGE { .. } => json!({
                "type": "input_image",
                "image_url": image.data_url()
            }),
        })
        .collect();

    json!({
        "role": role,
        "content": content
    })
}

fn convert_openai_response(response: ResponsesResponse) -> Result<LLMMessage> {
    if let Some(error) = &response.error {
        let code = error.code.as_deref().unwrap_or("unknown");
        return Err(anyhow!("OpenAI response error ({code}): {}", error.message));
    }

    if response.status.as_deref() == Some("failed") {
        return Err(anyhow!("OpenAI response failed without an error message"));
    }

    let text = response.output_text();
    Ok(LLMMessage::new(
        response.id,
        "assistant",
        vec![LLMMessageType::text(text)],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn user_message() -> LLMMessage {
        LLMMessage::new(
            None,
            "user",
            vec![
                LLMMessageType::text("Describe this photo"),
                LLMMessageType::image_b64("aGVsbG8=", "image/png"),
            ],
        )
    }

    #[test]
    fn payload_embeds_image_as_data_url() {
        let payload = build_payload("gpt-5-mini", vec![user_message()]);
        assert_eq!(
            payload,
            json!({
                "model": "gpt-5-mini",
                "input": [{
                    "role": "user",
                    "content": [
                        {"type": "input_text", "text": "Describe this photo"},
                        {"type": "input_image", "image_url": "data:image/png;base64,aGVsbG8="}
                    ]
                }]
            })
        );
    }

    #[tokio::test]
    async fn returns_output_text_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/responses")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({"model": "gpt-5-mini"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"resp_42","status":"completed","output":[
                    {"type":"message","role":"assistant","content":[
                        {"type":"output_text","text":"a photo of FOO, laughing"}]}]}"#,
            )
            .create_async()
            .await;

        let client = LLMClient::new("sk-test", format!("{}/v1/", server.url()), "gpt-5-mini");
        let reply = send_response_request(&client, vec![user_message()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply.id, "resp_42");
        assert_eq!(reply.role, LLMUserType::AI);
        assert_eq!(reply.text(), "a photo of FOO, laughing");
    }

    #[tokio::test]
    async fn non_success_status_carries_api_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/responses")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided","code":"invalid_api_key"}}"#)
            .create_async()
            .await;

        let client = LLMClient::new("sk-bad", server.url(), "gpt-5-mini");
        let err = send_response_request(&client, vec![user_message()])
            .await
            .unwrap_err()
            .to_string();

        assert!(err.contains("401"), "{err}");
        assert!(err.contains("Incorrect API key provided"), "{err}");
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/responses")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let chat = chat(LLMClient::new("sk-test", server.url(), "gpt-5-mini"));
        let err = chat(vec![user_message()]).await.unwrap_err();
        assert!(err.to_string().contains("Failed to decode OpenAI response JSON"));
    }

    #[test]
    fn failed_status_is_an_error() {
        let response: ResponsesResponse = serde_json::from_str(
            r#"{"id":"resp_1","status":"failed","error":{"code":"server_error","message":"boom"}}"#,
        )
        .unwrap();
        let err = convert_openai_response(response).unwrap_err().to_string();
        assert!(err.contains("server_error"));
        assert!(err.contains("boom"));
    }
}
