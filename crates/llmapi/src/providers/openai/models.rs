use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResponsesResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<ResponseOutputItem>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl ResponsesResponse {
    /// Joins every `output_text` part of every message item, like the SDK's `output_text`.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ResponseOutputItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Vec<ResponseContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_text_skips_reasoning_items() {
        let body = r#"{
            "id": "resp_1",
            "status": "completed",
            "output": [
                {"type": "reasoning", "id": "rs_1", "summary": []},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "a photo of FOO, ", "annotations": []},
                    {"type": "output_text", "text": "smiling", "annotations": []}
                ]}
            ]
        }"#;
        let response: ResponsesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.id.as_deref(), Some("resp_1"));
        assert_eq!(response.output_text(), "a photo of FOO, smiling");
    }

    #[test]
    fn missing_output_is_empty_text() {
        let response: ResponsesResponse = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert!(response.output_text().is_empty());
        assert!(response.error.is_none());
    }
}
