use serde::{Deserialize, Serialize};
use shopping_guide_model::{ModelMessage, ModelRequest};

use crate::OpenAIConfig;

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub message: Option<ReplyMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Takes the text content of the first choice.
    #[inline]
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request<'a>(
    req: &'a ModelRequest,
    config: &'a OpenAIConfig,
) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model: &config.model,
        messages: req.messages.iter().map(create_message).collect(),
        temperature: req.temperature,
        response_format: config.json_mode.then_some(ResponseFormat {
            r#type: "json_object",
        }),
        stream: config.streaming,
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message<'_> {
    Message {
        role: msg.role(),
        content: msg.content(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            messages: vec![
                ModelMessage::System("You are a shopping assistant.".to_owned()),
                ModelMessage::User("Hello".to_owned()),
                ModelMessage::Assistant("What budget?".to_owned()),
            ],
            temperature: Some(0.5),
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_model("custom")
            .with_json_mode(true)
            .build();
        let body =
            serde_json::to_value(create_request(&request, &config)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "custom",
                "messages": [
                    { "role": "system", "content": "You are a shopping assistant." },
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "What budget?" }
                ],
                "temperature": 0.5,
                "response_format": { "type": "json_object" },
                "stream": false
            })
        );
    }

    #[test]
    fn test_omit_optional_fields() {
        let request = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
            temperature: None,
        };
        let config = OpenAIConfigBuilder::with_api_key("xxx")
            .with_streaming(true)
            .build();
        let body =
            serde_json::to_value(create_request(&request, &config)).unwrap();
        assert_eq!(body.get("temperature"), None);
        assert_eq!(body.get("response_format"), None);
        assert_eq!(body["stream"], json!(true));
    }

    #[test]
    fn test_completion_content() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Hi" } }
            ]
        }))
        .unwrap();
        assert_eq!(completion.into_content().as_deref(), Some("Hi"));

        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": null } }
            ]
        }))
        .unwrap();
        assert_eq!(completion.into_content(), None);

        let completion: ChatCompletion =
            serde_json::from_value(json!({ "error": "boom" })).unwrap();
        assert_eq!(completion.into_content(), None);
    }
}
