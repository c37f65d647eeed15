use shopping_guide_model::ErrorKind;

use crate::Error;
use crate::io::{Sse, SseError};
use crate::proto::ChatCompletionChunk;

/// Reads a streamed completion to the end and returns the concatenated
/// message content.
///
/// A stream that finishes without carrying any content is reported as a
/// malformed reply, so the caller never sees an empty question.
pub async fn collect_content(mut sse: Sse) -> Result<String, Error> {
    let mut id: Option<String> = None;
    let mut content: Option<String> = None;

    loop {
        let sse_event = match sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(SseError::ChunksError(err)) => {
                return Err(Error::new(err.0, ErrorKind::Transport));
            }
            Err(err) => {
                return Err(Error::new(
                    format!("{err:?}"),
                    ErrorKind::MalformedReply,
                ));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            break;
        }

        let chunk = serde_json::from_str::<ChatCompletionChunk>(&sse_event)
            .map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::MalformedReply)
            })?;
        if let Some(chunk_id) = chunk.id {
            if id.get_or_insert_with(|| chunk_id.clone()) != &chunk_id {
                return Err(Error::new(
                    "chunk id mismatch",
                    ErrorKind::MalformedReply,
                ));
            }
        }

        // Usage-only chunks carry no choices.
        let Some(choice) = chunk.choices.into_iter().next() else {
            continue;
        };
        if let Some(delta) = choice.delta.content {
            content.get_or_insert_default().push_str(&delta);
        }
        if choice.finish_reason.is_some() {
            break;
        }
    }

    content.ok_or_else(|| {
        Error::new("stream carried no content", ErrorKind::MalformedReply)
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use shopping_guide_model::ModelProviderError;

    use super::*;
    use crate::io::Chunks;

    fn sse_from(chunks: &[&'static str]) -> Sse {
        let chunks = chunks
            .iter()
            .copied()
            .map(|c| Bytes::from_static(c.as_bytes()))
            .collect();
        Sse::new(Chunks::from_vec_deque(chunks))
    }

    #[tokio::test]
    async fn test_collect_content() {
        let sse = sse_from(&[
            "data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"role\":\"assistant\"},\"finish_reason\":null}]}\n\n",
            "data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\"{\\\"query\\\":\"},\"finish_reason\":null}]}\n\n",
            "data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\"\\\"Budget?\\\"}\"},\"finish_reason\":null}]}\n\n",
            "data: {\"id\":\"c1\",\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        ]);
        let content = collect_content(sse).await.unwrap();
        assert_eq!(content, r#"{"query":"Budget?"}"#);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let sse = sse_from(&["data: [DONE]\n\n"]);
        let err = collect_content(sse).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedReply);
    }

    #[tokio::test]
    async fn test_id_mismatch() {
        let sse = sse_from(&[
            "data: {\"id\":\"a\",\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n",
            "data: {\"id\":\"b\",\"choices\":[{\"delta\":{\"content\":\"y\"}}]}\n\n",
        ]);
        let err = collect_content(sse).await.unwrap_err();
        assert_eq!(err.message(), "chunk id mismatch");
    }
}
