//! Fabricated streaming chat-completion responses.
//!
//! A simulated response is a random number of chunks, each framed as an SSE
//! `data:` line, followed by the `[DONE]` sentinel. The identifiers, usage
//! numbers and finish reason are fixed fixtures; only the chunk count, the
//! content text and the content-safety flags are random.
//!
//! Every chunk carries `finish_reason: "length"`, not just the last one.
//! Existing test clients rely on this, so it is kept even though a real
//! stream only sets a finish reason on its final chunk.

use crate::chat_completion::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionStreamChoice,
    ChatCompletionStreamChoiceDelta, ContentFilterResults, FilterVerdict, PromptAnnotation,
    PromptFilterResult, Usage,
};
use crate::error::Error;
use crate::fake_data::Car;
use log::*;
use rand::Rng;
use std::io::Write;
use std::ops::RangeInclusive;

/// Inclusive bounds on the number of chunks in one simulated response.
pub const CHUNK_COUNT_RANGE: RangeInclusive<usize> = 1..=50;

pub const CHUNK_ID: &str = "example-id";
pub const CHUNK_OBJECT: &str = "example-object";
pub const SYSTEM_FINGERPRINT: &str = "example-fingerprint";
pub const FINISH_REASON: &str = "length";

pub const USAGE: Usage = Usage {
    prompt_tokens: 10,
    completion_tokens: 20,
    total_tokens: 30,
};

/// Payload of the final frame.
pub const DONE: &str = "[DONE]";

/// Draw the number of chunks for one response.
pub fn chunk_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.gen_range(CHUNK_COUNT_RANGE)
}

/// Build chunk `index` of a response to `model`, stamped with `created` (Unix seconds).
pub fn build_chunk<R: Rng + ?Sized>(
    rng: &mut R,
    model: &str,
    index: usize,
    created: i64,
) -> ChatCompletionChunk {
    let car = Car::fake(rng);

    ChatCompletionChunk {
        id: CHUNK_ID.to_string(),
        object: CHUNK_OBJECT.to_string(),
        created,
        model: model.to_string(),
        choices: vec![ChatCompletionStreamChoice {
            index,
            delta: ChatCompletionStreamChoiceDelta {
                role: String::new(),
                content: format!("This is message {index}: content: {car}"),
            },
            finish_reason: FINISH_REASON.to_string(),
        }],
        system_fingerprint: SYSTEM_FINGERPRINT.to_string(),
        prompt_annotations: vec![PromptAnnotation {
            prompt_index: 0,
            content_filter_results: fake_filter_results(rng),
        }],
        prompt_filter_results: vec![PromptFilterResult {
            index: 0,
            content_filter_results: fake_filter_results(rng),
        }],
        usage: USAGE,
    }
}

fn fake_filter_results<R: Rng + ?Sized>(rng: &mut R) -> ContentFilterResults {
    let mut verdict = || FilterVerdict {
        filtered: rng.gen(),
        severity: String::new(),
    };

    ContentFilterResults {
        hate: verdict(),
        self_harm: verdict(),
        sexual: verdict(),
        violence: verdict(),
    }
}

/// Write a complete simulated response for `request` to `writer` and return
/// the number of chunks written.
///
/// Frames are written back to back with no flushing in between. If encoding
/// or writing any chunk fails the error is returned at once and the `[DONE]`
/// frame is never written.
pub fn write_stream<R, W>(
    rng: &mut R,
    request: &ChatCompletionRequest,
    writer: &mut W,
) -> Result<usize, Error>
where
    R: Rng + ?Sized,
    W: Write + ?Sized,
{
    let count = chunk_count(rng);
    debug!(
        "Simulating {count} chunk(s) for model {} ({} message(s))",
        request.model,
        request.messages.len()
    );

    for index in 0..count {
        let created = chrono::Utc::now().timestamp();
        let chunk = build_chunk(rng, &request.model, index, created);

        writer.write_all(b"data: ")?;
        serde_json::to_writer(&mut *writer, &chunk)?;
        writer.write_all(b"\n\n")?;
    }

    write!(writer, "data: {DONE}\n\n")?;

    Ok(count)
}

/// Render a complete simulated response for `request` into memory, ready to
/// be sent and flushed in one go.
pub fn render(request: &ChatCompletionRequest) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    write_stream(&mut rand::thread_rng(), request, &mut body)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat_completion::ChatCompletionMessage;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io;

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "test-model".to_string(),
            messages: vec![ChatCompletionMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
        }
    }

    /// Split a response body into the payloads of its `data:` frames.
    fn frames(body: &str) -> Vec<&str> {
        body.split_terminator("\n\n")
            .map(|frame| frame.strip_prefix("data: ").expect("frame without data prefix"))
            .collect()
    }

    #[test]
    fn test_chunk_count_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..5_000 {
            let count = chunk_count(&mut rng);
            assert!(CHUNK_COUNT_RANGE.contains(&count), "count {count}");
            seen_min |= count == 1;
            seen_max |= count == 50;
        }
        assert!(seen_min && seen_max, "both bounds should be reachable");
    }

    #[test]
    fn test_stream_indices_are_contiguous_and_done_is_last() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut body = Vec::new();

            let count = write_stream(&mut rng, &request(), &mut body).unwrap();
            let body = String::from_utf8(body).unwrap();
            let frames = frames(&body);

            assert_eq!(frames.len(), count + 1);
            assert_eq!(frames.last(), Some(&DONE));
            assert!(body.ends_with("data: [DONE]\n\n"));

            for (expected_index, frame) in frames[..count].iter().enumerate() {
                let chunk: ChatCompletionChunk = serde_json::from_str(frame).unwrap();
                assert_eq!(chunk.choices.len(), 1);
                assert_eq!(chunk.choices[0].index, expected_index);
            }
        }
    }

    #[test]
    fn test_fixed_fields_on_every_chunk() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut body = Vec::new();
        let count = write_stream(&mut rng, &request(), &mut body).unwrap();
        let body = String::from_utf8(body).unwrap();

        for frame in &frames(&body)[..count] {
            let chunk: serde_json::Value = serde_json::from_str(frame).unwrap();
            assert_eq!(chunk["id"], "example-id");
            assert_eq!(chunk["object"], "example-object");
            assert_eq!(chunk["model"], "test-model");
            assert_eq!(chunk["system_fingerprint"], "example-fingerprint");
            assert_eq!(chunk["choices"][0]["finish_reason"], "length");
            assert_eq!(
                chunk["usage"],
                serde_json::json!({"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30})
            );
            for block in [
                &chunk["prompt_annotations"][0],
                &chunk["prompt_filter_results"][0],
            ] {
                let results = &block["content_filter_results"];
                for category in ["hate", "self_harm", "sexual", "violence"] {
                    assert!(results[category]["filtered"].is_boolean());
                    assert!(results[category].get("severity").is_none());
                }
            }
        }
    }

    #[test]
    fn test_chunk_content_names_its_index() {
        let mut rng = StdRng::seed_from_u64(3);
        let chunk = build_chunk(&mut rng, "m", 7, 1_700_000_000);

        assert_eq!(chunk.created, 1_700_000_000);
        assert!(chunk.choices[0]
            .delta
            .content
            .starts_with("This is message 7: content: ["));
        assert!(chunk.choices[0].delta.role.is_empty());
    }

    /// Accepts `budget` bytes, then fails every write.
    struct FailingWriter {
        written: Vec<u8>,
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.budget {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_aborts_without_done() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut writer = FailingWriter {
            written: Vec::new(),
            budget: 64,
        };

        let err = write_stream(&mut rng, &request(), &mut writer).unwrap_err();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Io)
                | DomainErrorKind::Internal(InternalErrorKind::Serialization)
        ));
        let written = String::from_utf8_lossy(&writer.written);
        assert!(!written.contains("[DONE]"));
    }
}
