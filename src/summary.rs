//! Boundary to an external text-generation service that writes a prose
//! portrait of one participant. No provider ships with this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::stats::Message;

/// Shown when the provider fails for any reason other than a safety block.
pub const GENERIC_FAILURE: &str = "AI 요약 생성에 실패했습니다.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub persona_name: String,
    /// The persona's message texts joined by newlines.
    pub message_bundle: String,
}

impl SummaryRequest {
    /// `None` when `sender` has no messages.
    pub fn for_sender(messages: &[Message], sender: &str) -> Option<Self> {
        let texts: Vec<&str> = messages
            .iter()
            .filter(|m| m.sender == sender)
            .map(|m| m.text.as_str())
            .collect();
        if texts.is_empty() {
            return None;
        }
        Some(Self {
            persona_name: sender.to_string(),
            message_bundle: texts.join("\n"),
        })
    }

    /// Instruction text sent to the provider.
    pub fn prompt(&self) -> String {
        let name = &self.persona_name;
        format!(
            "당신은 카카오톡 대화 내용을 분석하는 전문가입니다.\n\
             아래는 '{name}'님의 메시지 모음입니다.\n\n\
             [대화 내용]\n{bundle}\n[대화 내용 끝]\n\n\
             '{name}'님의 특징을 친구에게 설명하듯 친근한 말투로 요약해주세요.\n\
             1. 성격 및 말투\n\
             2. 대화 스타일 (질문이 많은지, 대화를 주도하는지)\n\
             3. 감정 표현 (애정, 고마움, 미안함 등)\n\
             4. 주요 관심사\n\n\
             마크다운 형식을 사용하지 말고 순수한 텍스트로만 작성해주세요.",
            bundle = self.message_bundle,
        )
    }
}

#[derive(Error, Debug)]
pub enum SummaryError {
    /// The provider refused the content on safety grounds.
    #[error("content blocked by provider: {reason}")]
    Blocked { reason: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("authentication error: {0}")]
    Auth(String),
}

pub trait Summarizer {
    fn summarize(&self, request: &SummaryRequest) -> Result<String, SummaryError>;
}

/// Runs `summarizer`, turning failures into user-facing text.
///
/// A safety block becomes an apology naming the persona and the reason; any
/// other failure becomes [`GENERIC_FAILURE`]. Provider errors are logged, never
/// returned.
pub fn summarize_with_fallback(summarizer: &dyn Summarizer, request: &SummaryRequest) -> String {
    match summarizer.summarize(request) {
        Ok(summary) => summary,
        Err(SummaryError::Blocked { reason }) => {
            warn!(action = "summarize", component = "summary", persona = %request.persona_name, reason = %reason, "Summary blocked by provider");
            format!(
                "'{}'님의 대화 내용 분석 중 문제가 발생했습니다. (사유: {})",
                request.persona_name, reason
            )
        }
        Err(e) => {
            warn!(action = "summarize", component = "summary", error = %e, "Summary generation failed");
            GENERIC_FAILURE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(fn() -> Result<String, SummaryError>);

    impl Summarizer for Canned {
        fn summarize(&self, _request: &SummaryRequest) -> Result<String, SummaryError> {
            (self.0)()
        }
    }

    fn request() -> SummaryRequest {
        SummaryRequest {
            persona_name: "민지".to_string(),
            message_bundle: "안녕\n밥 먹었어?".to_string(),
        }
    }

    #[test]
    fn bundles_one_senders_texts() {
        let messages = vec![
            Message::new("t", "민지", "안녕"),
            Message::new("t", "준호", "응"),
            Message::new("t", "민지", "밥 먹었어?"),
        ];
        assert_eq!(SummaryRequest::for_sender(&messages, "민지"), Some(request()));
        assert!(SummaryRequest::for_sender(&messages, "nobody").is_none());
    }

    #[test]
    fn prompt_names_persona_and_forbids_markup() {
        let prompt = request().prompt();
        assert!(prompt.contains("'민지'님"));
        assert!(prompt.contains("안녕\n밥 먹었어?"));
        assert!(prompt.contains("마크다운"));
    }

    #[test]
    fn passes_summary_through() {
        let ok = Canned(|| Ok("다정한 사람".to_string()));
        assert_eq!(summarize_with_fallback(&ok, &request()), "다정한 사람");
    }

    #[test]
    fn blocked_becomes_apology() {
        let blocked = Canned(|| {
            Err(SummaryError::Blocked {
                reason: "SAFETY".to_string(),
            })
        });
        assert_eq!(
            summarize_with_fallback(&blocked, &request()),
            "'민지'님의 대화 내용 분석 중 문제가 발생했습니다. (사유: SAFETY)"
        );
    }

    #[test]
    fn transport_and_auth_become_generic() {
        let down = Canned(|| Err(SummaryError::Transport("503 from upstream".to_string())));
        let denied = Canned(|| Err(SummaryError::Auth("bad key sk-123".to_string())));
        assert_eq!(summarize_with_fallback(&down, &request()), GENERIC_FAILURE);
        assert_eq!(summarize_with_fallback(&denied, &request()), GENERIC_FAILURE);
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let json = serde_json::to_string(&request()).unwrap();
        assert_eq!(json, r#"{"personaName":"민지","messageBundle":"안녕\n밥 먹었어?"}"#);
    }
}
