//! Prompt builders: short system message + labelled user block.

use report_core::Report;
use tracing::warn;

pub const EXPLAIN_SYSTEM: &str = "당신은 중고차 성능점검 전문가입니다. \
자동차를 잘 모르는 사람도 이해할 수 있도록 쉬운 한국어로 2~3문장 안에 설명하세요. \
용어의 뜻과 중고차 구매 시 왜 중요한지만 말하세요.";

pub const ASK_SYSTEM: &str = "당신은 중고차 구매를 돕는 상담사입니다. \
주어진 분석 리포트만 근거로 한국어로 간결하게 답하세요. \
리포트에 없는 내용은 추측하지 말고 리포트에서 확인할 수 없다고 답하세요.";

pub fn explain_prompt(term: &str) -> String {
    format!("다음 자동차 점검 용어를 설명해 주세요: {}", term.trim())
}

/// Embeds the report as JSON, cut to `max_chars` characters.
pub fn ask_prompt(report: &Report, question: &str, max_chars: usize) -> String {
    let json = serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        warn!(error = %e, "report could not be serialised; prompt carries no context");
        String::new()
    });
    let (context, truncated) = safe_truncate(&json, max_chars);

    let mut out = String::with_capacity(context.len() + question.len() + 64);
    out.push_str("[분석 리포트]\n");
    out.push_str(context);
    if truncated {
        out.push_str("\n…");
    }
    out.push_str("\n\n[질문]\n");
    out.push_str(question.trim());
    out
}

/// Cuts `s` to at most `max` chars on a char boundary.
fn safe_truncate(s: &str, max: usize) -> (&str, bool) {
    match s.char_indices().nth(max) {
        Some((end, _)) => (&s[..end], true),
        None => (s, false),
    }
}
