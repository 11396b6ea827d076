use crate::error::AgentError;
use crate::providers::traits::CompletionProvider;
use crate::store::ScoredChunk;

/// Verbatim phrase the model is instructed to reply with when the context
/// does not contain the answer.
pub const FALLBACK_ANSWER: &str = "answer is not available in the context";

/// The generated reply. `grounded` is false exactly when the model (or the
/// empty-retrieval short circuit) fell back to `FALLBACK_ANSWER`.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub grounded: bool,
}

impl Answer {
    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_ANSWER.to_string(),
            grounded: false,
        }
    }
}

/// Assembles the grounded prompt: retrieved chunks in rank order as context,
/// then the question, under instructions that forbid fabrication.
pub fn build_prompt(retrieved: &[ScoredChunk], question: &str) -> String {
    let context = retrieved
        .iter()
        .map(|hit| hit.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Answer the question as detailed as possible from the provided context, \
         make sure to provide all the details. If the answer is not in the provided \
         context, just say \"{FALLBACK_ANSWER}\"; do not provide the wrong answer.\n\n\
         Context:\n{context}\n\n\
         Question:\n{question}\n\n\
         Answer:\n"
    )
}

/// True when the model's raw output is the fallback phrase, allowing for
/// trivial decoration (whitespace, quotes, a trailing period, casing).
pub fn is_fallback(text: &str) -> bool {
    let normalized = text
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c.is_whitespace())
        .to_lowercase();

    normalized == FALLBACK_ANSWER || normalized.starts_with(FALLBACK_ANSWER)
}

/// Generates an answer from the retrieved context.
///
/// An empty retrieval never reaches the model: it short-circuits straight to
/// the fallback answer. A failed or empty generation surfaces as
/// `Generation`; there is no automatic retry.
pub async fn synthesize(
    retrieved: &[ScoredChunk],
    question: &str,
    provider: &dyn CompletionProvider,
) -> Result<Answer, AgentError> {
    if retrieved.is_empty() {
        return Ok(Answer::fallback());
    }

    let prompt = build_prompt(retrieved, question);
    let raw = provider
        .complete(&prompt)
        .await
        .map_err(|e| AgentError::Generation(e.to_string()))?;

    let text = raw.trim();
    if text.is_empty() {
        return Err(AgentError::Generation(
            "model returned an empty response".to_string(),
        ));
    }

    if is_fallback(text) {
        Ok(Answer::fallback())
    } else {
        Ok(Answer {
            text: text.to_string(),
            grounded: true,
        })
    }
}
