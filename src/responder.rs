//! Canned chatbot replies keyed by detected emotion.

pub const JOY_REPLY: &str = "I'm so glad to hear that! 😊 You sound happy. Want to tell me more?";
pub const ANGER_REPLY: &str = "I understand your frustration 😠. Let's talk it through together.";
pub const SADNESS_REPLY: &str =
    "I'm here for you 😔. It sounds like you're feeling down. Want to share?";
pub const FEAR_REPLY: &str =
    "I hear that you're feeling worried 😟. Let's figure out a solution together.";
pub const FALLBACK_REPLY: &str = "Thanks for sharing! I'm here to help however I can.";

/// Reply for an emotion label. Labels outside joy/anger/sadness/fear get the
/// generic reply. Matching is exact.
pub fn select_response(emotion_label: &str) -> &'static str {
    match emotion_label {
        "joy" => JOY_REPLY,
        "anger" => ANGER_REPLY,
        "sadness" => SADNESS_REPLY,
        "fear" => FEAR_REPLY,
        _ => FALLBACK_REPLY,
    }
}
