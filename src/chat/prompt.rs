use crate::index::ProfessorMatch;
use crate::llm::{ChatMessage, Role};

/// Fixed instructional text prepended to every completion request.
pub const SYSTEM_PROMPT: &str = "\
You are a rate my professor agent to help students find classes, that takes in user questions and answers them.
For every user question, the top professors that match the user question are returned.
Use them to answer the question if needed.";

/// Render retrieved matches into the fixed text blocks appended to the
/// user's question, in ranked order, separated by blank lines. Zero
/// matches render as the empty string.
pub fn render_matches(matches: &[ProfessorMatch]) -> String {
    let mut out = String::new();
    for m in matches {
        out.push_str(&format!(
            "\n\nReturned Results:\nProfessor: {}\nReview: {}\nSubject: {}\nStars: {}",
            m.id, m.metadata.review, m.metadata.subject, m.metadata.stars
        ));
    }
    out
}

/// Build the outbound message sequence: system prompt, prior turns, then
/// the active question with the rendered matches appended.
pub fn assemble(prior: &[ChatMessage], question: &str, rendered: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(ChatMessage::new(Role::System, SYSTEM_PROMPT));
    messages.extend_from_slice(prior);
    messages.push(ChatMessage::new(
        Role::User,
        format!("{}{}", question, rendered),
    ));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MatchMetadata;

    fn smith() -> ProfessorMatch {
        ProfessorMatch {
            id: "Dr. Smith".to_string(),
            score: 0.9,
            metadata: MatchMetadata {
                review: "Great!".to_string(),
                subject: "CS101".to_string(),
                stars: 5.0,
            },
        }
    }

    /// Parse one rendered block back into its fields.
    fn parse_block(block: &str) -> (String, String, String, f64) {
        let mut id = None;
        let mut review = None;
        let mut subject = None;
        let mut stars = None;
        for line in block.lines() {
            if let Some(v) = line.strip_prefix("Professor: ") {
                id = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("Review: ") {
                review = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("Subject: ") {
                subject = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("Stars: ") {
                stars = v.parse().ok();
            }
        }
        (
            id.unwrap(),
            review.unwrap(),
            subject.unwrap(),
            stars.unwrap(),
        )
    }

    #[test]
    fn final_user_content_contains_question_and_match_fields() {
        let rendered = render_matches(&[smith()]);
        let messages = assemble(&[], "What is CS101 like?", &rendered);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_PROMPT);

        let user = &messages[1];
        assert_eq!(user.role, Role::User);
        assert!(user.content.contains("What is CS101 like?"));
        assert!(user.content.contains("Dr. Smith"));
        assert!(user.content.contains("Great!"));
        assert!(user.content.contains("CS101"));
        assert!(user.content.contains("5"));
    }

    #[test]
    fn prior_turns_are_preserved_in_order() {
        let prior = vec![
            ChatMessage::new(Role::User, "hello"),
            ChatMessage::new(Role::Assistant, "hi there"),
        ];
        let messages = assemble(&prior, "next question", "");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "hello");
        assert_eq!(messages[2].content, "hi there");
        assert_eq!(messages[3].content, "next question");
    }

    #[test]
    fn zero_matches_leave_question_unaugmented() {
        let rendered = render_matches(&[]);
        assert!(rendered.is_empty());

        let messages = assemble(&[], "any good math classes?", &rendered);
        assert_eq!(messages[1].content, "any good math classes?");
    }

    #[test]
    fn blocks_are_separated_by_blank_lines_in_ranked_order() {
        let mut second = smith();
        second.id = "Dr. Jones".to_string();
        second.score = 0.5;

        let rendered = render_matches(&[smith(), second]);
        let first_pos = rendered.find("Dr. Smith").unwrap();
        let second_pos = rendered.find("Dr. Jones").unwrap();
        assert!(first_pos < second_pos);
        assert_eq!(rendered.matches("\n\nReturned Results:").count(), 2);
    }

    #[test]
    fn rendered_block_round_trips_losslessly() {
        let mut m = smith();
        m.metadata.stars = 4.5;
        let rendered = render_matches(&[m.clone()]);

        let (id, review, subject, stars) = parse_block(&rendered);
        assert_eq!(id, m.id);
        assert_eq!(review, m.metadata.review);
        assert_eq!(subject, m.metadata.subject);
        assert_eq!(stars, m.metadata.stars);
    }

    #[test]
    fn whole_star_ratings_round_trip_without_decimal_noise() {
        let rendered = render_matches(&[smith()]);
        assert!(rendered.contains("Stars: 5"));
        let (_, _, _, stars) = parse_block(&rendered);
        assert_eq!(stars, 5.0);
    }
}
