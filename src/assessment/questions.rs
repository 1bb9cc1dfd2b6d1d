//! Reference questionnaire tables.
//!
//! Answers are addressed by position in these slices, so items must never be
//! reordered once clients depend on them.

use super::types::Domain::{
    RelationshipManagement as RM, SelfAwareness as SA, SelfManagement as SM, SocialAwareness as SO,
};
use super::types::{Domain, Question};
use crate::error::{Result, WellnessError};

pub const TEIQUE_SF: &str = "TEIQue-SF";

const fn q(id: u32, text: &'static str, domain: Domain, reverse: bool) -> Question {
    Question {
        id,
        text,
        domain,
        reverse,
    }
}

pub static TEIQUE_SF_QUESTIONS: [Question; 20] = [
    q(1, "I can usually put words to what I am feeling during a shift.", SA, false),
    q(2, "When a shift goes badly, it takes me a long time to settle down.", SM, true),
    q(3, "I notice quickly when a patient or family member is anxious.", SO, false),
    q(4, "I find it hard to repair things after a disagreement with a colleague.", RM, true),
    q(5, "I am often unsure why I react the way I do at work.", SA, true),
    q(6, "I can stay calm when several patients need me at once.", SM, false),
    q(7, "I pick up on tension in the team before anyone mentions it.", SO, false),
    q(8, "Colleagues come to me when they need support.", RM, false),
    q(9, "I know which situations on the ward drain me the most.", SA, false),
    q(10, "I tend to act on impulse when I am under pressure.", SM, true),
    q(11, "I struggle to see things from a difficult patient's point of view.", SO, true),
    q(12, "I can deliver hard news to families with care and clarity.", RM, false),
    q(13, "My emotions often catch me by surprise.", SA, true),
    q(14, "I can set aside frustration to focus on the task in front of me.", SM, false),
    q(15, "I can tell how a colleague is doing without them saying so.", SO, false),
    q(16, "I avoid difficult conversations with other staff.", RM, true),
    q(17, "I understand how my mood affects the people I work with.", SA, false),
    q(18, "Small setbacks can ruin the rest of my shift.", SM, true),
    q(19, "I find it difficult to read the mood of a room.", SO, true),
    q(20, "I am good at helping a tense handover go smoothly.", RM, false),
];

/// Resolve a tool name (case-insensitive) to its question table.
pub fn questions_for_tool(tool: &str) -> Result<&'static [Question]> {
    if tool.trim().eq_ignore_ascii_case(TEIQUE_SF) {
        Ok(&TEIQUE_SF_QUESTIONS)
    } else {
        Err(WellnessError::UnknownTool {
            tool: tool.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_domain_has_five_items() {
        for domain in Domain::ALL {
            let count = TEIQUE_SF_QUESTIONS
                .iter()
                .filter(|q| q.domain == domain)
                .count();
            assert_eq!(count, 5, "{domain}");
        }
    }

    #[test]
    fn test_tool_lookup_is_case_insensitive() {
        assert_eq!(questions_for_tool("teique-sf").unwrap().len(), 20);
        assert_eq!(questions_for_tool(" TEIQue-SF ").unwrap().len(), 20);
        assert!(matches!(
            questions_for_tool("mbti"),
            Err(WellnessError::UnknownTool { .. })
        ));
    }
}
