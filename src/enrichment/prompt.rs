// Prompt templates for profile enrichment and the site chat assistant.

use std::fmt::Write as _;

use super::client::{ChatTurn, GenerationRequest};
use super::courses::Program;
use crate::records::{Choice, Profile};

pub const ENRICHMENT_SYSTEM_PROMPT: &str = "\
You are a career coach at Skillax Digital Marketing Academy in Wayanad, Kerala. \
You write concise, encouraging, specific career material for aspiring digital marketers. \
Respond with a single JSON object only, no markdown fences and no commentary. \
Never invent employers, degrees or certifications the person did not mention.";

pub const ENRICHMENT_OUTPUT_SCHEMA: &str = r#"{
  "bio": "string, 3-4 sentences, third person",
  "linkedin_headline": "string, under 120 characters",
  "strengths": ["string", "..."],
  "skill_gaps": ["string", "..."],
  "career_roadmap": [
    {"phase": "Phase 1", "title": "string", "goals": ["3 to 5 concrete goals"]}
  ]
}"#;

pub const CHAT_SYSTEM_PROMPT: &str = "\
You are Skillax AI Assistant, a friendly chatbot for Skillax Digital Marketing Academy \
in Mananthavady, Wayanad, Kerala.

About the academy:
- Digital marketing training from foundation to advanced levels
- Industry certifications (Google, HubSpot, Government TSSR)
- Guaranteed internship at Infopark and placement assistance
- Contact: contact@skillax.in

Programs:
1. Professional Digital Marketing (4 months)
2. Advanced SEO & Performance (2 months)
3. Social Media & Ads Mastery (2 months)
4. Advanced AI-Powered Marketing (2 months, weekend batches)

Answer questions about programs, duration and curriculum, help visitors pick a program, \
and invite them to share their name and phone number for a callback. \
For fees, ask them to contact the academy for current pricing. Keep replies short.";

/// Builds the single enrichment request for a stored profile.
///
/// Pure function of the profile's input fields and the chosen program.
pub fn build_instruction(profile: &Profile, program: Program) -> GenerationRequest {
    let input = &profile.input;
    let mut text = String::new();

    let _ = writeln!(text, "Create career material for this person.");
    let _ = writeln!(text);
    let _ = writeln!(text, "BACKGROUND");
    let _ = writeln!(text, "Name: {}", input.full_name);
    let _ = writeln!(text, "Location: {}", input.location);
    let _ = writeln!(text, "Education: {}", input.education_level.as_str());
    if let Some(field) = &input.field_of_study {
        let _ = writeln!(text, "Field of study: {field}");
    }
    if let Some(institution) = &input.institution {
        let _ = writeln!(text, "Institution: {institution}");
    }
    if let Some(year) = &input.graduation_year {
        let _ = writeln!(text, "Graduation year: {year}");
    }
    let _ = writeln!(text, "Career stage: {}", input.career_stage.label());
    if let Some(role) = &input.current_role {
        let _ = writeln!(text, "Current role: {role}");
    }
    let _ = writeln!(text);
    let _ = writeln!(text, "GOALS");
    let _ = writeln!(text, "Target role: {}", input.target_role);
    let _ = writeln!(text, "Career goals: {}", input.career_goals);
    let _ = writeln!(text, "Why digital marketing: {}", input.why_digital_marketing);
    let _ = writeln!(text);
    let _ = writeln!(text, "INTERESTS: {}", join_or_none(&input.interests));
    let _ = writeln!(
        text,
        "CURRENT SKILLS: {}",
        join_or_none(&input.current_skills)
    );
    let _ = writeln!(
        text,
        "LEARNING: {} learner, available {}",
        input.preferred_learning_style.as_str(),
        input.availability.as_str()
    );
    let _ = writeln!(text);
    let _ = writeln!(
        text,
        "The academy recommends the {} program ({}). Align the roadmap with it.",
        program.title(),
        program.duration()
    );
    let _ = writeln!(
        text,
        "Strengths come from the stated skills and interests. Skill gaps are measured against the target role."
    );
    let _ = writeln!(text);
    let _ = writeln!(text, "Return exactly this JSON structure:");
    text.push_str(ENRICHMENT_OUTPUT_SCHEMA);

    GenerationRequest {
        system: ENRICHMENT_SYSTEM_PROMPT.to_string(),
        turns: vec![ChatTurn::user(text)],
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none stated".to_string()
    } else {
        items.join(", ")
    }
}
