//! Best-effort extraction of enrichment fields from generated text.
//!
//! The model is asked for JSON but does not always comply. A JSON object is
//! tried first (code fences and surrounding chatter tolerated), then plain
//! text with labelled sections. Whatever cannot be found stays `None`.

use serde_json::{Map, Value};

use super::EnrichmentFailed;
use crate::records::{EnrichmentFields, RoadmapPhase};

const BIO_KEYS: &[&str] = &["bio", "ai_bio", "professional_bio"];
const HEADLINE_KEYS: &[&str] = &["linkedin_headline", "headline", "ai_linkedin_headline"];
const STRENGTH_KEYS: &[&str] = &["strengths", "ai_strengths"];
const GAP_KEYS: &[&str] = &["skill_gaps", "skillGaps", "gaps", "ai_skill_gaps"];
const ROADMAP_KEYS: &[&str] = &["career_roadmap", "roadmap", "ai_career_roadmap"];

/// Extracts the model-generated fields. The course recommendation is never
/// read from the response.
pub fn parse_enrichment(text: &str) -> Result<EnrichmentFields, EnrichmentFailed> {
    if let Some(fields) = parse_json(text).filter(|fields| fields.populated() > 0) {
        return Ok(fields);
    }
    let fields = parse_sections(text);
    if fields.populated() == 0 {
        return Err(EnrichmentFailed::Parse(
            "no recognizable fields in generated text".into(),
        ));
    }
    Ok(fields)
}

fn parse_json(text: &str) -> Option<EnrichmentFields> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    let Value::Object(object) = serde_json::from_str::<Value>(&text[start..=end]).ok()? else {
        return None;
    };
    Some(EnrichmentFields {
        ai_bio: lookup(&object, BIO_KEYS).and_then(as_text),
        ai_linkedin_headline: lookup(&object, HEADLINE_KEYS).and_then(as_text),
        ai_strengths: lookup(&object, STRENGTH_KEYS).and_then(as_list),
        ai_skill_gaps: lookup(&object, GAP_KEYS).and_then(as_list),
        ai_course_recommendation: None,
        ai_career_roadmap: lookup(&object, ROADMAP_KEYS).and_then(as_roadmap),
    })
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn as_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn as_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = value.as_array()?.iter().filter_map(as_text).collect();
    (!items.is_empty()).then_some(items)
}

fn as_roadmap(value: &Value) -> Option<Vec<RoadmapPhase>> {
    let phases: Vec<RoadmapPhase> = value
        .as_array()?
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let entry = entry.as_object()?;
            let goals = entry.get("goals").and_then(as_list)?;
            let phase = match entry.get("phase") {
                Some(Value::Number(n)) => format!("Phase {n}"),
                Some(other) => as_text(other).unwrap_or_else(|| format!("Phase {}", index + 1)),
                None => format!("Phase {}", index + 1),
            };
            let title = entry
                .get("title")
                .and_then(as_text)
                .unwrap_or_else(|| phase.clone());
            Some(RoadmapPhase { phase, title, goals })
        })
        .collect();
    (!phases.is_empty()).then_some(phases)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Bio,
    Headline,
    Strengths,
    SkillGaps,
    Roadmap,
}

fn section_for(label: &str) -> Option<Section> {
    match label {
        "bio" | "professional bio" | "short bio" => Some(Section::Bio),
        "headline" | "linkedin headline" => Some(Section::Headline),
        "strengths" | "key strengths" => Some(Section::Strengths),
        "skill gaps" | "skills gaps" | "gaps" | "areas to develop" => Some(Section::SkillGaps),
        "roadmap" | "career roadmap" => Some(Section::Roadmap),
        _ => None,
    }
}

/// `Phase 2: Build` or `Phase 2 - Build` becomes `("Phase 2", "Build")`.
fn phase_heading(line: &str) -> Option<(String, String)> {
    let lower = line.to_ascii_lowercase();
    let rest = lower.strip_prefix("phase")?.trim_start();
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    // Same byte offsets in `line` since ASCII lowercasing preserves length.
    let after_digits = line.len() - rest.len() + digits.len();
    let title = line[after_digits..]
        .trim_start_matches([':', '-', '.', ')', ' '])
        .trim()
        .to_string();
    let label = format!("Phase {digits}");
    let title = if title.is_empty() { label.clone() } else { title };
    Some((label, title))
}

fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim_start_matches(['-', '*', '•']).trim_start();
    if trimmed.len() != line.len() {
        return trimmed;
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}

fn split_inline(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_sections(text: &str) -> EnrichmentFields {
    let mut section = Section::None;
    let mut bio: Vec<String> = Vec::new();
    let mut headline: Vec<String> = Vec::new();
    let mut strengths: Vec<String> = Vec::new();
    let mut gaps: Vec<String> = Vec::new();
    let mut roadmap: Vec<RoadmapPhase> = Vec::new();

    for raw in text.lines() {
        let cleaned = raw.replace("**", "");
        let line = cleaned.trim().trim_start_matches('#').trim();
        if line.is_empty() {
            continue;
        }
        if let Some((phase, title)) = phase_heading(line) {
            roadmap.push(RoadmapPhase {
                phase,
                title,
                goals: Vec::new(),
            });
            section = Section::Roadmap;
            continue;
        }
        if let Some(next) = section_for(&line.to_ascii_lowercase()) {
            section = next;
            continue;
        }
        if let Some((label, rest)) = line.split_once(':') {
            if let Some(next) = section_for(&label.trim().to_ascii_lowercase()) {
                section = next;
                let rest = rest.trim();
                if !rest.is_empty() {
                    match section {
                        Section::Bio => bio.push(rest.to_string()),
                        Section::Headline => headline.push(rest.to_string()),
                        Section::Strengths => strengths.extend(split_inline(rest)),
                        Section::SkillGaps => gaps.extend(split_inline(rest)),
                        Section::Roadmap | Section::None => {}
                    }
                }
                continue;
            }
        }
        let item = strip_bullet(line).to_string();
        if item.is_empty() {
            continue;
        }
        match section {
            Section::Bio => bio.push(item),
            Section::Headline => headline.push(item),
            Section::Strengths => strengths.push(item),
            Section::SkillGaps => gaps.push(item),
            Section::Roadmap => {
                if let Some(phase) = roadmap.last_mut() {
                    phase.goals.push(item);
                }
            }
            Section::None => {}
        }
    }

    roadmap.retain(|phase| !phase.goals.is_empty());
    let joined = |lines: Vec<String>| (!lines.is_empty()).then(|| lines.join(" "));
    let listed = |items: Vec<String>| (!items.is_empty()).then_some(items);
    EnrichmentFields {
        ai_bio: joined(bio),
        ai_linkedin_headline: joined(headline),
        ai_strengths: listed(strengths),
        ai_skill_gaps: listed(gaps),
        ai_course_recommendation: None,
        ai_career_roadmap: (!roadmap.is_empty()).then_some(roadmap),
    }
}
