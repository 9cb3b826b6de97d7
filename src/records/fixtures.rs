use chrono::Utc;

use super::model::{
    Availability, CareerStage, EducationLevel, EnrichmentFields, EnrichmentStatus,
    LearningStyle, Profile, ProfileInput,
};

pub fn sample_profile_input(email: &str) -> ProfileInput {
    ProfileInput {
        full_name: "Asha Kumar".into(),
        email: email.into(),
        phone: "9999999999".into(),
        location: "Kochi".into(),
        linkedin_url: None,
        portfolio_url: None,
        education_level: EducationLevel::Bachelors,
        field_of_study: Some("Commerce".into()),
        institution: None,
        graduation_year: None,
        career_stage: CareerStage::Fresher,
        current_role: None,
        target_role: "SEO Specialist".into(),
        career_goals: "Grow into an SEO lead role".into(),
        current_skills: vec!["SEO".into(), "Canva".into()],
        interests: vec!["Search Engine Optimization".into()],
        preferred_learning_style: LearningStyle::SelfPaced,
        why_digital_marketing: "Love data-driven storytelling".into(),
        availability: Availability::FullTime,
    }
}

pub fn sample_profile() -> Profile {
    let now = Utc::now();
    Profile {
        id: "6f1c7d0e-0000-4000-8000-000000000001".into(),
        profile_code: "SKXTEST0001".into(),
        input: sample_profile_input("asha@x.com"),
        enrichment: EnrichmentFields::default(),
        enrichment_status: EnrichmentStatus::Pending,
        enrichment_error: None,
        profile_views: 0,
        is_public: true,
        created_at: now,
        updated_at: now,
    }
}
