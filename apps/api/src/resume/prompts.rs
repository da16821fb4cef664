// Prompt text for resume suggestions.

/// System prompt for the suggestion call.
pub const RESUME_CONSULTANT_SYSTEM: &str = "You are a professional resume consultant. \
    Provide specific, actionable advice to help job seekers improve their resumes.";

/// Suggestion prompt template. Replace `{resume_text}` and `{jd_text}` before sending.
pub const SUGGEST_PROMPT_TEMPLATE: &str = r#"Given the resume:
{resume_text}

and the job description:
{jd_text}

Provide specific, actionable suggestions to improve the resume to better match this job. Focus on:
1. Keywords to add or emphasize
2. Skills to highlight
3. Experience to restructure or emphasize
4. Sections to add or improve

Provide the response in a structured format with clear recommendations."#;

/// Fills the template. The job description is substituted first so that a
/// resume containing the literal `{jd_text}` is left untouched.
pub fn build_suggest_prompt(resume_text: &str, jd_text: &str) -> String {
    SUGGEST_PROMPT_TEMPLATE
        .replace("{jd_text}", jd_text)
        .replacen("{resume_text}", resume_text, 1)
}
