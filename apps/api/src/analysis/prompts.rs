// Analysis Pipeline LLM prompt templates.
// Output-length hints are provider-enforced token caps.

pub const SUMMARY_PROMPT: &str = "\
Summarize this resume highlighting the skills, education, and experience:

{resume_text}";
pub const SUMMARY_MAX_TOKENS: u32 = 500;

pub const SKILL_GAPS_PROMPT: &str = "\
Analyze this resume and highlight missing skills, certifications, and experiences \
needed for better job opportunities:

{resume_text}";
pub const SKILL_GAPS_MAX_TOKENS: u32 = 400;

pub const ROADMAP_PROMPT: &str = "\
Based on this resume, suggest a future roadmap to improve career prospects \
(Skills to learn, certifications, industry exposure):

{resume_text}";
pub const ROADMAP_MAX_TOKENS: u32 = 400;

pub const JOB_KEYWORDS_PROMPT: &str = "\
You are a career advisor. Based on the resume summary below, generate a highly relevant, \
comma-separated list of specific job titles that match the candidate's skills, work experience, \
industry background, and education.

Resume Summary:
{summary}";
pub const JOB_KEYWORDS_MAX_TOKENS: u32 = 150;
