// Prompt templates for the three analysis modes.
// Placeholders in braces are replaced before sending.

/// Replace: {honesty}, {goal}
pub const SCORE_SYSTEM_TEMPLATE: &str = "You are a career intelligence AI. \
    Analyze the resume and return a comprehensive career score breakdown. \
    {honesty} Consider the candidate's goal: {goal}.";

/// Replace: {resume_text}
pub const SCORE_PROMPT_TEMPLATE: &str = "Resume:
{resume_text}

Analyze this resume comprehensively.";

/// Replace: {honesty}
pub const DREAM_ROLE_SYSTEM_TEMPLATE: &str = "You are a career intelligence AI. \
    Analyze the candidate's resume against their dream role and return structured data. \
    {honesty}";

/// Replace: {resume_text}, {target_role}, {target_company}
pub const DREAM_ROLE_PROMPT_TEMPLATE: &str = "Resume:
{resume_text}

Target Role: {target_role}
Company: {target_company}

Analyze how ready this candidate is for the target role.";

pub const RECRUITER_SYSTEM: &str = "You are a recruiter AI. \
    Score candidates against the job description. Be fair and objective.";

/// Replace: {jd_text}, {resume_text}
pub const RECRUITER_PROMPT_TEMPLATE: &str = "Job Description:
{jd_text}

Candidate Resume:
{resume_text}

Score this candidate against the JD.";

/// Goal used when the caller sends none.
pub const DEFAULT_GOAL: &str = "general";

/// Company used when a dream-role request names none.
pub const ANY_COMPANY: &str = "Any";
