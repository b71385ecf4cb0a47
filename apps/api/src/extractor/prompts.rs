pub const RESUME_EXTRACT_SYSTEM: &str = "You are a resume extraction engine. \
You read raw resume text and return a single JSON object with the structured \
fields it contains. Return ONLY valid JSON, no prose, no markdown fences. Use \
null for any field the resume does not mention; never invent data.";

/// `{resume_text}` is replaced with the extracted document text.
pub const RESUME_EXTRACT_PROMPT: &str = r#"Extract all structured information from the resume text below.

Rules:
- Look in every section: header, summary, experience, education, skills, projects, certifications, awards, languages.
- Preserve the original wording of names, titles, and dates.
- "skills" must include all technical skills, tools, frameworks, and methodologies mentioned.
- Dates as written in the resume (YYYY-MM or YYYY where possible).
- Use null for anything not present. Output nothing except the JSON object.

Output shape:

{
    "email": "Email address",
    "name": "Full name exactly as written",
    "phone": "Phone number or null",
    "location": "City, State/Province, Country or null",
    "linkedin": "Full LinkedIn URL or null",
    "github": "Full GitHub URL or null",
    "portfolio": "Portfolio/website URL or null",
    "summary": "Professional summary or null",
    "skills": ["skill1", "skill2"],
    "languages": [{"name": "English", "proficiency": "Native"}],
    "education": [
        {
            "institution": "Full institution name",
            "degree": "Exact degree name",
            "field": "Field of study",
            "location": "City, Country or null",
            "start_date": "as written or null",
            "graduation_date": "as written or null",
            "gpa": "GPA if mentioned",
            "honors": "honors if mentioned"
        }
    ],
    "experience": [
        {
            "company": "Full company name",
            "title": "Exact job title",
            "location": "City, Country or null",
            "start_date": "as written",
            "end_date": "as written or 'Present'",
            "employment_type": "Full-time, Contract, Internship if mentioned",
            "description": "Complete role description",
            "achievements": ["achievement with metrics", "..."],
            "technologies": ["tech used in this role"]
        }
    ],
    "projects": [
        {
            "name": "Project name",
            "description": "Project description",
            "url": "Project or repo URL if available",
            "start_date": "if mentioned",
            "end_date": "if mentioned",
            "technologies": ["tech1", "tech2"]
        }
    ],
    "certifications": [
        {
            "name": "Full certification name",
            "organization": "Issuing organization",
            "date": "Issue date",
            "expiry_date": "if applicable",
            "credential_id": "if mentioned"
        }
    ],
    "awards": [{"title": "Award name", "organization": "if mentioned", "date": "if mentioned"}]
}

Resume text:
{resume_text}"#;
