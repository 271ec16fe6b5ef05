//! Record Transformer: one WordPress listing in, one `JobRecord` out.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::jobs::extract::{display_value, extract_joined_values, format_salary, NOT_SPECIFIED};
use crate::jobs::text::{decode_entities, strip_tags};
use crate::models::job::JobRecord;
use crate::wordpress_client::UpstreamRecord;

pub const MAX_DESCRIPTION_CHARS: usize = 800;
const TRUNCATION_MARKER: &str = "...";
const NO_TITLE: &str = "No title";

/// WordPress meta keys carrying the listing's custom fields.
pub mod meta_keys {
    pub const EMPLOYER_NAME: &str = "_company_name";
    pub const EMPLOYER_LOGO: &str = "_company_logo";
    pub const EMPLOYER_URL: &str = "_company_website";
    pub const LOCATION: &str = "_job_location";
    pub const JOB_TYPE: &str = "_job_type";
    pub const CATEGORY: &str = "_job_category";
    pub const QUALIFICATION: &str = "_job_qualification";
    pub const EXPERIENCE: &str = "_job_experience";
    pub const SALARY_MIN: &str = "_job_salary_min";
    pub const SALARY_MAX: &str = "_job_salary_max";
}

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("listing is not a JSON object")]
    NotAnObject,

    #[error("listing {id:?} has a `meta` field that is not an object")]
    InvalidMeta { id: Option<i64> },
}

/// Maps an upstream listing onto the reduced schema.
///
/// Missing or oddly typed fields fall back to their defaults; only a record whose
/// overall shape is unusable is rejected, and then nothing partial is produced.
pub fn clean_job_data(record: &UpstreamRecord) -> Result<JobRecord, TransformError> {
    let obj = record.0.as_object().ok_or(TransformError::NotAnObject)?;

    let id = obj.get("id").and_then(Value::as_i64);

    let empty = Map::new();
    let meta = match obj.get("meta") {
        None | Some(Value::Null) => &empty,
        // WordPress sends `[]` for a post with no registered meta.
        Some(Value::Array(items)) if items.is_empty() => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => return Err(TransformError::InvalidMeta { id }),
    };

    let title = rendered(obj, "title")
        .map(decode_entities)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = truncate_description(&strip_tags(rendered(obj, "content").unwrap_or("")));

    let link = string_field(obj, "link");

    let salary_min = meta_string(meta, meta_keys::SALARY_MIN);
    let salary_max = meta_string(meta, meta_keys::SALARY_MAX);

    Ok(JobRecord {
        id,
        slug: string_field(obj, "slug"),
        title,
        link: link.clone(),
        employer: meta_or_default(meta, meta_keys::EMPLOYER_NAME),
        employer_logo: meta_string(meta, meta_keys::EMPLOYER_LOGO),
        employer_url: meta_string(meta, meta_keys::EMPLOYER_URL),
        location: extract_joined_values(meta.get(meta_keys::LOCATION)),
        job_type: extract_joined_values(meta.get(meta_keys::JOB_TYPE)),
        category: extract_joined_values(meta.get(meta_keys::CATEGORY)),
        qualification: meta_or_default(meta, meta_keys::QUALIFICATION),
        experience: meta_or_default(meta, meta_keys::EXPERIENCE),
        salary: format_salary(salary_min.as_deref(), salary_max.as_deref()),
        description,
        posted_date: obj
            .get("date")
            .and_then(Value::as_str)
            .and_then(format_posted_date),
        full_description_url: link,
    })
}

/// Cuts plain text to `MAX_DESCRIPTION_CHARS` characters, marking the cut.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Formats a WordPress post date the way the en-IN locale prints a short date.
pub fn format_posted_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(format!("{}/{}/{}", date.day(), date.month(), date.year()))
}

/// `obj[field].rendered` as a string slice.
fn rendered<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    obj.get(field)
        .and_then(|v| v.get("rendered"))
        .and_then(Value::as_str)
}

fn string_field(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Scalar meta value as text; numbers are rendered in decimal.
fn meta_string(meta: &Map<String, Value>, key: &str) -> Option<String> {
    meta.get(key).and_then(display_value)
}

fn meta_or_default(meta: &Map<String, Value>, key: &str) -> String {
    meta_string(meta, key).unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_listing() -> UpstreamRecord {
        UpstreamRecord(json!({
            "id": 812,
            "slug": "senior-rust-engineer",
            "title": { "rendered": "Senior Rust Engineer &#8211; Platform" },
            "link": "https://jobs.example.com/job/senior-rust-engineer/",
            "date": "2024-03-05T10:20:30",
            "content": { "rendered": "<p>Build <strong>fast</strong> services &amp; tools.</p>" },
            "meta": {
                "_company_name": "Acme Labs",
                "_company_logo": "https://cdn.example.com/acme.png",
                "_company_website": "https://acme.example.com",
                "_job_location": { "12": "Mumbai", "15": "Pune" },
                "_job_type": { "3": "Full Time" },
                "_job_category": { "7": "Engineering" },
                "_job_qualification": "B.Tech",
                "_job_experience": "3-5 years",
                "_job_salary_min": "50000",
                "_job_salary_max": "80000"
            }
        }))
    }

    #[test]
    fn test_full_listing_maps_every_field() {
        let job = clean_job_data(&full_listing()).unwrap();
        assert_eq!(job.id, Some(812));
        assert_eq!(job.slug.as_deref(), Some("senior-rust-engineer"));
        assert_eq!(job.title, "Senior Rust Engineer \u{2013} Platform");
        assert_eq!(job.employer, "Acme Labs");
        assert_eq!(job.employer_logo.as_deref(), Some("https://cdn.example.com/acme.png"));
        assert_eq!(job.employer_url.as_deref(), Some("https://acme.example.com"));
        assert_eq!(job.location, "Mumbai, Pune");
        assert_eq!(job.job_type, "Full Time");
        assert_eq!(job.category, "Engineering");
        assert_eq!(job.qualification, "B.Tech");
        assert_eq!(job.experience, "3-5 years");
        assert_eq!(job.salary, "50000 - 80000");
        assert_eq!(job.description, "Build fast services & tools.");
        assert_eq!(job.posted_date.as_deref(), Some("5/3/2024"));
        assert_eq!(job.link, job.full_description_url);
    }

    #[test]
    fn test_bare_object_gets_defaults() {
        let job = clean_job_data(&UpstreamRecord(json!({}))).unwrap();
        assert_eq!(job.id, None);
        assert_eq!(job.slug, None);
        assert_eq!(job.title, "No title");
        assert_eq!(job.link, None);
        assert_eq!(job.employer, NOT_SPECIFIED);
        assert_eq!(job.employer_logo, None);
        assert_eq!(job.employer_url, None);
        assert_eq!(job.location, NOT_SPECIFIED);
        assert_eq!(job.job_type, NOT_SPECIFIED);
        assert_eq!(job.category, NOT_SPECIFIED);
        assert_eq!(job.qualification, NOT_SPECIFIED);
        assert_eq!(job.experience, NOT_SPECIFIED);
        assert_eq!(job.salary, NOT_SPECIFIED);
        assert_eq!(job.description, "");
        assert_eq!(job.posted_date, None);
        assert_eq!(job.full_description_url, None);
    }

    #[test]
    fn test_serialized_record_has_no_missing_keys() {
        let job = clean_job_data(&UpstreamRecord(json!({ "id": 1 }))).unwrap();
        let value = serde_json::to_value(&job).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 16);
        assert_eq!(obj["employerLogo"], Value::Null);
        assert_eq!(obj["jobType"], NOT_SPECIFIED);
        assert!(obj.contains_key("fullDescriptionUrl"));
    }

    #[test]
    fn test_empty_title_defaults() {
        let job = clean_job_data(&UpstreamRecord(json!({ "title": { "rendered": "" } }))).unwrap();
        assert_eq!(job.title, "No title");
    }

    #[test]
    fn test_wrong_typed_fields_fall_back() {
        let record = UpstreamRecord(json!({
            "id": "abc",
            "title": "plain string title",
            "content": { "rendered": 42 },
            "date": "not a date",
            "meta": { "_job_location": "Mumbai", "_company_name": ["Acme"] }
        }));
        let job = clean_job_data(&record).unwrap();
        assert_eq!(job.id, None);
        assert_eq!(job.title, "No title");
        assert_eq!(job.description, "");
        assert_eq!(job.posted_date, None);
        assert_eq!(job.location, NOT_SPECIFIED);
        assert_eq!(job.employer, NOT_SPECIFIED);
    }

    #[test]
    fn test_empty_meta_array_is_accepted() {
        let job = clean_job_data(&UpstreamRecord(json!({ "id": 3, "meta": [] }))).unwrap();
        assert_eq!(job.employer, NOT_SPECIFIED);
    }

    #[test]
    fn test_numeric_salary_meta() {
        let record = UpstreamRecord(json!({ "meta": { "_job_salary_min": 45000 } }));
        assert_eq!(clean_job_data(&record).unwrap().salary, "45000");
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        assert_eq!(
            clean_job_data(&UpstreamRecord(json!("nope"))),
            Err(TransformError::NotAnObject)
        );
        assert_eq!(
            clean_job_data(&UpstreamRecord(Value::Null)),
            Err(TransformError::NotAnObject)
        );
    }

    #[test]
    fn test_scalar_meta_is_rejected() {
        let record = UpstreamRecord(json!({ "id": 9, "meta": "broken" }));
        assert_eq!(
            clean_job_data(&record),
            Err(TransformError::InvalidMeta { id: Some(9) })
        );
    }

    #[test]
    fn test_long_description_is_cut_with_marker() {
        let body = "a".repeat(900);
        let out = truncate_description(&body);
        assert_eq!(out.chars().count(), 803);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..800], &body[..800]);
    }

    #[test]
    fn test_short_description_is_untouched() {
        let body = "b".repeat(700);
        assert_eq!(truncate_description(&body), body);
        let exact = "c".repeat(800);
        assert_eq!(truncate_description(&exact), exact);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let body = "\u{20B9}".repeat(801);
        let out = truncate_description(&body);
        assert_eq!(out.chars().count(), 803);
        assert!(out.starts_with(&"\u{20B9}".repeat(800)));
    }

    #[test]
    fn test_description_truncated_after_stripping() {
        let html = format!("<div><p>{}</p></div>", "x".repeat(900));
        let record = UpstreamRecord(json!({ "content": { "rendered": html } }));
        let job = clean_job_data(&record).unwrap();
        assert_eq!(job.description, format!("{}...", "x".repeat(800)));
    }

    #[test]
    fn test_posted_date_formats() {
        assert_eq!(format_posted_date("2024-11-25T08:00:00").as_deref(), Some("25/11/2024"));
        assert_eq!(
            format_posted_date("2024-01-09T23:10:00+05:30").as_deref(),
            Some("9/1/2024")
        );
        assert_eq!(format_posted_date("2024-07-01").as_deref(), Some("1/7/2024"));
        assert_eq!(format_posted_date(""), None);
    }
}
