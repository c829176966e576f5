//! Demo records loaded with `--seed-demo`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use credence_common::views::{CertificateStatus, ImageRef};

use crate::models::DbCertificate;

const DEMO_COMPANY: &str = "Tech Instance";
const DEMO_DURATION: &str = "2-month";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn demo(id: &str, name: &str, program: &str, start: NaiveDate, end: NaiveDate) -> DbCertificate {
    let issued: DateTime<Utc> = end.and_time(NaiveTime::MIN).and_utc();

    DbCertificate {
        id: id.into(),
        intern_name: name.into(),
        internship_program: program.into(),
        company_name: DEMO_COMPANY.into(),
        duration: DEMO_DURATION.into(),
        start_date: start,
        end_date: end,
        issue_date: end,
        status: CertificateStatus::Active,
        score: None,
        assignments: None,
        exam: None,
        total_candidates: None,
        intern_image: ImageRef::Absent,
        custom_description: None,
        created_at: issued,
        updated_at: issued,
    }
}

pub fn demo_certificates() -> Vec<DbCertificate> {
    vec![
        demo(
            "TECH-XYZ1234",
            "Jane Doe",
            "Full Stack Development",
            date(2024, 1, 15),
            date(2024, 3, 15),
        ),
        demo(
            "TECH-ABC5678",
            "John Smith",
            "UI/UX Design",
            date(2023, 12, 20),
            date(2024, 2, 20),
        ),
        demo(
            "TECH-DEF9012",
            "Emily Johnson",
            "Data Science",
            date(2023, 11, 10),
            date(2024, 1, 10),
        ),
        demo(
            "TECH-EJXZFAD",
            "Alex Parker",
            "Web Development",
            date(2023, 12, 1),
            date(2024, 2, 1),
        ),
    ]
}
