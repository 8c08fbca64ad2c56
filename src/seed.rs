//! Reference data inserted on startup. Rows that already exist (by unique name or slug) are skipped.

use crate::error::AppError;
use crate::model::{EntityDef, Record, CATEGORIES, JOB_TAGS, ROLES, SKILLS};
use crate::repository::Repository;
use crate::service::{CrudService, Mode};
use serde_json::json;
use sqlx::PgPool;

const ROLE_NAMES: &[(&str, &str)] = &[
    ("admin", "Full administrative access"),
    ("employer", "Posts jobs and reviews applications"),
    ("job_seeker", "Searches and applies for jobs"),
];

const CATEGORY_NAMES: &[&str] = &[
    "Software Development",
    "Design",
    "Marketing",
    "Sales",
    "Customer Support",
    "Data Science",
    "Product Management",
    "Finance",
    "Human Resources",
    "Operations",
];

const SKILL_NAMES: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "Go",
    "Rust",
    "React",
    "Node.js",
    "SQL",
    "PostgreSQL",
    "Docker",
    "Kubernetes",
    "AWS",
    "Figma",
    "Communication",
];

const TAG_NAMES: &[&str] = &["Remote", "Urgent", "Entry Level", "Visa Sponsorship", "Flexible Hours", "Equity"];

async fn seed_entity(
    pool: &PgPool,
    schema: &str,
    entity: &'static EntityDef,
    bodies: Vec<serde_json::Value>,
) -> Result<usize, AppError> {
    let mut items: Vec<Record> = Vec::with_capacity(bodies.len());
    for body in bodies {
        items.push(CrudService::prepare(entity, body, Mode::Create).await?);
    }
    let inserted = Repository::new(pool, schema, entity).bulk_create(&items, true).await?;
    Ok(inserted.len())
}

/// Seed roles, categories, skills and job tags. Safe to run on every start.
pub async fn seed_reference_data(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    let roles = ROLE_NAMES
        .iter()
        .map(|(name, description)| json!({ "name": name, "description": description }))
        .collect();
    let by_name = |names: &[&str]| names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>();

    let counts = [
        (ROLES.table, seed_entity(pool, schema, &ROLES, roles).await?),
        (CATEGORIES.table, seed_entity(pool, schema, &CATEGORIES, by_name(CATEGORY_NAMES)).await?),
        (SKILLS.table, seed_entity(pool, schema, &SKILLS, by_name(SKILL_NAMES)).await?),
        (JOB_TAGS.table, seed_entity(pool, schema, &JOB_TAGS, by_name(TAG_NAMES)).await?),
    ];
    for (table, inserted) in counts {
        tracing::info!(table, inserted, "reference data seeded");
    }
    Ok(())
}
