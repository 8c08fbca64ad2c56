//! Job board entities. Declaration order is dependency order (parents before children).

use super::descriptor::{ColType, ColumnDef, EntityDef, Format, OnDelete, SLUG_PATTERN};
use super::enums::{ApplicationStatus, BlogStatus, ExperienceLevel, JobStatus, JobType, COMPANY_SIZES};

const fn slug() -> ColumnDef {
    ColumnDef::varchar("slug", 255).not_null().unique().pattern(SLUG_PATTERN)
}

pub static ROLES: EntityDef = EntityDef {
    table: "roles",
    path: "roles",
    label: "Role",
    plural: "Roles",
    fields: &[
        ColumnDef::varchar("name", 50).required().unique(),
        ColumnDef::text("description"),
    ],
    unique_together: &[],
    indexes: &[],
    sort_fields: &["created_at", "name"],
    default_sort: "name",
    search_columns: &["name"],
    slug_source: None,
};

pub static USERS: EntityDef = EntityDef {
    table: "users",
    path: "users",
    label: "User",
    plural: "Users",
    fields: &[
        ColumnDef::varchar("email", 255).required().unique().format(Format::Email),
        ColumnDef::varchar("password_hash", 255).sensitive(),
        ColumnDef::varchar("first_name", 100),
        ColumnDef::varchar("last_name", 100),
        ColumnDef::varchar("phone", 30),
        ColumnDef::varchar("avatar_url", 500).format(Format::Url),
        ColumnDef::flag("is_active", true),
        ColumnDef::flag("is_verified", false),
        ColumnDef::new("last_login_at", ColType::Timestamptz),
    ],
    unique_together: &[],
    indexes: &[],
    sort_fields: &["created_at", "email", "first_name", "last_name"],
    default_sort: "created_at",
    search_columns: &["email", "first_name", "last_name"],
    slug_source: None,
};

pub static USER_ROLES: EntityDef = EntityDef {
    table: "user_roles",
    path: "user-roles",
    label: "User role",
    plural: "User roles",
    fields: &[
        ColumnDef::foreign("user_id", "users", OnDelete::Cascade).required(),
        ColumnDef::foreign("role_id", "roles", OnDelete::Cascade).required(),
    ],
    unique_together: &[&["user_id", "role_id"]],
    indexes: &[&["role_id"]],
    sort_fields: &["created_at"],
    default_sort: "created_at",
    search_columns: &[],
    slug_source: None,
};

pub static CATEGORIES: EntityDef = EntityDef {
    table: "categories",
    path: "categories",
    label: "Category",
    plural: "Categories",
    fields: &[
        ColumnDef::varchar("name", 100).required(),
        slug(),
        ColumnDef::text("description"),
    ],
    unique_together: &[],
    indexes: &[],
    sort_fields: &["created_at", "name"],
    default_sort: "name",
    search_columns: &["name", "description"],
    slug_source: Some("name"),
};

pub static COMPANIES: EntityDef = EntityDef {
    table: "companies",
    path: "companies",
    label: "Company",
    plural: "Companies",
    fields: &[
        ColumnDef::varchar("name", 255).required(),
        slug(),
        ColumnDef::text("description"),
        ColumnDef::varchar("website", 500).format(Format::Url),
        ColumnDef::varchar("logo_url", 500).format(Format::Url),
        ColumnDef::varchar("industry", 100),
        ColumnDef::varchar("size", 20).allowed(COMPANY_SIZES),
        ColumnDef::varchar("location", 255),
        ColumnDef::new("founded_year", ColType::Int).minimum(1800.0).maximum(2100.0),
        ColumnDef::new("benefits", ColType::TextArray).not_null().default("'{}'"),
        ColumnDef::flag("is_verified", false),
    ],
    unique_together: &[],
    indexes: &[&["industry"]],
    sort_fields: &["created_at", "name", "founded_year"],
    default_sort: "created_at",
    search_columns: &["name", "description", "industry"],
    slug_source: Some("name"),
};

pub static SKILLS: EntityDef = EntityDef {
    table: "skills",
    path: "skills",
    label: "Skill",
    plural: "Skills",
    fields: &[
        ColumnDef::varchar("name", 100).required().unique(),
        slug(),
        ColumnDef::text("description"),
    ],
    unique_together: &[],
    indexes: &[],
    sort_fields: &["created_at", "name"],
    default_sort: "name",
    search_columns: &["name"],
    slug_source: Some("name"),
};

pub static JOB_TAGS: EntityDef = EntityDef {
    table: "job_tags",
    path: "job-tags",
    label: "Job tag",
    plural: "Job tags",
    fields: &[ColumnDef::varchar("name", 100).required().unique(), slug()],
    unique_together: &[],
    indexes: &[],
    sort_fields: &["created_at", "name"],
    default_sort: "name",
    search_columns: &["name"],
    slug_source: Some("name"),
};

pub static JOBS: EntityDef = EntityDef {
    table: "jobs",
    path: "jobs",
    label: "Job",
    plural: "Jobs",
    fields: &[
        ColumnDef::varchar("title", 255).required(),
        slug(),
        ColumnDef::text("description").required(),
        ColumnDef::text("requirements"),
        ColumnDef::text("responsibilities"),
        ColumnDef::text("benefits"),
        ColumnDef::new("salary_min", ColType::Numeric).minimum(0.0),
        ColumnDef::new("salary_max", ColType::Numeric).minimum(0.0),
        ColumnDef::varchar("salary_currency", 3).not_null().default("'USD'").min_length(3),
        ColumnDef::varchar("location", 255),
        ColumnDef::flag("is_remote", false),
        ColumnDef::varchar("job_type", 20).allowed(JobType::VALUES),
        ColumnDef::varchar("experience_level", 20).allowed(ExperienceLevel::VALUES),
        ColumnDef::varchar("status", 20)
            .not_null()
            .default("'Active'")
            .allowed(JobStatus::VALUES),
        ColumnDef::new("expires_at", ColType::Timestamptz),
        ColumnDef::new("views_count", ColType::Int).not_null().default("0").read_only(),
        ColumnDef::foreign("company_id", "companies", OnDelete::Cascade).required(),
        ColumnDef::foreign("category_id", "categories", OnDelete::SetNull),
        ColumnDef::foreign("posted_by", "users", OnDelete::SetNull),
    ],
    unique_together: &[],
    indexes: &[&["status", "created_at"], &["company_id"], &["category_id"]],
    sort_fields: &["created_at", "updated_at", "title", "salary_min", "salary_max", "views_count", "expires_at"],
    default_sort: "created_at",
    search_columns: &["title", "description"],
    slug_source: Some("title"),
};

pub static JOB_SKILLS: EntityDef = EntityDef {
    table: "job_skills",
    path: "job-skills",
    label: "Job skill",
    plural: "Job skills",
    fields: &[
        ColumnDef::foreign("job_id", "jobs", OnDelete::Cascade).required(),
        ColumnDef::foreign("skill_id", "skills", OnDelete::Cascade).required(),
    ],
    unique_together: &[&["job_id", "skill_id"]],
    indexes: &[&["skill_id"]],
    sort_fields: &["created_at"],
    default_sort: "created_at",
    search_columns: &[],
    slug_source: None,
};

pub static JOB_JOB_TAGS: EntityDef = EntityDef {
    table: "job_job_tags",
    path: "job-job-tags",
    label: "Job tag link",
    plural: "Job tag links",
    fields: &[
        ColumnDef::foreign("job_id", "jobs", OnDelete::Cascade).required(),
        ColumnDef::foreign("job_tag_id", "job_tags", OnDelete::Cascade).required(),
    ],
    unique_together: &[&["job_id", "job_tag_id"]],
    indexes: &[&["job_tag_id"]],
    sort_fields: &["created_at"],
    default_sort: "created_at",
    search_columns: &[],
    slug_source: None,
};

pub static JOB_APPLICATIONS: EntityDef = EntityDef {
    table: "job_applications",
    path: "job-applications",
    label: "Job application",
    plural: "Job applications",
    fields: &[
        ColumnDef::foreign("job_id", "jobs", OnDelete::Cascade).required(),
        ColumnDef::foreign("job_seeker_id", "users", OnDelete::Cascade).required(),
        ColumnDef::varchar("status", 20)
            .not_null()
            .default("'Pending'")
            .allowed(ApplicationStatus::VALUES),
        ColumnDef::text("cover_letter"),
        ColumnDef::varchar("resume_url", 500).format(Format::Url),
        ColumnDef::text("notes"),
    ],
    unique_together: &[&["job_id", "job_seeker_id"]],
    indexes: &[&["job_seeker_id"], &["status"]],
    sort_fields: &["created_at", "updated_at", "status"],
    default_sort: "created_at",
    search_columns: &["cover_letter", "notes"],
    slug_source: None,
};

pub static EMPLOYER_PROFILES: EntityDef = EntityDef {
    table: "employer_profiles",
    path: "employer-profiles",
    label: "Employer profile",
    plural: "Employer profiles",
    fields: &[
        ColumnDef::foreign("user_id", "users", OnDelete::Cascade).required().unique(),
        ColumnDef::foreign("company_id", "companies", OnDelete::SetNull),
        ColumnDef::varchar("position", 100),
        ColumnDef::varchar("phone", 30),
        ColumnDef::text("bio"),
    ],
    unique_together: &[],
    indexes: &[&["company_id"]],
    sort_fields: &["created_at"],
    default_sort: "created_at",
    search_columns: &["position", "bio"],
    slug_source: None,
};

pub static JOB_SEEKER_PROFILES: EntityDef = EntityDef {
    table: "job_seeker_profiles",
    path: "job-seeker-profiles",
    label: "Job seeker profile",
    plural: "Job seeker profiles",
    fields: &[
        ColumnDef::foreign("user_id", "users", OnDelete::Cascade).required().unique(),
        ColumnDef::varchar("headline", 255),
        ColumnDef::text("summary"),
        ColumnDef::varchar("resume_url", 500).format(Format::Url),
        ColumnDef::varchar("location", 255),
        ColumnDef::new("years_of_experience", ColType::Int).minimum(0.0).maximum(80.0),
        ColumnDef::new("desired_salary", ColType::Numeric).minimum(0.0),
        ColumnDef::flag("is_open_to_work", true),
        ColumnDef::varchar("portfolio_url", 500).format(Format::Url),
        ColumnDef::varchar("linkedin_url", 500).format(Format::Url),
    ],
    unique_together: &[],
    indexes: &[],
    sort_fields: &["created_at", "years_of_experience", "desired_salary"],
    default_sort: "created_at",
    search_columns: &["headline", "summary", "location"],
    slug_source: None,
};

pub static BLOG_POSTS: EntityDef = EntityDef {
    table: "blog_posts",
    path: "blog-posts",
    label: "Blog post",
    plural: "Blog posts",
    fields: &[
        ColumnDef::varchar("title", 255).required(),
        slug(),
        ColumnDef::varchar("excerpt", 500),
        ColumnDef::text("content").required(),
        ColumnDef::varchar("featured_image", 500).format(Format::Url),
        ColumnDef::flag("is_published", false),
        ColumnDef::new("published_at", ColType::Timestamptz),
        ColumnDef::varchar("status", 20)
            .not_null()
            .default("'Draft'")
            .allowed(BlogStatus::VALUES),
        ColumnDef::new("views_count", ColType::Int).not_null().default("0").read_only(),
        ColumnDef::foreign("author_id", "users", OnDelete::Cascade).required(),
        ColumnDef::foreign("category_id", "categories", OnDelete::SetNull),
    ],
    unique_together: &[],
    indexes: &[&["status", "published_at"], &["author_id"]],
    sort_fields: &["created_at", "published_at", "title", "views_count"],
    default_sort: "created_at",
    search_columns: &["title", "excerpt", "content"],
    slug_source: Some("title"),
};

pub static BLOG_COMMENTS: EntityDef = EntityDef {
    table: "blog_comments",
    path: "blog-comments",
    label: "Blog comment",
    plural: "Blog comments",
    fields: &[
        ColumnDef::foreign("blog_post_id", "blog_posts", OnDelete::Cascade).required(),
        ColumnDef::foreign("user_id", "users", OnDelete::SetNull),
        ColumnDef::foreign("parent_id", "blog_comments", OnDelete::Cascade),
        ColumnDef::varchar("author_name", 100),
        ColumnDef::text("content").required().min_length(1),
        ColumnDef::flag("is_approved", true),
    ],
    unique_together: &[],
    indexes: &[&["blog_post_id", "created_at"]],
    sort_fields: &["created_at"],
    default_sort: "created_at",
    search_columns: &["content"],
    slug_source: None,
};

pub static BLOG_VIEWS: EntityDef = EntityDef {
    table: "blog_views",
    path: "blog-views",
    label: "Blog view",
    plural: "Blog views",
    fields: &[
        ColumnDef::foreign("blog_post_id", "blog_posts", OnDelete::Cascade).required(),
        ColumnDef::foreign("user_id", "users", OnDelete::SetNull),
        ColumnDef::varchar("ip_address", 45),
        ColumnDef::varchar("user_agent", 500),
        ColumnDef::varchar("referrer", 500),
    ],
    unique_together: &[],
    indexes: &[&["blog_post_id", "created_at"], &["created_at"]],
    sort_fields: &["created_at"],
    default_sort: "created_at",
    search_columns: &[],
    slug_source: None,
};

pub static SAVED_BLOGS: EntityDef = EntityDef {
    table: "saved_blogs",
    path: "saved-blogs",
    label: "Saved blog",
    plural: "Saved blogs",
    fields: &[
        ColumnDef::foreign("user_id", "users", OnDelete::Cascade).required(),
        ColumnDef::foreign("blog_post_id", "blog_posts", OnDelete::Cascade).required(),
    ],
    unique_together: &[&["user_id", "blog_post_id"]],
    indexes: &[&["blog_post_id"]],
    sort_fields: &["created_at"],
    default_sort: "created_at",
    search_columns: &[],
    slug_source: None,
};

/// Every entity, parents first.
pub static ENTITIES: &[&EntityDef] = &[
    &ROLES,
    &USERS,
    &USER_ROLES,
    &CATEGORIES,
    &COMPANIES,
    &SKILLS,
    &JOB_TAGS,
    &JOBS,
    &JOB_SKILLS,
    &JOB_JOB_TAGS,
    &JOB_APPLICATIONS,
    &EMPLOYER_PROFILES,
    &JOB_SEEKER_PROFILES,
    &BLOG_POSTS,
    &BLOG_COMMENTS,
    &BLOG_VIEWS,
    &SAVED_BLOGS,
];
