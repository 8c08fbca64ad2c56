pub mod blog;
pub mod blog_view;
pub mod crud;
pub mod job;
pub mod validation;

pub use blog::BlogService;
pub use blog_view::BlogViewService;
pub use crud::{slugify, CrudService, ListQuery, Mode};
pub use job::JobService;
pub use validation::RequestValidator;
