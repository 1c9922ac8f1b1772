/// Business logic layer for blog-service
///
/// - Post service: listing, creation and owner-only mutation of posts
/// - Comment service: comments scoped to their parent post
/// - Group service: read access plus operator-side creation
/// - Auth service: credential exchange and account creation
pub mod auth;
pub mod comments;
pub mod groups;
pub mod posts;
pub mod resolver;

pub use auth::AuthService;
pub use comments::CommentService;
pub use groups::GroupService;
pub use posts::PostService;
pub use resolver::CommentResolver;
