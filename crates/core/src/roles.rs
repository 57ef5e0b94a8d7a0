//! Well-known role names stored in the `users.role` column.

/// Regular submitter account.
pub const ROLE_USER: &str = "user";

/// Works the moderation queue and manages the breed vocabulary.
pub const ROLE_MODERATOR: &str = "moderator";

/// Full access, including everything a moderator can do.
pub const ROLE_ADMIN: &str = "admin";
