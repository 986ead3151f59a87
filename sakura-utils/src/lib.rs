/// Chunked, paced processing of large member lists.
pub mod batch;
/// Confirm/decline button prompt for bulk operations.
pub mod confirmation;
/// Generic embed builders shared across commands.
pub mod embed;
/// Environment-variable parsing with defaults.
pub mod env;
/// Shared formatting helpers (nicknames, progress lines).
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Pure parser helpers.
pub mod parse;
/// Permission and role-hierarchy helpers.
pub mod permissions;
