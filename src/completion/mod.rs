/// Completion pipeline modules.
///
/// This sub-module groups the per-request completion flow:
/// - **locator**: Finding the word at the cursor and the enclosing
///   top-level form
/// - **context**: Building the masked form sent as request context
/// - **mapper**: Turning raw runtime candidates into completion items and
///   lazily resolving documentation
pub mod context;
pub mod locator;
pub mod mapper;
