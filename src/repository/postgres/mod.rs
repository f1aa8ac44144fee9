//! PostgreSQL stores

mod application;
mod category;
mod event;
mod faq;
mod token;

pub use application::PgApplicationStore;
pub use category::PgCategoryStore;
pub use event::PgEventRegistry;
pub use faq::PgFaqStore;
pub use token::PgAccessTokenStore;

/// `ILIKE` pattern for a substring search. `%`, `_` and `\` in the input match literally.
pub(crate) fn contains_pattern(search: Option<&str>) -> Option<String> {
    search.map(|s| {
        let mut pattern = String::with_capacity(s.len() + 2);
        pattern.push('%');
        for c in s.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    })
}
