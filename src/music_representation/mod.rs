pub mod chord_voicing;
pub mod note_resolver;

#[cfg(test)]
mod note_resolver_tests;
