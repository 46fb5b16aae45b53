//! Resolve Module - turn placeholder paths into replacement text
//!
//! The replacer only needs [`Resolve`]. Closures work directly:
//!
//! ```
//! use docx_fill::Resolve;
//!
//! let upper = |path: &str| Some(path.to_uppercase());
//! assert_eq!(upper.resolve("name"), Some("NAME".to_string()));
//! ```

pub mod model;

pub use model::ModelResolver;

/// Lookup of a trimmed placeholder path
///
/// `None` means not found; the placeholder is then left in place.
pub trait Resolve {
    fn resolve(&self, path: &str) -> Option<String>;
}

impl<F> Resolve for F
where
    F: Fn(&str) -> Option<String>,
{
    #[inline]
    fn resolve(&self, path: &str) -> Option<String> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<R: Resolve + ?Sized>(resolver: &R, path: &str) -> Option<String> {
        resolver.resolve(path)
    }

    #[test]
    fn test_closure_resolver() {
        let map: HashMap<&str, &str> = [("a", "1")].into_iter().collect();
        let resolver = |path: &str| map.get(path).map(|v| v.to_string());
        assert_eq!(lookup(&resolver, "a"), Some("1".into()));
        assert_eq!(lookup(&resolver, "b"), None);
    }

    #[test]
    fn test_trait_object() {
        let never = |_: &str| -> Option<String> { None };
        let dynamic: &dyn Resolve = &never;
        assert_eq!(lookup(dynamic, "x"), None);
    }
}
