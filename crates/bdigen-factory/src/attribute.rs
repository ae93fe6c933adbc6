use std::fmt;
use std::sync::Arc;

/// Attribute value that is either fixed up front or derived at build time.
///
/// Derived attributes are closures evaluated against a scope `S` describing
/// the record under construction. They run once per built record, so a
/// closure that advances an [`Adder`](crate::Adder) yields one step per row.
pub enum Attribute<T, S> {
    Fixed(T),
    Derived(Arc<dyn Fn(&S) -> T + Send + Sync>),
}

impl<T: Clone, S> Attribute<T, S> {
    pub fn fixed(value: T) -> Self {
        Attribute::Fixed(value)
    }

    pub fn derived(derive: impl Fn(&S) -> T + Send + Sync + 'static) -> Self {
        Attribute::Derived(Arc::new(derive))
    }

    pub fn resolve(&self, scope: &S) -> T {
        match self {
            Attribute::Fixed(value) => value.clone(),
            Attribute::Derived(derive) => derive(scope),
        }
    }
}

impl<T: Clone, S> Clone for Attribute<T, S> {
    fn clone(&self) -> Self {
        match self {
            Attribute::Fixed(value) => Attribute::Fixed(value.clone()),
            Attribute::Derived(derive) => Attribute::Derived(Arc::clone(derive)),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for Attribute<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Attribute::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl<S> From<&str> for Attribute<String, S> {
    fn from(value: &str) -> Self {
        Attribute::Fixed(value.to_string())
    }
}

impl<S> From<String> for Attribute<String, S> {
    fn from(value: String) -> Self {
        Attribute::Fixed(value)
    }
}
