#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! rule {
    (
        name: $name:expr
        $(, buckets: $buckets:expr)?
        , apply: $apply:expr
        $(,)?
    ) => {{
        $crate::Rule {
            name: $name,
            buckets: $crate::LineTraits::empty() $(.union($buckets))?,
            apply: $apply,
        }
    }};
}
