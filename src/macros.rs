#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Declare a [`BindingRule`](crate::BindingRule) in code.
///
/// ```text
/// binding_rule! {
///     name: "det <- noun",
///     locale: "en",
///     source: r"^D",
///     destination: r"^N",
///     flags: "Ds",
///     reverse: true,
///     attrs: { "skipWord" => "no" },
/// }
/// ```
#[macro_export]
macro_rules! binding_rule {
    (
        name: $name:expr,
        locale: $locale:expr,
        source: $src:literal,
        destination: $dst:literal,
        flags: $flags:expr
        $(, reverse: $reverse:expr)?
        $(, attrs: { $($key:expr => $value:expr),* $(,)? })?
        $(,)?
    ) => {{
        #[allow(unused_mut)]
        let mut attributes: std::collections::HashMap<String, String> = std::collections::HashMap::new();
        $($(attributes.insert($key.to_string(), $value.to_string());)*)?
        $crate::BindingRule {
            name: $name.to_string(),
            locale: $locale.to_string(),
            source: $crate::regex!($src).clone(),
            destination: $crate::regex!($dst).clone(),
            flags: $flags.to_string(),
            reverse: false $(|| $reverse)?,
            attributes,
        }
    }};
}
