//! Built-in grammars and demo lexicons, one module per locale.

pub(crate) mod en;
