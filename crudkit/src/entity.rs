/// Trait representing a database entity with a table name and a declared
/// column list.
///
/// The identifier column is always `id`, integer-typed and assigned by the
/// database on insert; it must not appear in `columns()`. The declared
/// columns act as the whitelist for every identifier that ends up in
/// generated SQL text: projection columns, sort columns, and the keys of
/// create/update data.
///
/// # Example
///
/// ```ignore
/// struct Contact;
///
/// impl Entity for Contact {
///     fn table_name() -> &'static str { "contact" }
///     fn columns() -> &'static [&'static str] { &["name", "email", "age"] }
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    fn table_name() -> &'static str;
    fn columns() -> &'static [&'static str];
}
