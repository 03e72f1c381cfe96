/// Builds a [`ConnectionString`](crate::ConnectionString) from literal pairs.
///
/// Expands to a `Result<ConnectionString>`, since keys may turn out empty
/// after formatting. Later pairs override earlier ones.
///
/// ```rust
/// use serde_constring::connection_string;
///
/// let cs = connection_string! {
///     "Provider" => "SQLOLEDB",
///     "Password" => "a;b",
/// }
/// .unwrap();
/// assert_eq!(cs.to_string(), "Provider=SQLOLEDB;Password=\"a;b\";");
/// ```
#[macro_export]
macro_rules! connection_string {
    () => {
        $crate::Result::Ok($crate::ConnectionString::new())
    };

    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::ConnectionString::from_pairs([
            $(($key, ::std::string::String::from($value))),+
        ])
    };
}
