use super::*;

fn ident(f: &dyn Formatter, name: &str) -> String {
    let mut out = String::new();
    f.append_ident(&mut out, name);
    out
}

#[test]
fn test_pg_ident_quoting() {
    let pg = PgDialect::new();
    assert_eq!(ident(&pg, "users"), r#""users""#);
    assert_eq!(ident(&pg, "public.users"), r#""public"."users""#);
    assert_eq!(ident(&pg, r#"has"quote"#), r#""has""quote""#);
}

#[test]
fn test_mysql_ident_quoting() {
    let my = MySqlDialect::new();
    assert_eq!(ident(&my, "users"), "`users`");
    assert_eq!(ident(&my, "a`b"), "`a``b`");
    // Double quotes are ordinary characters inside backticks.
    assert_eq!(ident(&my, r#"a"b"#), r#"`a"b`"#);
}

#[test]
fn test_ident_quoting_is_injective() {
    let pg = PgDialect::new();
    let names = ["a.b", "a\".b", "a", "a\"", "\"a\"", "a..b", ".a", "ab"];
    let mut seen = std::collections::HashSet::new();
    for name in names {
        assert!(seen.insert(ident(&pg, name)), "collision for {name:?}");
    }
}

#[test]
fn test_string_literals() {
    let mut out = String::new();
    PgDialect::new().append_string(&mut out, "it's");
    assert_eq!(out, "'it''s'");

    let mut out = String::new();
    MySqlDialect::new().append_string(&mut out, r"c:\tmp 'x'");
    assert_eq!(out, r"'c:\\tmp ''x'''");
}

#[test]
fn test_bool_and_bytes_literals() {
    let mut out = String::new();
    PgDialect::new().append_bool(&mut out, true);
    SqliteDialect::new().append_bool(&mut out, false);
    assert_eq!(out, "TRUE0");

    let mut out = String::new();
    PgDialect::new().append_bytes(&mut out, &[0xde, 0xad]);
    assert_eq!(out, r"'\xdead'");

    let mut out = String::new();
    SqliteDialect::new().append_bytes(&mut out, &[0x01, 0xff]);
    assert_eq!(out, "X'01ff'");
}

#[test]
fn test_features() {
    assert!(MySqlDialect::new().has(Feature::AutoIncrement));
    assert!(!PgDialect::new().has(Feature::AutoIncrement));
    assert!(!SqliteDialect::new().has(Feature::AutoIncrement));

    let pg = PgDialect::new().with_features(Features::empty().with(Feature::AutoIncrement));
    assert!(pg.has(Feature::AutoIncrement));

    let my = MySqlDialect::new().with_features(MySqlDialect::new().features().without(Feature::AutoIncrement));
    assert!(!my.has(Feature::AutoIncrement));
}
