use super::*;

#[test]
fn test_truncate_sql_bytes_respects_char_boundary() {
    assert_eq!(truncate_sql_bytes("CREATE", 10), "CREATE");
    assert_eq!(truncate_sql_bytes("CREATE TABLE", 6), "CREATE");
    // 'é' is two bytes; cutting inside it backs off to the boundary.
    assert_eq!(truncate_sql_bytes("aé", 2), "a");
}

#[test]
fn test_query_result_error_truncation() {
    let long = "x".repeat(600);
    match QueryResult::error(long) {
        QueryResult::Error(msg) => {
            assert_eq!(msg.len(), 512 + 3);
            assert!(msg.ends_with("..."));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(QueryResult::Affected(0).to_string(), "0 affected");
}

#[test]
fn test_default_hook_continues() {
    struct Noop;
    impl QueryHook for Noop {}

    let event = QueryEvent {
        operation: "CREATE TABLE",
        dialect: "postgres",
        table: None,
        sql: "CREATE TABLE \"t\" ()".to_string(),
    };
    assert_eq!(Noop.before_query(&event), HookAction::Continue);
}

#[cfg(feature = "tracing")]
#[test]
fn test_tracing_hook_truncation() {
    let hook = TracingQueryHook::new().max_sql_length(6);
    assert_eq!(hook.truncate_sql("CREATE TABLE t"), "CREATE...");
    assert_eq!(hook.no_truncate().truncate_sql("CREATE TABLE t"), "CREATE TABLE t");
}
