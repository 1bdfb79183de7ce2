//! Executing CREATE TABLE through a client, with model and query hooks.

use ddlforge::schema::{Column, Model, TableSchema, sqltype};
use ddlforge::{
    AfterCreateTableHook, BeforeCreateTableHook, CreateTableQuery, Db, DbConfig, DdlError,
    DdlResult, GenericClient, HookAction, HookStage, MySqlDialect, PgDialect, QueryEvent,
    QueryHook, QueryResult,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Log = Arc<Mutex<Vec<String>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ddlforge=debug")
        .with_test_writer()
        .try_init();
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Records every statement it is asked to run.
struct RecordingClient {
    log: Log,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingClient {
    fn new(log: Log) -> Self {
        Self {
            log,
            fail: false,
            delay: None,
        }
    }
}

impl GenericClient for RecordingClient {
    async fn execute(&self, sql: &str) -> DdlResult<u64> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.lock().unwrap().push(format!("exec: {sql}"));
        if self.fail {
            return Err(DdlError::Other("relation already exists".into()));
        }
        Ok(0)
    }
}

fn users_schema() -> TableSchema {
    TableSchema::new("users")
        .column(Column::new("id", sqltype::BIGINT).auto_increment())
        .column(Column::new("email", sqltype::VARCHAR).not_null())
        .primary_key(["id"])
        .unique("", ["email"])
}

/// Model with both lifecycle hooks.
struct Users {
    schema: TableSchema,
    log: Log,
    fail_before: bool,
    fail_after: bool,
}

impl Users {
    fn new(log: Log) -> Self {
        Self {
            schema: users_schema(),
            log,
            fail_before: false,
            fail_after: false,
        }
    }
}

#[ddlforge::async_trait]
impl BeforeCreateTableHook for Users {
    async fn before_create_table(&self, query: &CreateTableQuery) -> DdlResult<()> {
        let table = query.table_schema().map(|t| t.name.clone()).unwrap_or_default();
        self.log.lock().unwrap().push(format!("before: {table}"));
        if self.fail_before {
            return Err(DdlError::hook(HookStage::BeforeCreateTable, "not allowed"));
        }
        Ok(())
    }
}

#[ddlforge::async_trait]
impl AfterCreateTableHook for Users {
    async fn after_create_table(&self, query: &CreateTableQuery) -> DdlResult<()> {
        self.log.lock().unwrap().push(format!("after: {}", query.operation()));
        if self.fail_after {
            return Err(DdlError::Other("seed failed".into()));
        }
        Ok(())
    }
}

impl Model for Users {
    fn table_schema(&self) -> &TableSchema {
        &self.schema
    }

    fn before_create_table_hook(&self) -> Option<&dyn BeforeCreateTableHook> {
        Some(self)
    }

    fn after_create_table_hook(&self) -> Option<&dyn AfterCreateTableHook> {
        Some(self)
    }
}

struct DenyAll;

impl QueryHook for DenyAll {
    fn before_query(&self, event: &QueryEvent) -> HookAction {
        HookAction::Abort(format!("{} is disabled", event.operation))
    }
}

/// Remembers every finished statement and whether it failed.
#[derive(Default)]
struct Audit {
    seen: Mutex<Vec<(String, bool)>>,
}

impl QueryHook for Audit {
    fn after_query(&self, event: &QueryEvent, _duration: Duration, result: &QueryResult) {
        self.seen
            .lock()
            .unwrap()
            .push((event.sql.clone(), result.is_error()));
    }
}

#[tokio::test]
async fn exec_runs_hooks_around_statement() {
    init_tracing();
    let log = Log::default();
    let client = RecordingClient::new(log.clone());

    Db::new(PgDialect::new())
        .new_create_table()
        .model(Users::new(log.clone()))
        .if_not_exists()
        .exec(&client)
        .await
        .unwrap();

    assert_eq!(
        entries(&log),
        [
            "before: users",
            r#"exec: CREATE TABLE IF NOT EXISTS "users" (id BIGINT, email VARCHAR NOT NULL, PRIMARY KEY (id), UNIQUE (email))"#,
            "after: CREATE TABLE",
        ]
    );
}

#[tokio::test]
async fn exec_mysql_renders_auto_increment() {
    let log = Log::default();
    let client = RecordingClient::new(log.clone());

    Db::new(MySqlDialect::new())
        .new_create_table()
        .model(users_schema())
        .varchar(255)
        .exec(&client)
        .await
        .unwrap();

    assert_eq!(
        entries(&log),
        ["exec: CREATE TABLE `users` (id BIGINT AUTO_INCREMENT, email varchar(255) NOT NULL, PRIMARY KEY (id), UNIQUE (email))"]
    );
}

#[tokio::test]
async fn before_hook_error_skips_execution() {
    let log = Log::default();
    let client = RecordingClient::new(log.clone());
    let mut model = Users::new(log.clone());
    model.fail_before = true;

    let err = Db::new(PgDialect::new())
        .new_create_table()
        .model(model)
        .exec(&client)
        .await
        .unwrap_err();

    assert_eq!(err.hook_stage(), Some(HookStage::BeforeCreateTable));
    assert_eq!(entries(&log), ["before: users"]);
}

#[tokio::test]
async fn after_hook_error_is_returned_after_execution() {
    let log = Log::default();
    let client = RecordingClient::new(log.clone());
    let mut model = Users::new(log.clone());
    model.fail_after = true;

    let err = Db::new(PgDialect::new())
        .new_create_table()
        .model(model)
        .exec(&client)
        .await
        .unwrap_err();

    assert!(matches!(err, DdlError::Other(ref m) if m == "seed failed"));
    let log = entries(&log);
    assert_eq!(log.len(), 3);
    assert!(log[1].starts_with("exec: CREATE TABLE"));
}

#[tokio::test]
async fn client_error_skips_after_hook() {
    let log = Log::default();
    let mut client = RecordingClient::new(log.clone());
    client.fail = true;

    let err = Db::new(PgDialect::new())
        .new_create_table()
        .model(Users::new(log.clone()))
        .exec(&client)
        .await
        .unwrap_err();

    assert!(matches!(err, DdlError::Other(_)));
    assert_eq!(entries(&log).len(), 2);
}

#[tokio::test]
async fn config_error_is_returned_before_execution() {
    let log = Log::default();
    let client = RecordingClient::new(log.clone());

    let err = Db::new(PgDialect::new())
        .new_create_table()
        .table("")
        .model(Users::new(log.clone()))
        .exec(&client)
        .await
        .unwrap_err();

    assert!(err.is_config());
    // The model was never attached, so no hook ran.
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn query_hook_abort_prevents_execution() {
    let log = Log::default();
    let client = RecordingClient::new(log.clone());

    let err = Db::new(PgDialect::new())
        .with_hook(DenyAll)
        .new_create_table()
        .model(users_schema())
        .exec(&client)
        .await
        .unwrap_err();

    assert_eq!(err.hook_stage(), Some(HookStage::BeforeQuery));
    assert!(err.to_string().contains("CREATE TABLE is disabled"));
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn query_hook_sees_results() {
    let audit = Arc::new(Audit::default());
    let log = Log::default();
    let mut failing = RecordingClient::new(log.clone());
    failing.fail = true;

    let db = Db::new(PgDialect::new()).with_hook_arc(audit.clone());
    db.new_create_table()
        .model(users_schema())
        .exec(&RecordingClient::new(log.clone()))
        .await
        .unwrap();
    let _ = db
        .new_create_table()
        .model(users_schema())
        .exec(&failing)
        .await;

    let seen = audit.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(!seen[0].1);
    assert!(seen[1].1);
    assert!(seen[0].0.starts_with(r#"CREATE TABLE "users""#));
}

#[tokio::test]
async fn slow_statement_times_out() {
    let log = Log::default();
    let mut client = RecordingClient::new(log.clone());
    client.delay = Some(Duration::from_secs(5));

    let db = Db::new(PgDialect::new())
        .with_config(DbConfig::new().with_query_timeout(Duration::from_millis(20)));
    let err = db
        .new_create_table()
        .model(users_schema())
        .exec(&client)
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(entries(&log).is_empty());
}

#[cfg(feature = "tracing")]
#[tokio::test]
async fn tracing_hook_does_not_change_outcome() {
    init_tracing();
    let log = Log::default();
    let client = RecordingClient::new(log.clone());

    let affected = Db::new(PgDialect::new())
        .with_hook(ddlforge::TracingQueryHook::new())
        .new_create_table()
        .model(users_schema())
        .exec(&client)
        .await
        .unwrap();

    assert_eq!(affected, 0);
    assert_eq!(entries(&log).len(), 1);
}

#[tokio::test]
async fn buffers_are_returned_to_the_pool() {
    let db = Db::new(PgDialect::new());
    let q = db.new_create_table().model(users_schema());

    q.to_sql().unwrap();
    assert_eq!(db.buffers().idle_count(), 1);

    // Error paths release too.
    let _ = db.new_create_table().to_sql().unwrap_err();
    assert_eq!(db.buffers().idle_count(), 1);
}
