//! In-memory backend for tests and local runs
//!
//! Implements all three backend traits over plain maps and records every
//! call, so tests can assert both on the data and on what was sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    AuthEvent, AuthProvider, AuthSession, AuthUser, ClientError, ClientResult, DataStore,
    ObjectStorage, Query,
};

const AUTH_EVENT_CAPACITY: usize = 64;
const DEFAULT_TOKEN_LIFETIME: i64 = 3600;

/// Which backend operation a [`Call`] was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Select,
    Insert,
    Update,
    Delete,
    Upsert,
    Rpc,
    Upload,
    Remove,
    SignIn,
    GetUser,
    Refresh,
    SignOut,
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: CallKind,
    /// Table, procedure, bucket or email
    pub target: String,
    pub payload: Option<Value>,
}

type RpcHandler = Arc<dyn Fn(&Value) -> ClientResult<Value> + Send + Sync>;

struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

struct Account {
    password: String,
    user: AuthUser,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<(String, String), StoredObject>,
    accounts: HashMap<String, Account>,
    /// access or refresh token -> user id
    tokens: HashMap<String, Uuid>,
    rpc: HashMap<String, RpcHandler>,
    calls: Vec<Call>,
    fail_next: Option<String>,
    /// Lifetime reported for issued access tokens, in seconds
    token_lifetime: Option<i64>,
}

/// In-memory stand-in for the hosted backend
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<AuthEvent>,
    public_base: String,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            events,
            public_base: "http://memory.local".to_string(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record a call and take a pending injected failure, if any
    fn record(&self, kind: CallKind, target: &str, payload: Option<Value>) -> ClientResult<()> {
        let mut inner = self.lock();
        inner.calls.push(Call {
            kind,
            target: target.to_string(),
            payload,
        });
        match inner.fail_next.take() {
            Some(message) => Err(ClientError::Api {
                status: 500,
                code: None,
                message,
            }),
            None => Ok(()),
        }
    }

    // ========== Test setup ==========

    /// Insert rows directly, without recording calls
    pub fn seed<I>(&self, table: &str, rows: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let mut inner = self.lock();
        let stored = inner.tables.entry(table.to_string()).or_default();
        stored.extend(rows.into_iter().map(with_column_defaults));
    }

    /// Raw rows of a table
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Answer `function` with a fixed value
    pub fn set_rpc_result(&self, function: &str, result: Value) {
        self.on_rpc(function, move |_| Ok(result.clone()));
    }

    /// Answer `function` by running `handler` on the arguments
    pub fn on_rpc<F>(&self, function: &str, handler: F)
    where
        F: Fn(&Value) -> ClientResult<Value> + Send + Sync + 'static,
    {
        self.lock().rpc.insert(function.to_string(), Arc::new(handler));
    }

    /// Register a password account
    pub fn add_user(&self, email: &str, password: &str, user: AuthUser) {
        self.lock().accounts.insert(
            email.to_lowercase(),
            Account {
                password: password.to_string(),
                user,
            },
        );
    }

    /// Replace an account's user record and emit `UserUpdated`
    pub fn update_user(&self, user: AuthUser) {
        {
            let mut inner = self.lock();
            if let Some(account) = inner.accounts.values_mut().find(|a| a.user.id == user.id) {
                account.user = user.clone();
            }
        }
        self.emit(AuthEvent::UserUpdated(user));
    }

    /// Broadcast an arbitrary auth event
    pub fn emit(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }

    /// Lifetime reported by sessions issued from now on; zero or less
    /// hands out tokens that have already lapsed
    pub fn set_token_lifetime(&self, secs: i64) {
        self.lock().token_lifetime = Some(secs);
    }

    /// Make the next recorded call fail with a 500
    pub fn fail_next_call(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }

    // ========== Inspection ==========

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    /// Calls that write to tables or storage
    pub fn write_calls(&self) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| {
                matches!(
                    c.kind,
                    CallKind::Insert
                        | CallKind::Update
                        | CallKind::Delete
                        | CallKind::Upsert
                        | CallKind::Upload
                        | CallKind::Remove
                )
            })
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Stored object bytes and content type
    pub fn object(&self, bucket: &str, path: &str) -> Option<(Vec<u8>, String)> {
        self.lock()
            .objects
            .get(&(bucket.to_string(), path.to_string()))
            .map(|o| (o.bytes.clone(), o.content_type.clone()))
    }

    fn issue_session(&self, user: AuthUser) -> AuthSession {
        let access_token = format!("access-{}", Uuid::new_v4());
        let refresh_token = format!("refresh-{}", Uuid::new_v4());
        let mut inner = self.lock();
        inner.tokens.insert(access_token.clone(), user.id);
        inner.tokens.insert(refresh_token.clone(), user.id);
        AuthSession {
            access_token,
            refresh_token: Some(refresh_token),
            expires_in: Some(inner.token_lifetime.unwrap_or(DEFAULT_TOKEN_LIFETIME)),
            user,
        }
    }

    fn user_for_token(&self, token: &str) -> Option<AuthUser> {
        let inner = self.lock();
        let user_id = inner.tokens.get(token)?;
        inner
            .accounts
            .values()
            .find(|a| a.user.id == *user_id)
            .map(|a| a.user.clone())
    }
}

/// Column defaults the real schema applies on insert
fn with_column_defaults(mut row: Value) -> Value {
    if let Value::Object(map) = &mut row {
        map.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        map.entry("version").or_insert(Value::from(0));
        map.entry("created_at")
            .or_insert_with(|| Value::String(chrono::Utc::now().to_rfc3339()));
    }
    row
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (k, v) in patch {
            target.insert(k.clone(), v.clone());
        }
    }
}

fn object(row: &Value) -> ClientResult<&Map<String, Value>> {
    row.as_object()
        .ok_or_else(|| ClientError::Validation("row must be a JSON object".to_string()))
}

#[async_trait]
impl DataStore for MemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>> {
        self.record(CallKind::Select, table, None)?;
        Ok(query.apply(self.rows(table)))
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        self.record(CallKind::Insert, table, Some(row.clone()))?;
        object(&row)?;
        let row = with_column_defaults(row);
        let mut inner = self.lock();
        let rows = inner.tables.entry(table.to_string()).or_default();
        if rows.iter().any(|r| r.get("id") == row.get("id")) {
            return Err(ClientError::Conflict(format!("duplicate id in {}", table)));
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, query: &Query, patch: Value) -> ClientResult<Vec<Value>> {
        self.record(CallKind::Update, table, Some(patch.clone()))?;
        object(&patch)?;
        let mut inner = self.lock();
        let mut updated = Vec::new();
        if let Some(rows) = inner.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| query.matches(r)) {
                merge(row, &patch);
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, query: &Query) -> ClientResult<usize> {
        self.record(CallKind::Delete, table, None)?;
        let mut inner = self.lock();
        let Some(rows) = inner.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !query.matches(r));
        Ok(before - rows.len())
    }

    async fn upsert(&self, table: &str, row: Value, on_conflict: &str) -> ClientResult<Value> {
        self.record(CallKind::Upsert, table, Some(row.clone()))?;
        let key = object(&row)?.get(on_conflict).cloned().unwrap_or(Value::Null);
        let mut inner = self.lock();
        let rows = inner.tables.entry(table.to_string()).or_default();
        if let Some(existing) = rows
            .iter_mut()
            .find(|r| !key.is_null() && r.get(on_conflict) == Some(&key))
        {
            merge(existing, &row);
            return Ok(existing.clone());
        }
        let row = with_column_defaults(row);
        rows.push(row.clone());
        Ok(row)
    }

    async fn rpc(&self, function: &str, args: Value) -> ClientResult<Value> {
        self.record(CallKind::Rpc, function, Some(args.clone()))?;
        let handler = self.lock().rpc.get(function).cloned();
        match handler {
            Some(handler) => handler(&args),
            None => Err(ClientError::Rpc {
                function: function.to_string(),
                message: "function not found".to_string(),
            }),
        }
    }
}

#[async_trait]
impl ObjectStorage for MemoryBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> ClientResult<String> {
        self.record(
            CallKind::Upload,
            bucket,
            Some(Value::String(path.to_string())),
        )?;
        let mut inner = self.lock();
        let key = (bucket.to_string(), path.to_string());
        if !upsert && inner.objects.contains_key(&key) {
            return Err(ClientError::Conflict(format!("{}/{} already exists", bucket, path)));
        }
        inner.objects.insert(
            key,
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.public_base, bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> ClientResult<()> {
        self.record(CallKind::Remove, bucket, Some(Value::from(paths.to_vec())))?;
        let mut inner = self.lock();
        for path in paths {
            inner.objects.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthSession> {
        self.record(CallKind::SignIn, email, None)?;
        let user = {
            let inner = self.lock();
            match inner.accounts.get(&email.to_lowercase()) {
                Some(account) if account.password == password => account.user.clone(),
                _ => {
                    return Err(ClientError::Unauthorized(
                        "Invalid login credentials".to_string(),
                    ));
                }
            }
        };
        let session = self.issue_session(user.clone());
        self.emit(AuthEvent::SignedIn(user));
        Ok(session)
    }

    async fn get_user(&self, access_token: &str) -> ClientResult<AuthUser> {
        self.record(CallKind::GetUser, "user", None)?;
        self.user_for_token(access_token)
            .ok_or_else(|| ClientError::Unauthorized("invalid JWT".to_string()))
    }

    async fn refresh_session(&self, refresh_token: &str) -> ClientResult<AuthSession> {
        self.record(CallKind::Refresh, "token", None)?;
        let user = self
            .user_for_token(refresh_token)
            .ok_or_else(|| ClientError::Unauthorized("invalid refresh token".to_string()))?;
        self.lock().tokens.remove(refresh_token);
        let session = self.issue_session(user.clone());
        self.emit(AuthEvent::TokenRefreshed(user));
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> ClientResult<()> {
        self.record(CallKind::SignOut, "logout", None)?;
        let user_id = self.lock().tokens.remove(access_token);
        if let Some(id) = user_id {
            self.lock().tokens.retain(|_, uid| *uid != id);
        }
        self.emit(AuthEvent::SignedOut { user_id });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
