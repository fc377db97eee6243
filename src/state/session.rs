//! Global session state.
//!
//! Every change goes through [`SessionState::apply`] (or the transition methods
//! it forwards to). Readers get clones of the whole state.

use serde_json::Value;

use crate::models::User;

/// Lifecycle of one session-mutating operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OpStatus<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for OpStatus<T> {
    fn default() -> Self {
        OpStatus::Idle
    }
}

impl<T> OpStatus<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, OpStatus::Pending)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            OpStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOp {
    Update,
    Delete,
    SignOut,
}

/// Dispatched form of the session transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SignedIn(User),
    Begin(SessionOp),
    UpdateSucceeded(User),
    DeleteSucceeded(Value),
    SignOutSucceeded(Value),
    Failed(SessionOp, String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    current_user: Option<User>,
    update: OpStatus<User>,
    delete: OpStatus<Value>,
    sign_out: OpStatus<Value>,
    last_op: Option<SessionOp>,
}

impl SessionState {
    pub fn new(current_user: Option<User>) -> Self {
        Self {
            current_user,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::SignedIn(user) => self.signed_in(user),
            SessionAction::Begin(SessionOp::Update) => self.begin_update(),
            SessionAction::Begin(SessionOp::Delete) => self.begin_delete(),
            SessionAction::Begin(SessionOp::SignOut) => self.begin_sign_out(),
            SessionAction::UpdateSucceeded(user) => self.succeed_update(user),
            SessionAction::DeleteSucceeded(confirmation) => self.succeed_delete(confirmation),
            SessionAction::SignOutSucceeded(confirmation) => self.succeed_sign_out(confirmation),
            SessionAction::Failed(SessionOp::Update, message) => self.fail_update(message),
            SessionAction::Failed(SessionOp::Delete, message) => self.fail_delete(message),
            SessionAction::Failed(SessionOp::SignOut, message) => self.fail_sign_out(message),
        }
    }

    pub fn signed_in(&mut self, user: User) {
        *self = Self::new(Some(user));
    }

    pub fn begin_update(&mut self) {
        self.update = OpStatus::Pending;
        self.last_op = Some(SessionOp::Update);
    }

    /// The response payload replaces the stored user.
    pub fn succeed_update(&mut self, user: User) {
        self.current_user = Some(user.clone());
        self.update = OpStatus::Succeeded(user);
        self.last_op = Some(SessionOp::Update);
    }

    pub fn fail_update(&mut self, message: impl Into<String>) {
        self.update = OpStatus::Failed(message.into());
        self.last_op = Some(SessionOp::Update);
    }

    pub fn begin_delete(&mut self) {
        self.delete = OpStatus::Pending;
        self.last_op = Some(SessionOp::Delete);
    }

    pub fn succeed_delete(&mut self, confirmation: Value) {
        self.current_user = None;
        self.delete = OpStatus::Succeeded(confirmation);
        self.last_op = Some(SessionOp::Delete);
    }

    pub fn fail_delete(&mut self, message: impl Into<String>) {
        self.delete = OpStatus::Failed(message.into());
        self.last_op = Some(SessionOp::Delete);
    }

    pub fn begin_sign_out(&mut self) {
        self.sign_out = OpStatus::Pending;
        self.last_op = Some(SessionOp::SignOut);
    }

    pub fn succeed_sign_out(&mut self, confirmation: Value) {
        self.current_user = None;
        self.sign_out = OpStatus::Succeeded(confirmation);
        self.last_op = Some(SessionOp::SignOut);
    }

    pub fn fail_sign_out(&mut self, message: impl Into<String>) {
        self.sign_out = OpStatus::Failed(message.into());
        self.last_op = Some(SessionOp::SignOut);
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn update_status(&self) -> &OpStatus<User> {
        &self.update
    }

    pub fn delete_status(&self) -> &OpStatus<Value> {
        &self.delete
    }

    pub fn sign_out_status(&self) -> &OpStatus<Value> {
        &self.sign_out
    }

    pub fn loading(&self) -> bool {
        self.update.is_pending() || self.delete.is_pending() || self.sign_out.is_pending()
    }

    /// Failure of the operation that moved last, if it failed.
    pub fn error(&self) -> Option<&str> {
        match self.last_op? {
            SessionOp::Update => self.update.failure(),
            SessionOp::Delete => self.delete.failure(),
            SessionOp::SignOut => self.sign_out.failure(),
        }
    }
}
