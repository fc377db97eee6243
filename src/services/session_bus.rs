use std::collections::HashSet;

use yew_agent::{Agent, AgentLink, Context, Dispatcher, HandlerId};

use crate::models::User;
use crate::state::{SessionAction, SessionState};

pub const SESSION_STORAGE_KEY: &str = "estate-profile.session";

/// Anything the async flows can push session actions into.
pub trait SessionDispatch {
    fn dispatch(&mut self, action: SessionAction);
}

impl SessionDispatch for Dispatcher<SessionBus> {
    fn dispatch(&mut self, action: SessionAction) {
        self.send(action);
    }
}

/// Holds the one `SessionState` of the page and broadcasts every change.
pub struct SessionBus {
    link: AgentLink<SessionBus>,
    subscribers: HashSet<HandlerId>,
    state: SessionState,
}

impl Agent for SessionBus {
    type Reach = Context<Self>;
    type Message = ();
    type Input = SessionAction;
    type Output = SessionState;

    fn create(link: AgentLink<Self>) -> Self {
        Self {
            link,
            subscribers: HashSet::new(),
            state: SessionState::new(restore_user()),
        }
    }

    fn update(&mut self, _msg: Self::Message) {}

    fn handle_input(&mut self, action: Self::Input, _id: HandlerId) {
        log::debug!("session action: {:?}", action);
        let before = self.state.current_user().cloned();
        self.state.apply(action);
        if self.state.current_user() != before.as_ref() {
            persist_user(self.state.current_user());
        }
        for sub in self.subscribers.iter() {
            self.link.respond(*sub, self.state.clone());
        }
    }

    fn connected(&mut self, id: HandlerId) {
        // dispatchers connect too but take no output
        if id.is_respondable() {
            self.subscribers.insert(id);
            self.link.respond(id, self.state.clone());
        }
    }

    fn disconnected(&mut self, id: HandlerId) {
        self.subscribers.remove(&id);
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn restore_user() -> Option<User> {
    let raw = local_storage()?.get_item(SESSION_STORAGE_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("discarding unreadable stored session: {}", e);
            None
        }
    }
}

fn persist_user(user: Option<&User>) {
    let Some(storage) = local_storage() else {
        log::warn!("localStorage unavailable, session will not survive a reload");
        return;
    };
    let result = match user {
        Some(user) => match serde_json::to_string(user) {
            Ok(raw) => storage.set_item(SESSION_STORAGE_KEY, &raw),
            Err(e) => {
                log::warn!("could not serialize session: {}", e);
                return;
            }
        },
        None => storage.remove_item(SESSION_STORAGE_KEY),
    };
    if let Err(e) = result {
        log::warn!("could not persist session: {:?}", e);
    }
}
