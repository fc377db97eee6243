use std::rc::Rc;

use crate::config::AppConfig;

pub mod api;
pub mod profile_service;
pub mod session_bus;
pub mod storage;

use api::{HttpProfileApi, ProfileApi};
use storage::{FirebaseStorage, ObjectStorage};

/// The I/O backends the profile view talks to, shared through a yew context.
#[derive(Clone)]
pub struct ProfileServices {
    pub api: Rc<dyn ProfileApi>,
    pub storage: Rc<dyn ObjectStorage>,
}

impl ProfileServices {
    pub fn new(api: Rc<dyn ProfileApi>, storage: Rc<dyn ObjectStorage>) -> Self {
        Self { api, storage }
    }

    /// The REST API and Firebase Storage described by `config`.
    pub fn from_config(config: Rc<AppConfig>) -> Self {
        Self {
            api: Rc::new(HttpProfileApi::new(config.clone())),
            storage: Rc::new(FirebaseStorage::new(config.storage.clone())),
        }
    }
}

impl PartialEq for ProfileServices {
    fn eq(&self, other: &Self) -> bool {
        same_object(&self.api, &other.api) && same_object(&self.storage, &other.storage)
    }
}

// compares data pointers only, vtables of one type can differ between codegen units
fn same_object<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}
