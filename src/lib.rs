#![recursion_limit = "512"]

pub mod components;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod tasks;

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use yew::prelude::*;
use yew_router::prelude::*;

use components::profile::ProfileView;
use config::AppConfig;
use services::ProfileServices;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[derive(Debug, Clone, PartialEq, Routable)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/sign-in")]
    SignIn,
    #[at("/sign-up")]
    SignUp,
    #[at("/about")]
    About,
    #[at("/profile")]
    Profile,
    #[at("/create-listing")]
    CreateListing,
    #[at("/listing/:id")]
    Listing { id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[function_component(Main)]
fn main() -> Html {
    let services = use_state(|| ProfileServices::from_config(Rc::new(AppConfig::from_build_env())));
    html! {
        <ContextProvider<ProfileServices> context={(*services).clone()}>
            <BrowserRouter>
                <Switch<Route> render={Switch::render(switch)} />
            </BrowserRouter>
        </ContextProvider<ProfileServices>>
    }
}

// Everything but the profile page is served by other parts of the app.
fn switch(route: &Route) -> Html {
    match route {
        Route::Profile => html! { <ProfileView /> },
        Route::Home => html! { <h1 class="text-3xl text-center my-7">{"Home"}</h1> },
        Route::SignIn => html! { <h1 class="text-3xl text-center my-7">{"Sign In"}</h1> },
        Route::SignUp => html! { <h1 class="text-3xl text-center my-7">{"Sign Up"}</h1> },
        Route::About => html! { <h1 class="text-3xl text-center my-7">{"About"}</h1> },
        Route::CreateListing => {
            html! { <h1 class="text-3xl text-center my-7">{"Create a Listing"}</h1> }
        }
        Route::Listing { id } => {
            html! { <h1 class="text-3xl text-center my-7">{ format!("Listing {}", id) }</h1> }
        }
        Route::NotFound => html! { <h1>{"404 not found"}</h1> },
    }
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::start_app::<Main>();
    Ok(())
}
