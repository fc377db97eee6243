use std::future::Future;
use std::rc::Rc;

use futures::StreamExt;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;
use yew_agent::{Bridge, Bridged, Dispatched};
use yew_router::prelude::*;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{Listing, ProfileField, User};
use crate::services::api::ProfileApi;
use crate::services::profile_service;
use crate::services::session_bus::SessionBus;
use crate::services::storage::{ObjectStorage, UploadEvent, UploadHandle};
use crate::services::ProfileServices;
use crate::state::{ProfileState, SessionState, UploadMessage, UploadTicket};
use crate::tasks::ViewTasks;
use crate::Route;

pub enum Msg {
    Session(SessionState),
    PickFile,
    FileSelected(File),
    Upload(UploadTicket, UploadEvent),
    FieldChanged(ProfileField, String),
    Submit,
    Updated(bool),
    DeleteAccount,
    SignOut,
    ShowListings,
    ListingsLoaded(Result<Vec<Listing>, ApiError>),
}

pub struct ProfileView {
    /// `None` until the session bus sends its first snapshot.
    session: Option<SessionState>,
    state: ProfileState,
    file_input: NodeRef,
    api: Rc<dyn ProfileApi>,
    storage: Rc<dyn ObjectStorage>,
    upload: Option<UploadHandle>,
    tasks: ViewTasks,
    _session_bus: Box<dyn Bridge<SessionBus>>,
}

impl ProfileView {
    fn user(&self) -> Option<&User> {
        self.session.as_ref()?.current_user()
    }

    /// Runs `task` until it finishes or the view unmounts, then delivers its message if any.
    fn spawn_guarded<F>(&self, ctx: &Context<Self>, task: F)
    where
        F: Future<Output = Option<Msg>> + 'static,
    {
        let link = ctx.link().clone();
        let task = self.tasks.guard(task);
        spawn_local(async move {
            match task.await {
                Some(Some(msg)) => link.send_message(msg),
                Some(None) => {}
                None => log::debug!("profile view unmounted, task aborted"),
            }
        });
    }

    fn start_upload(&mut self, ctx: &Context<Self>, file: File) {
        if let Some(previous) = self.upload.take() {
            log::debug!("replacing in-flight avatar upload");
            previous.cancel();
        }
        let ticket = self.state.begin_upload();
        let task = match self.storage.start_upload(file) {
            Ok(task) => task,
            Err(err) => {
                self.state.apply_upload_event(ticket, UploadEvent::Failed(err));
                return;
            }
        };
        self.upload = Some(task.handle);

        let link = ctx.link().clone();
        let mut events = task.events;
        let pump = self.tasks.guard(async move {
            while let Some(event) = events.next().await {
                let terminal = event.is_terminal();
                link.send_message(Msg::Upload(ticket, event));
                if terminal {
                    break;
                }
            }
        });
        spawn_local(async move {
            let _ = pump.await;
        });
    }

    fn view_upload_message(&self) -> Html {
        let Some(message) = self.state.upload_message() else {
            return html! {};
        };
        let class = match message {
            UploadMessage::Failed => "text-red-700",
            UploadMessage::Uploading(_) => "text-slate-700",
            UploadMessage::Succeeded => "text-green-700",
        };
        html! { <span class={class}>{ message.text() }</span> }
    }

    fn view_listings(&self) -> Html {
        let listings = self.state.listings();
        if listings.is_empty() {
            return html! {};
        }
        html! {
            <div class="flex flex-col gap-4">
                <h1 class="text-center mt-7 text-2xl font-semibold">{"Your Listings"}</h1>
                { for listings.iter().map(view_listing) }
            </div>
        }
    }
}

fn view_listing(listing: &Listing) -> Html {
    html! {
        <div key={listing.id.clone()} class="border gap-4 rounded-lg p-3 flex justify-between items-center">
            if let Some(cover) = listing.cover() {
                <Link<Route> to={listing.detail_route()}>
                    <img src={cover.to_string()} alt="listing cover" class="h-16 w-16 object-contain" />
                </Link<Route>>
            }
            <Link<Route>
                to={listing.detail_route()}
                classes={classes!("flex-1", "text-slate-700", "font-semibold", "hover:underline", "truncate")}
            >
                <p>{ &listing.name }</p>
            </Link<Route>>
            // not wired up on this page
            <div class="flex flex-col items-center">
                <button type="button" class="text-red-700 uppercase">{"Delete"}</button>
                <button type="button" class="text-green-700 uppercase">{"Edit"}</button>
            </div>
        </div>
    }
}

impl Component for ProfileView {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let services = match ctx.link().context::<ProfileServices>(Callback::noop()) {
            Some((services, _)) => services,
            None => {
                log::debug!("no ProfileServices context, using the build configuration");
                ProfileServices::from_config(Rc::new(AppConfig::from_build_env()))
            }
        };
        Self {
            session: None,
            state: ProfileState::new(),
            file_input: NodeRef::default(),
            api: services.api,
            storage: services.storage,
            upload: None,
            tasks: ViewTasks::new(),
            _session_bus: SessionBus::bridge(ctx.link().callback(Msg::Session)),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Session(snapshot) => {
                self.session = Some(snapshot);
                true
            }
            Msg::PickFile => {
                if let Some(input) = self.file_input.cast::<HtmlInputElement>() {
                    input.click();
                }
                false
            }
            Msg::FileSelected(file) => {
                self.start_upload(ctx, file);
                true
            }
            Msg::Upload(ticket, event) => self.state.apply_upload_event(ticket, event),
            Msg::FieldChanged(field, value) => {
                self.state.edit(field, value);
                true
            }
            Msg::Submit => {
                let Some(user_id) = self.user().map(|u| u.id.clone()) else {
                    return false;
                };
                let api = self.api.clone();
                let overlay = self.state.overlay().clone();
                self.spawn_guarded(ctx, async move {
                    let mut session = SessionBus::dispatcher();
                    let updated =
                        profile_service::update_profile(api.as_ref(), &mut session, &user_id, &overlay)
                            .await;
                    Some(Msg::Updated(updated))
                });
                false
            }
            Msg::Updated(updated) => {
                if updated {
                    self.state.mark_updated();
                }
                updated
            }
            Msg::DeleteAccount => {
                let Some(user_id) = self.user().map(|u| u.id.clone()) else {
                    return false;
                };
                let api = self.api.clone();
                self.spawn_guarded(ctx, async move {
                    let mut session = SessionBus::dispatcher();
                    profile_service::delete_account(api.as_ref(), &mut session, &user_id).await;
                    // the outcome arrives as a session snapshot
                    None
                });
                false
            }
            Msg::SignOut => {
                let api = self.api.clone();
                self.spawn_guarded(ctx, async move {
                    let mut session = SessionBus::dispatcher();
                    profile_service::sign_out(api.as_ref(), &mut session).await;
                    None
                });
                false
            }
            Msg::ShowListings => {
                let Some(user_id) = self.user().map(|u| u.id.clone()) else {
                    return false;
                };
                self.state.begin_listings_fetch();
                let api = self.api.clone();
                self.spawn_guarded(ctx, async move {
                    Some(Msg::ListingsLoaded(
                        profile_service::fetch_listings(api.as_ref(), &user_id).await,
                    ))
                });
                true
            }
            Msg::ListingsLoaded(result) => {
                self.state.finish_listings_fetch(result);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(session) = self.session.as_ref() else {
            return html! {};
        };
        let Some(user) = session.current_user() else {
            return html! { <Redirect<Route> to={Route::SignIn} /> };
        };
        let overlay = self.state.overlay();
        let loading = session.loading();

        let on_file = ctx.link().batch_callback(|e: Event| {
            let input = e.target()?.dyn_into::<HtmlInputElement>().ok()?;
            let file = input.files()?.get(0)?;
            Some(Msg::FileSelected(file))
        });
        let on_field = ctx.link().batch_callback(|e: InputEvent| {
            let input = e.target()?.dyn_into::<HtmlInputElement>().ok()?;
            let field = ProfileField::from_input_id(&input.id())?;
            Some(Msg::FieldChanged(field, input.value()))
        });
        let on_submit = ctx.link().callback(|e: FocusEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="p-3 max-w-lg mx-auto">
                <h1 class="text-3xl font-semibold text-center my-7">{"Profile"}</h1>
                <form onsubmit={on_submit} class="flex flex-col gap-4">
                    <input
                        ref={self.file_input.clone()}
                        onchange={on_file}
                        type="file"
                        hidden=true
                        accept="image/*"
                    />
                    <img
                        onclick={ctx.link().callback(|_| Msg::PickFile)}
                        src={overlay.avatar_src(user).to_string()}
                        alt="profile"
                        class="rounded-full h-24 w-24 object-cover cursor-pointer self-center mt-2"
                    />
                    <p class="text-sm self-center">{ self.view_upload_message() }</p>
                    <input
                        type="text"
                        id={ProfileField::Username.input_id()}
                        placeholder="username"
                        value={overlay.display_value(ProfileField::Username, user).to_string()}
                        oninput={on_field.clone()}
                        class="border p-3 rounded-lg"
                    />
                    <input
                        type="email"
                        id={ProfileField::Email.input_id()}
                        placeholder="email"
                        value={overlay.display_value(ProfileField::Email, user).to_string()}
                        oninput={on_field.clone()}
                        class="border p-3 rounded-lg"
                    />
                    <input
                        type="password"
                        id={ProfileField::Password.input_id()}
                        placeholder="password"
                        value={overlay.display_value(ProfileField::Password, user).to_string()}
                        oninput={on_field}
                        class="border p-3 rounded-lg"
                    />
                    <button
                        disabled={loading}
                        class="bg-slate-700 text-white rounded-lg p-3 uppercase hover:opacity-95 disabled:opacity-80"
                    >
                        { if loading { "Loading..." } else { "Update" } }
                    </button>
                    <Link<Route>
                        to={Route::CreateListing}
                        classes={classes!("bg-green-700", "text-white", "p-3", "rounded-lg", "uppercase", "text-center", "hover:opacity-90")}
                    >
                        {"Create Listing"}
                    </Link<Route>>
                </form>
                <div class="flex justify-between mt-5">
                    <span onclick={ctx.link().callback(|_| Msg::DeleteAccount)} class="text-red-700 cursor-pointer">
                        {"Delete Account"}
                    </span>
                    <span onclick={ctx.link().callback(|_| Msg::SignOut)} class="text-red-700 cursor-pointer">
                        {"Sign out"}
                    </span>
                </div>
                <p class="text-red-700 mt-5">{ session.error().unwrap_or_default() }</p>
                <p class="text-green-700 mt-5">
                    { if self.state.update_succeeded() { "User is updated successfully" } else { "" } }
                </p>
                <button onclick={ctx.link().callback(|_| Msg::ShowListings)} class="text-green-700 w-full">
                    {"Show Listings"}
                </button>
                <p class="text-red-700 mt-5">
                    { if self.state.listing_error() { "Error showing listings" } else { "" } }
                </p>
                { self.view_listings() }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.tasks.abort_all();
        if let Some(upload) = self.upload.take() {
            upload.cancel();
        }
    }
}
