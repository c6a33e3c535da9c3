//! Main egui application: wires the stores to the pages and runs their
//! async work.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use chrono::{Local, Weekday};
use egui::{self, Align, CentralPanel, Layout, RichText, TopBottomPanel};
use gloo_timers::future::TimeoutFuture;

use planner_core::api::{auth as auth_api, chat as chat_api, health as health_api, users as users_api};
use planner_core::client::ApiClient;
use planner_core::event_bus::EventBus;
use planner_core::humanize::{user_friendly_message, ErrorContext};
use planner_core::session::SessionStore;
use planner_core::stores::{ChatStore, MealPlanStore, RecipeStore};
use planner_platform::{origin, storage::open_storage, FetchHttp};
use planner_types::config::ClientConfig;
use planner_types::event::AppEvent;
use planner_types::session::LogoutReason;
use planner_types::user::UserPreferences;
use planner_types::PlannerError;
use planner_ui::panels::{
    auth::{self, AuthAction},
    chat::{self, ChatAction},
    grocery::{self, GroceryAction},
    meal_plan::{self, MealPlanAction},
    profile::{self, ProfileAction},
    recipes::{self, RecipeAction},
};
use planner_ui::state::{Page, RecipeEditor, UiState};
use planner_ui::theme;

use crate::routes::{parse_deep_link, DeepLink};

const NOTICE_MS: u32 = 4_000;
const ERROR_NOTICE_MS: u32 = 7_000;

/// Results of async work, folded into `UiState` at the start of a frame
enum Deferred {
    Navigate(Page),
    OpenEditor(RecipeEditor),
    ProfileLoaded {
        full_name: Option<String>,
        prefs: UserPreferences,
    },
    ClearNotice(u64),
}

type Inbox = Rc<RefCell<Vec<Deferred>>>;

fn post(inbox: &Inbox, item: Deferred) {
    inbox.borrow_mut().push(item);
}

/// Everything that talks to the backend
#[derive(Clone)]
struct Services {
    client: ApiClient,
    session: SessionStore,
    recipes: RecipeStore,
    meal_plan: MealPlanStore,
    chat: ChatStore,
}

enum PageAction {
    Auth(AuthAction),
    Recipe(RecipeAction),
    MealPlan(MealPlanAction),
    Grocery(GroceryAction),
    Chat(ChatAction),
    Profile(ProfileAction),
}

/// Turns a failed call into a notice. Built before the call so it knows
/// whether a session existed when the request went out.
#[derive(Clone)]
struct Reporter {
    bus: EventBus,
    session: SessionStore,
    had_session: bool,
}

impl Reporter {
    fn fail(&self, err: &PlannerError, context: ErrorContext) {
        if err.is_cancelled() {
            return;
        }
        log::warn!(
            "{} failed: {}",
            context.action.as_deref().unwrap_or("request"),
            err
        );
        // A forced logout has already told the user why
        if self.had_session && !self.session.is_authenticated() {
            return;
        }
        self.bus.emit(AppEvent::Error {
            message: user_friendly_message(err, Some(&context)),
        });
    }

    fn notice(&self, message: impl Into<String>) {
        self.bus.emit(AppEvent::Notice {
            message: message.into(),
        });
    }
}

/// The main application state
pub struct PlannerApp {
    ui_state: UiState,
    event_bus: EventBus,
    services: Option<Services>,
    config_error: Option<String>,
    inbox: Inbox,
    in_flight: Rc<Cell<usize>>,
    last_page: Option<Page>,
    last_notice: u64,
    first_frame: bool,
}

impl PlannerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let event_bus = EventBus::new();
        let mut app = Self {
            ui_state: UiState::new(),
            event_bus: event_bus.clone(),
            services: None,
            config_error: None,
            inbox: Rc::new(RefCell::new(Vec::new())),
            in_flight: Rc::new(Cell::new(0)),
            last_page: None,
            last_notice: 0,
            first_frame: true,
        };

        match Self::build_services(&event_bus) {
            Ok(services) => {
                Self::restore_session(services.session.clone(), cc.egui_ctx.clone());
                Self::check_health(services.client.clone());
                app.services = Some(services);
            }
            Err(e) => {
                log::error!("Client configuration failed: {}", e);
                app.config_error = Some(e.to_string());
            }
        }

        match origin::page_href() {
            Ok(href) => {
                if let Some(link) = parse_deep_link(&href) {
                    app.open_deep_link(link, &cc.egui_ctx);
                }
            }
            Err(e) => log::debug!("No page URL: {}", e),
        }

        app
    }

    fn build_services(bus: &EventBus) -> planner_types::Result<Services> {
        let config = ClientConfig::from_build_env();
        let base = origin::resolve_against_page(&config.resolve_base_url()?)?;
        let storage = open_storage(&config.storage)?;
        let session = SessionStore::new(storage, bus.clone());
        let client = ApiClient::new(&base, Rc::new(FetchHttp::new()), session.clone())?;
        log::info!("API base: {}", client.base_url());

        let today = Local::now().date_naive();
        Ok(Services {
            recipes: RecipeStore::new(client.clone()),
            meal_plan: MealPlanStore::new(client.clone(), today, Weekday::Mon),
            chat: ChatStore::new(client.clone()),
            session,
            client,
        })
    }

    /// Load the persisted session (async); pages stay gated until it is done.
    fn restore_session(session: SessionStore, ctx: egui::Context) {
        wasm_bindgen_futures::spawn_local(async move {
            session.init().await;
            ctx.request_repaint();
        });
    }

    fn check_health(client: ApiClient) {
        wasm_bindgen_futures::spawn_local(async move {
            match health_api::check(&client).await {
                Ok(status) if status.is_healthy() => log::info!(
                    "Backend healthy (version {})",
                    status.version.as_deref().unwrap_or("unknown")
                ),
                Ok(status) => log::warn!("Backend reports status {:?}", status.status),
                Err(e) => log::warn!("Health check failed: {}", e),
            }
        });
    }

    fn open_deep_link(&mut self, link: DeepLink, ctx: &egui::Context) {
        match link {
            DeepLink::ResetPassword { token } => {
                log::info!("Opening password reset link");
                self.ui_state.auth.token = token;
                self.ui_state.page = Page::ResetPassword;
            }
            DeepLink::VerifyEmail { token } => {
                log::info!("Opening email verification link");
                self.ui_state.auth.token = token.clone();
                self.ui_state.page = Page::VerifyEmail;
                self.handle_auth(AuthAction::VerifyEmail { token }, ctx);
            }
            DeepLink::RecipeDraft { id, token } => {
                log::info!("Opening recipe draft {}", id);
                let Some(services) = self.services.clone() else {
                    return;
                };
                let reporter = self.reporter(&services);
                let inbox = self.inbox.clone();
                self.spawn(ctx, async move {
                    match chat_api::get_recipe_draft(&services.client, &id, &token).await {
                        Ok(draft) => {
                            post(&inbox, Deferred::OpenEditor(RecipeEditor::from_create(&draft.recipe)));
                            post(&inbox, Deferred::Navigate(Page::Recipes));
                        }
                        Err(e) => reporter.fail(&e, ErrorContext::action("load").with_resource("recipe draft")),
                    }
                });
            }
        }
    }

    fn reporter(&self, services: &Services) -> Reporter {
        Reporter {
            bus: self.event_bus.clone(),
            session: services.session.clone(),
            had_session: services.session.is_authenticated(),
        }
    }

    /// Run `task` on the browser's microtask queue, counting it as busy.
    fn spawn<F>(&self, ctx: &egui::Context, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let in_flight = self.in_flight.clone();
        let ctx = ctx.clone();
        in_flight.set(in_flight.get() + 1);
        wasm_bindgen_futures::spawn_local(async move {
            task.await;
            in_flight.set(in_flight.get().saturating_sub(1));
            ctx.request_repaint();
        });
    }

    fn apply_deferred(&mut self) {
        let items = std::mem::take(&mut *self.inbox.borrow_mut());
        for item in items {
            match item {
                Deferred::Navigate(page) => self.ui_state.navigate(page),
                Deferred::OpenEditor(editor) => self.ui_state.editor = Some(editor),
                Deferred::ProfileLoaded { full_name, prefs } => {
                    self.ui_state.profile.fill(full_name.as_deref(), &prefs);
                }
                Deferred::ClearNotice(serial) => self.ui_state.clear_notice(serial),
            }
        }
    }

    /// Side effects of bus events on the stores, before the UI sees them.
    fn react_to_events(&mut self, events: &[AppEvent]) {
        for event in events {
            match event {
                AppEvent::LoggedOut { reason } => {
                    log::info!("Session ended ({})", reason.as_str());
                    if let Some(services) = &self.services {
                        services.chat.cancel();
                        services.chat.new_conversation();
                    }
                    self.last_page = None;
                }
                AppEvent::LoggedIn { .. } => self.last_page = None,
                _ => {}
            }
        }
    }

    /// Auto-clear the current notice after a while (async timer).
    fn schedule_notice_clear(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.ui_state.notice else {
            return;
        };
        if notice.serial == self.last_notice {
            return;
        }
        self.last_notice = notice.serial;
        let serial = notice.serial;
        let delay = if notice.is_error { ERROR_NOTICE_MS } else { NOTICE_MS };
        let inbox = self.inbox.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(delay).await;
            post(&inbox, Deferred::ClearNotice(serial));
            ctx.request_repaint();
        });
    }

    /// Load what a page shows when it becomes visible.
    fn on_page_enter(&mut self, page: Page, services: &Services, ctx: &egui::Context) {
        match page {
            Page::Recipes => {
                let recipes = services.recipes.clone();
                self.spawn(ctx, async move {
                    if let Err(e) = recipes.fetch().await {
                        log::debug!("Recipe fetch failed: {}", e);
                    }
                });
            }
            Page::MealPlan => {
                let meal_plan = services.meal_plan.clone();
                let recipes = services.recipes.clone();
                let need_recipes = recipes.snapshot().recipes.is_empty();
                self.spawn(ctx, async move {
                    if let Err(e) = meal_plan.fetch_week().await {
                        log::debug!("Meal plan fetch failed: {}", e);
                    }
                    // The meal picker lists recipes
                    if need_recipes {
                        if let Err(e) = recipes.fetch().await {
                            log::debug!("Recipe fetch failed: {}", e);
                        }
                    }
                });
            }
            Page::Chat => {
                let chat = services.chat.clone();
                self.spawn(ctx, async move {
                    if let Err(e) = chat.load_conversations().await {
                        log::debug!("Conversation list failed: {}", e);
                    }
                    if let Err(e) = chat.load_memory().await {
                        log::debug!("Memory load failed: {}", e);
                    }
                });
            }
            Page::Profile if !self.ui_state.profile.loaded => {
                let client = services.client.clone();
                let reporter = self.reporter(services);
                let inbox = self.inbox.clone();
                let full_name = services.session.user().and_then(|u| u.full_name);
                self.spawn(ctx, async move {
                    match users_api::get_preferences(&client).await {
                        Ok(prefs) => post(&inbox, Deferred::ProfileLoaded { full_name, prefs }),
                        Err(e) => reporter.fail(&e, ErrorContext::action("load").with_resource("preferences")),
                    }
                });
            }
            _ => {}
        }
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        self.apply_deferred();

        // Drain events from the session and stores
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.react_to_events(&events);
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        self.ui_state.pending = self.in_flight.get();
        self.schedule_notice_clear(ctx);

        let Some(services) = self.services.clone() else {
            CentralPanel::default().show(ctx, |ui| {
                ui.heading(RichText::new("Configuration error").color(theme::ERROR));
                ui.label(self.config_error.as_deref().unwrap_or("The client is not configured."));
            });
            return;
        };

        if !services.session.is_hydrated() {
            CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| ui.spinner());
            });
            return;
        }

        let authenticated = services.session.is_authenticated();
        let page = self.ui_state.effective_page(authenticated);
        if self.last_page != Some(page) {
            self.last_page = Some(page);
            self.on_page_enter(page, &services, ctx);
        }

        if self.ui_state.is_busy() || services.chat.is_streaming() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Meal Planner")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                if authenticated {
                    ui.separator();
                    for target in Page::main_pages() {
                        if ui.selectable_label(page == *target, target.label()).clicked() {
                            self.ui_state.navigate(*target);
                        }
                    }
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if self.ui_state.is_busy() {
                        ui.spinner();
                    }
                    if let Some(user) = services.session.user() {
                        ui.label(
                            RichText::new(user.display_name())
                                .color(theme::TEXT_SECONDARY)
                                .small(),
                        );
                    }
                });
            });
            if let Some(notice) = &self.ui_state.notice {
                let color = if notice.is_error { theme::ERROR } else { theme::SUCCESS };
                ui.label(RichText::new(&notice.message).color(color));
            }
        });

        // ── Main content ─────────────────────────────────────
        let mut action = None;
        CentralPanel::default().show(ctx, |ui| {
            let state = &mut self.ui_state;
            action = match page {
                Page::Recipes => {
                    let view = services.recipes.snapshot();
                    recipes::recipes_panel(ui, state, &view).map(PageAction::Recipe)
                }
                Page::MealPlan => {
                    let view = services.meal_plan.snapshot();
                    let known = services.recipes.snapshot().recipes;
                    meal_plan::meal_plan_panel(ui, state, &view, &known).map(PageAction::MealPlan)
                }
                Page::Grocery => {
                    let view = services.meal_plan.snapshot();
                    grocery::grocery_panel(ui, &view).map(PageAction::Grocery)
                }
                Page::Chat => {
                    let view = services.chat.snapshot();
                    chat::chat_panel(ui, state, &view).map(PageAction::Chat)
                }
                Page::Profile => {
                    let user = services.session.user();
                    profile::profile_panel(ui, state, user.as_ref()).map(PageAction::Profile)
                }
                auth_page => auth::auth_panel(ui, state, auth_page).map(PageAction::Auth),
            };
        });

        match action {
            Some(PageAction::Auth(a)) => self.handle_auth(a, ctx),
            Some(PageAction::Recipe(a)) => self.handle_recipe(a, &services, ctx),
            Some(PageAction::MealPlan(a)) => self.handle_meal_plan(a, &services, ctx),
            Some(PageAction::Grocery(a)) => self.handle_grocery(a, &services, ctx),
            Some(PageAction::Chat(a)) => self.handle_chat(a, &services, ctx),
            Some(PageAction::Profile(a)) => self.handle_profile(a, &services, ctx),
            None => {}
        }
    }
}

// ─── Action handlers ─────────────────────────────────────────

impl PlannerApp {
    fn handle_auth(&mut self, action: AuthAction, ctx: &egui::Context) {
        let Some(services) = self.services.clone() else {
            return;
        };
        let client = services.client.clone();
        let reporter = self.reporter(&services);
        let inbox = self.inbox.clone();

        match action {
            AuthAction::Login(credentials) => self.spawn(ctx, async move {
                if let Err(e) = auth_api::sign_in(&client, &credentials).await {
                    reporter.fail(&e, ErrorContext::action("login"));
                }
            }),
            AuthAction::Register(request) => self.spawn(ctx, async move {
                match auth_api::register(&client, &request).await {
                    Ok(response) if response.access_token.is_some() => {
                        if let Err(e) = auth_api::establish_session(&client, response).await {
                            reporter.fail(&e, ErrorContext::action("login"));
                        }
                    }
                    Ok(response) => {
                        reporter.notice(response.message.unwrap_or_else(|| {
                            "Account created. Check your email to verify it, then log in.".to_string()
                        }));
                        post(&inbox, Deferred::Navigate(Page::VerifyEmail));
                    }
                    Err(e) => reporter.fail(&e, ErrorContext::action("register")),
                }
            }),
            AuthAction::ForgotPassword { email } => self.spawn(ctx, async move {
                match auth_api::forgot_password(&client, &email).await {
                    Ok(()) => reporter.notice("If an account exists for that email, a reset link is on its way."),
                    Err(e) => reporter.fail(&e, ErrorContext::action("reset").with_field("email")),
                }
            }),
            AuthAction::ResetPassword { token, new_password } => self.spawn(ctx, async move {
                match auth_api::reset_password(&client, &token, &new_password).await {
                    Ok(()) => {
                        reporter.notice("Your password has been reset. Please log in.");
                        post(&inbox, Deferred::Navigate(Page::Login));
                    }
                    Err(e) => reporter.fail(&e, ErrorContext::action("reset").with_field("password")),
                }
            }),
            AuthAction::VerifyEmail { token } => self.spawn(ctx, async move {
                match auth_api::verify_email(&client, &token).await {
                    Ok(response) if response.access_token.is_some() => {
                        if let Err(e) = auth_api::establish_session(&client, response).await {
                            reporter.fail(&e, ErrorContext::action("login"));
                        }
                    }
                    Ok(_) => {
                        reporter.notice("Email verified. You can log in now.");
                        post(&inbox, Deferred::Navigate(Page::Login));
                    }
                    Err(e) => reporter.fail(&e, ErrorContext::action("verify").with_resource("email")),
                }
            }),
            AuthAction::ResendVerification { email } => self.spawn(ctx, async move {
                match auth_api::resend_verification(&client, &email).await {
                    Ok(()) => reporter.notice("Verification email sent."),
                    Err(e) => reporter.fail(&e, ErrorContext::action("resend").with_field("email")),
                }
            }),
        }
    }

    fn handle_recipe(&mut self, action: RecipeAction, services: &Services, ctx: &egui::Context) {
        let store = services.recipes.clone();
        let reporter = self.reporter(services);
        let inbox = self.inbox.clone();

        match action {
            RecipeAction::Refresh => self.spawn(ctx, async move {
                if let Err(e) = store.fetch().await {
                    log::debug!("Recipe fetch failed: {}", e);
                }
            }),
            RecipeAction::SetFilters(filters) => store.set_filters(filters),
            RecipeAction::SetSort(sort) => store.set_sort(sort),
            RecipeAction::Create(payload) => self.spawn(ctx, async move {
                match store.create(payload.clone()).await {
                    Ok(Some(recipe)) => reporter.notice(format!("Saved \"{}\"", recipe.title)),
                    // Waiting on the duplicate prompt
                    Ok(None) => {}
                    Err(e) => {
                        reporter.fail(&e, ErrorContext::action("create").with_resource("recipe"));
                        post(&inbox, Deferred::OpenEditor(RecipeEditor::from_create(&payload)));
                    }
                }
            }),
            RecipeAction::Update { id, changes } => self.spawn(ctx, async move {
                match store.update(&id, &changes).await {
                    Ok(recipe) => reporter.notice(format!("Updated \"{}\"", recipe.title)),
                    Err(e) => reporter.fail(&e, ErrorContext::action("update").with_resource("recipe")),
                }
            }),
            RecipeAction::Delete(id) => {
                if self.ui_state.selected_recipe.as_deref() == Some(id.as_str()) {
                    self.ui_state.selected_recipe = None;
                }
                self.spawn(ctx, async move {
                    match store.delete(&id).await {
                        Ok(()) => reporter.notice("Recipe deleted"),
                        Err(e) => reporter.fail(&e, ErrorContext::action("delete").with_resource("recipe")),
                    }
                });
            }
            RecipeAction::ViewExisting(id) => {
                store.dismiss_duplicate();
                self.ui_state.selected_recipe = Some(id);
            }
            RecipeAction::CreateAnyway => self.spawn(ctx, async move {
                match store.force_create().await {
                    Ok(Some(recipe)) => reporter.notice(format!("Saved \"{}\"", recipe.title)),
                    Ok(None) => {}
                    Err(e) => reporter.fail(&e, ErrorContext::action("create").with_resource("recipe")),
                }
            }),
            RecipeAction::DismissDuplicate => store.dismiss_duplicate(),
        }
    }

    fn handle_meal_plan(&mut self, action: MealPlanAction, services: &Services, ctx: &egui::Context) {
        let store = services.meal_plan.clone();
        let reporter = self.reporter(services);
        let inbox = self.inbox.clone();

        match action {
            MealPlanAction::PreviousWeek => self.spawn(ctx, async move {
                if let Err(e) = store.previous_week().await {
                    log::debug!("Week fetch failed: {}", e);
                }
            }),
            MealPlanAction::NextWeek => self.spawn(ctx, async move {
                if let Err(e) = store.next_week().await {
                    log::debug!("Week fetch failed: {}", e);
                }
            }),
            MealPlanAction::ThisWeek => {
                let today = Local::now().date_naive();
                self.spawn(ctx, async move {
                    if let Err(e) = store.go_to(today).await {
                        log::debug!("Week fetch failed: {}", e);
                    }
                });
            }
            MealPlanAction::AddMeal(meal) => self.spawn(ctx, async move {
                match store.add_meal(&meal).await {
                    Ok(_) => reporter.notice("Meal added"),
                    Err(e) => reporter.fail(&e, ErrorContext::action("add").with_resource("meal")),
                }
            }),
            MealPlanAction::DeleteMeal(id) => self.spawn(ctx, async move {
                match store.delete_meal(&id).await {
                    Ok(()) => reporter.notice("Meal removed"),
                    Err(e) => reporter.fail(&e, ErrorContext::action("delete").with_resource("meal")),
                }
            }),
            MealPlanAction::MarkCooked(id) => self.spawn(ctx, async move {
                if let Err(e) = store.mark_cooked(&id).await {
                    reporter.fail(&e, ErrorContext::action("update").with_resource("meal"));
                }
            }),
            MealPlanAction::SaveWeek => self.spawn(ctx, async move {
                match store.save_week().await {
                    Ok(()) => reporter.notice("Week saved"),
                    Err(e) => reporter.fail(&e, ErrorContext::action("save").with_resource("meal plan")),
                }
            }),
            MealPlanAction::GenerateGroceryList => self.spawn(ctx, async move {
                match store.generate_grocery_list().await {
                    Ok(list) => {
                        reporter.notice(format!("Grocery list ready: {} items", list.items.len()));
                        post(&inbox, Deferred::Navigate(Page::Grocery));
                    }
                    Err(e) => reporter.fail(&e, ErrorContext::action("create").with_resource("grocery list")),
                }
            }),
        }
    }

    fn handle_grocery(&mut self, action: GroceryAction, services: &Services, ctx: &egui::Context) {
        match action {
            GroceryAction::Toggle(index) => services.meal_plan.toggle_grocery_item(index),
            GroceryAction::Generate => {
                self.handle_meal_plan(MealPlanAction::GenerateGroceryList, services, ctx)
            }
        }
    }

    fn handle_chat(&mut self, action: ChatAction, services: &Services, ctx: &egui::Context) {
        let store = services.chat.clone();
        let reporter = self.reporter(services);

        match action {
            ChatAction::Send(text) => self.spawn(ctx, async move {
                if let Err(e) = store.send_message(&text).await {
                    log::debug!("Chat turn ended with error: {}", e);
                }
            }),
            ChatAction::Stop => store.cancel(),
            ChatAction::NewConversation => store.new_conversation(),
            ChatAction::OpenConversation(id) => self.spawn(ctx, async move {
                if let Err(e) = store.open_conversation(&id).await {
                    reporter.fail(&e, ErrorContext::action("load").with_resource("conversation"));
                }
            }),
            ChatAction::AcceptAction(id) => self.spawn(ctx, async move {
                if let Err(e) = store.accept_action(&id).await {
                    reporter.fail(&e, ErrorContext::action("accept").with_resource("action"));
                }
            }),
            ChatAction::CancelAction(id) => self.spawn(ctx, async move {
                if let Err(e) = store.cancel_action(&id).await {
                    reporter.fail(&e, ErrorContext::action("cancel").with_resource("action"));
                }
            }),
            ChatAction::Feedback { message_id, rating } => self.spawn(ctx, async move {
                match store.feedback(&message_id, rating).await {
                    Ok(()) => reporter.notice("Thanks for the feedback"),
                    Err(e) => reporter.fail(&e, ErrorContext::action("send").with_resource("feedback")),
                }
            }),
            ChatAction::SaveMemory(content) => self.spawn(ctx, async move {
                match store.save_memory(&content).await {
                    Ok(()) => reporter.notice("Memory saved"),
                    Err(e) => reporter.fail(&e, ErrorContext::action("save").with_resource("memory")),
                }
            }),
            ChatAction::DismissError => store.clear_error(),
        }
    }

    fn handle_profile(&mut self, action: ProfileAction, services: &Services, ctx: &egui::Context) {
        let client = services.client.clone();
        let reporter = self.reporter(services);

        match action {
            ProfileAction::SaveProfile(changes) => self.spawn(ctx, async move {
                match users_api::update_me(&client, &changes).await {
                    Ok(_) => reporter.notice("Profile saved"),
                    Err(e) => reporter.fail(&e, ErrorContext::action("update").with_resource("profile")),
                }
            }),
            ProfileAction::SavePreferences(prefs) => self.spawn(ctx, async move {
                match users_api::update_preferences(&client, &prefs).await {
                    Ok(_) => reporter.notice("Preferences saved"),
                    Err(e) => reporter.fail(&e, ErrorContext::action("update").with_resource("preferences")),
                }
            }),
            ProfileAction::ResendVerification(email) => self.spawn(ctx, async move {
                match auth_api::resend_verification(&client, &email).await {
                    Ok(()) => reporter.notice("Verification email sent."),
                    Err(e) => reporter.fail(&e, ErrorContext::action("resend").with_field("email")),
                }
            }),
            ProfileAction::Logout => {
                let session = services.session.clone();
                self.spawn(ctx, async move {
                    session.logout(LogoutReason::Manual).await;
                });
            }
        }
    }
}
