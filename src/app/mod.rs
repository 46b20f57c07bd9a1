// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the search form, the
//! result containers and the help page.
//!
//! The `App` struct owns the search session, the HTTP client and the shared
//! UI state (modal, toasts, image cache) and translates messages into mode
//! switches and server requests. Policy decisions such as when a request is
//! allowed, or which response may still be shown, live in [`update`].

mod message;
pub mod paths;
pub mod session;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use session::SearchSession;

use crate::config::{self, Config, ServerConfig};
use crate::error::Result;
use crate::fragment::ImageCache;
use crate::i18n::fluent::I18n;
use crate::navigation::Layout;
use crate::search::routes::Routes;
use crate::search::sequence::RequestFence;
use crate::search::validation::UploadLimits;
use crate::search::SearchClient;
use crate::ui::help;
use crate::ui::modal::Modal;
use crate::ui::notifications;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    config: Config,
    /// `None` when the server URL could not be used.
    client: Option<SearchClient>,
    /// Upload limits in effect, from the server when it publishes them.
    limits: UploadLimits,
    session: SearchSession,
    /// View description derived from the session after every update.
    layout: Layout,
    help: help::State,
    help_fence: RequestFence,
    images: ImageCache,
    modal: Option<Modal>,
    /// Whether the language menu is open.
    menu_open: bool,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("mode", &self.session.navigation.mode())
            .field("page", &self.session.navigation.page())
            .field("has_image", &self.session.has_image())
            .finish()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 760;
pub const WINDOW_DEFAULT_WIDTH: u32 = 900;
pub const MIN_WINDOW_HEIGHT: u32 = 480;
pub const MIN_WINDOW_WIDTH: u32 = 560;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

/// HTTP client for the configured server.
fn build_client(server: &ServerConfig) -> Result<SearchClient> {
    let routes = Routes::new(&server.base_url, server.api_variant)?;
    SearchClient::new(routes, server.request_timeout())
}

impl Default for App {
    fn default() -> Self {
        Self::with_config(I18n::default(), Config::default(), None)
    }
}

impl App {
    fn with_config(i18n: I18n, config: Config, client: Option<SearchClient>) -> Self {
        let limits = UploadLimits::from_config(&config.upload);
        let session = SearchSession::default();
        let layout = session.layout();
        Self {
            i18n,
            config,
            client,
            limits,
            session,
            layout,
            help: help::State::default(),
            help_fence: RequestFence::new(),
            images: ImageCache::new(config::IMAGE_CACHE_CAPACITY),
            modal: None,
            menu_open: false,
            notifications: notifications::Manager::new(),
        }
    }

    /// Initializes application state and starts the server handshake.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        paths::init_cli_override(flags.config_dir.clone());
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);

        // A --server override is not written back to the settings file
        let mut server = config.server.clone();
        if let Some(url) = flags.server {
            server.base_url = url;
        }

        let client = match build_client(&server) {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::error!(url = %server.base_url, error = %err, "unusable server configuration");
                None
            }
        };

        let mut app = Self::with_config(i18n, config, client);

        if let Some(key) = config_warning {
            app.notifications
                .push(notifications::Notification::warning(&key));
        }

        let mut tasks = Vec::new();
        match &app.client {
            Some(client) => {
                tracing::info!(url = %server.base_url, variant = ?server.api_variant, "using search server");
                tasks.push(update::connect(
                    client.clone(),
                    server.password.clone(),
                    app.i18n.current_locale().to_string(),
                    server.fetch_page_globals,
                ));
            }
            None => app
                .notifications
                .push(notifications::Notification::error("error-server-url")),
        }

        if let Some(path) = flags.image_path {
            tasks.push(update::select_image(PathBuf::from(path)));
        }

        (app, Task::batch(tasks))
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match &self.session.image {
            Some(image) => format!("{} - {app_name}", image.file.name),
            None => app_name,
        }
    }

    fn theme(&self) -> Theme {
        self.config.general.theme_mode.iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        let event_sub = subscription::create_event_subscription();
        let tick_sub =
            subscription::create_tick_subscription(self.notifications.has_notifications());

        Subscription::batch([event_sub, tick_sub])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            i18n: &mut self.i18n,
            config: &mut self.config,
            client: &self.client,
            limits: &mut self.limits,
            session: &mut self.session,
            help: &mut self.help,
            help_fence: &mut self.help_fence,
            images: &mut self.images,
            modal: &mut self.modal,
            menu_open: &mut self.menu_open,
            notifications: &mut self.notifications,
        };

        let task = match message {
            Message::Navbar(navbar_message) => update::handle_navbar_message(&mut ctx, navbar_message),
            Message::InputForm(form_message) => {
                update::handle_input_form_message(&mut ctx, form_message)
            }
            Message::Results(container, fragment_message) => {
                update::handle_results_message(&mut ctx, container, fragment_message)
            }
            Message::Help(help_message) => update::handle_help_message(&mut ctx, help_message),
            Message::Notification(notification_message) => {
                ctx.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::CloseModal => {
                *ctx.modal = None;
                Task::none()
            }
            Message::Tick(_instant) => {
                ctx.notifications.tick();
                Task::none()
            }
            Message::EscapePressed => update::handle_escape(&mut ctx),
            Message::ImagePicked(path) => update::handle_image_picked(path),
            Message::FileDropped(path) => update::handle_file_dropped(&mut ctx, path),
            Message::ImageInspected(result) => update::handle_image_inspected(&mut ctx, result),
            Message::ImageLoaded(result) => update::handle_image_loaded(&mut ctx, result),
            Message::SearchPosted { ticket, result } => {
                update::handle_search_posted(&mut ctx, ticket, result)
            }
            Message::FragmentLoaded {
                container,
                ticket,
                result,
            } => update::handle_fragment_loaded(&mut ctx, container, ticket, result),
            Message::HelpLoaded { ticket, result } => {
                update::handle_help_loaded(&mut ctx, ticket, result)
            }
            Message::ImageFetched { src, result } => {
                update::handle_image_fetched(&mut ctx, src, result)
            }
            Message::LoggedIn(result) => update::handle_logged_in(&mut ctx, result),
            Message::LocaleSelected(result) => update::handle_locale_selected(&mut ctx, result),
            Message::PageGlobalsLoaded(result) => update::handle_page_globals(&mut ctx, result),
        };

        self.layout = self.session.layout();
        task
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            layout: &self.layout,
            session: &self.session,
            help: &self.help,
            images: &self.images,
            limits: &self.limits,
            modal: self.modal.as_ref(),
            notifications: &self.notifications,
            menu_open: self.menu_open,
        })
    }
}
